//! Encounter triggering and composition
//!
//! Runs before an exploratory action: rolls whether hostiles appear given
//! the location's danger tier and the time of day, and if so assembles a
//! level-appropriate enemy party with starting positions. Independent of
//! the round loop.

use crate::character::templates::{self, EnemyTemplate};
use crate::character::CharacterSheet;
use crate::core::config::CombatConfig;
use crate::core::types::{DangerTier, TimeOfDay};
use crate::position::Range;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The slice of a location the encounter system cares about
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub danger: DangerTier,
}

impl Location {
    pub fn new(name: impl Into<String>, danger: DangerTier) -> Self {
        Self {
            name: name.into(),
            danger,
        }
    }
}

/// One spawned enemy with its opening distance from the protagonist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterEnemy {
    pub sheet: CharacterSheet,
    pub opening_range: Range,
}

/// Everything `CombatManager::start` needs for one triggered encounter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterSpec {
    pub location: String,
    pub tier: DangerTier,
    pub enemies: Vec<EncounterEnemy>,
}

impl EncounterSpec {
    /// Shape the enemies for `CombatManager::start`
    pub fn into_roster(self) -> Vec<(CharacterSheet, Range)> {
        self.enemies
            .into_iter()
            .map(|e| (e.sheet, e.opening_range))
            .collect()
    }
}

/// How many enemies a tier fields
fn party_size(tier: DangerTier, rng: &mut impl Rng) -> usize {
    match tier {
        DangerTier::Safe => 0,
        DangerTier::Low => 1,
        DangerTier::Medium => rng.gen_range(1..=2),
        DangerTier::High => rng.gen_range(2..=3),
        DangerTier::Deadly => rng.gen_range(3..=4),
    }
}

/// Flat level bonus a tier grants its spawns
fn tier_level_bonus(tier: DangerTier) -> i32 {
    match tier {
        DangerTier::Safe | DangerTier::Low => 0,
        DangerTier::Medium => 1,
        DangerTier::High => 2,
        DangerTier::Deadly => 3,
    }
}

/// Decide whether hostiles appear, and compose them if so
///
/// Probability is `base_chance(danger_tier) * time_multiplier(time)`.
/// Safe locations never trigger. Spawn levels track the protagonist's
/// level plus the tier bonus, jittered by one either way.
pub fn generate_encounter(
    actor: &CharacterSheet,
    location: &Location,
    time: TimeOfDay,
    config: &CombatConfig,
    rng: &mut impl Rng,
) -> Option<EncounterSpec> {
    let chance = config.encounter_chance(location.danger) * config.time_multiplier(time);
    if chance <= 0.0 || rng.gen::<f32>() >= chance {
        return None;
    }

    let pool = templates::pool_for_tier(location.danger);
    if pool.is_empty() {
        return None;
    }

    let count = party_size(location.danger, rng);
    let mut enemies = Vec::with_capacity(count);
    for _ in 0..count {
        let template: &EnemyTemplate = &pool[rng.gen_range(0..pool.len())];
        let level =
            (actor.level as i32 + tier_level_bonus(location.danger) + rng.gen_range(-1..=1)).max(1);
        enemies.push(EncounterEnemy {
            sheet: template.instantiate(level as u32),
            opening_range: template.opening_range,
        });
    }

    tracing::debug!(
        "Encounter at {}: {} hostiles ({:?}, {:?})",
        location.name,
        enemies.len(),
        location.danger,
        time
    );

    Some(EncounterSpec {
        location: location.name.clone(),
        tier: location.danger,
        enemies,
    })
}
