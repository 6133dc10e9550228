//! Combat tuning configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other.

use crate::core::types::{DangerTier, TimeOfDay};
use serde::{Deserialize, Serialize};

/// Configuration for the combat systems
///
/// These values have been tuned so a level-appropriate fight lasts roughly
/// four to eight rounds. Changing them will affect pacing and lethality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatConfig {
    // === HIT RESOLUTION ===
    /// Base chance to hit, in percent, before accuracy/evasion adjustment
    ///
    /// At 60.0, evenly-matched combatants connect on most swings while
    /// still missing often enough that evasion stats matter.
    pub base_hit_chance: f32,

    /// Scaling applied to (attacker accuracy - target evasion)
    ///
    /// Each point of accuracy advantage is worth this many percentage
    /// points of hit chance. At 0.5, a 20-point stat gap shifts the roll
    /// by 10 percent.
    pub hit_scaling: f32,

    /// Floor of the hit roll, in percent
    ///
    /// No attack is ever hopeless; even a blinded novice lands one in
    /// twenty swings.
    pub min_hit_chance: f32,

    /// Ceiling of the hit roll, in percent
    ///
    /// No attack is ever certain; the symmetric guard to `min_hit_chance`.
    pub max_hit_chance: f32,

    /// Chance that a landed hit is critical, in percent
    pub crit_chance: f32,

    /// Damage multiplier applied on a critical hit
    pub crit_multiplier: f32,

    // === STANCES & MOVEMENT ===
    /// Multiplier applied to post-defense damage against a defending
    /// target, so lower values make the stance stronger
    ///
    /// At 0.5, defending halves incoming damage (after the floor-at-1
    /// rule, so chip damage still lands).
    pub defend_reduction: f32,

    /// Stamina debited by the manager for each one-rank move
    pub move_stamina_cost: i32,

    // === FLEEING ===
    /// Base escape chance, in percent
    pub flee_base_chance: f32,

    /// Percent added per point of agility advantage over the fastest
    /// active opponent (negative advantage subtracts)
    pub flee_agility_scaling: f32,

    // === CIRCUIT BREAKER ===
    /// Hard cap on combat duration in full rounds
    ///
    /// When the round counter passes this ceiling the combat resolves as
    /// `Timeout` regardless of whether either side could still win. This
    /// bounds every combat at `round_ceiling * combatant_count` actions.
    pub round_ceiling: u32,

    // === INITIATIVE ===
    /// Upper bound (exclusive) of the seeded per-combat initiative jitter
    ///
    /// Initiative is agility plus a jitter in `0..initiative_jitter` drawn
    /// from the combat's seeded RNG, so the same seed always reproduces
    /// the same turn order.
    pub initiative_jitter: i32,

    // === ENCOUNTERS ===
    /// Base encounter chance per exploratory action in a low-danger area
    pub encounter_chance_low: f32,
    /// Base encounter chance in a medium-danger area
    pub encounter_chance_medium: f32,
    /// Base encounter chance in a high-danger area
    pub encounter_chance_high: f32,
    /// Base encounter chance in a deadly area
    pub encounter_chance_deadly: f32,

    /// Encounter chance multiplier at dusk
    pub evening_multiplier: f32,
    /// Encounter chance multiplier after dark
    pub night_multiplier: f32,

    // === ORCHESTRATION ===
    /// Milliseconds to wait on an external action source before the
    /// runner substitutes a defend
    pub decision_timeout_ms: u64,

    /// Milliseconds to wait on the narrator before falling back to the
    /// template description
    pub narration_timeout_ms: u64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            base_hit_chance: 60.0,
            hit_scaling: 0.5,
            min_hit_chance: 5.0,
            max_hit_chance: 95.0,
            crit_chance: 10.0,
            crit_multiplier: 1.5,
            defend_reduction: 0.5,
            move_stamina_cost: 5,
            flee_base_chance: 50.0,
            flee_agility_scaling: 2.0,
            round_ceiling: 30,
            initiative_jitter: 10,
            encounter_chance_low: 0.15,
            encounter_chance_medium: 0.30,
            encounter_chance_high: 0.50,
            encounter_chance_deadly: 0.75,
            evening_multiplier: 1.2,
            night_multiplier: 1.5,
            decision_timeout_ms: 30_000,
            narration_timeout_ms: 10_000,
        }
    }
}

impl CombatConfig {
    /// Base encounter chance for a danger tier. Safe is hardwired to zero;
    /// no roll can ever produce an encounter there.
    pub fn encounter_chance(&self, tier: DangerTier) -> f32 {
        match tier {
            DangerTier::Safe => 0.0,
            DangerTier::Low => self.encounter_chance_low,
            DangerTier::Medium => self.encounter_chance_medium,
            DangerTier::High => self.encounter_chance_high,
            DangerTier::Deadly => self.encounter_chance_deadly,
        }
    }

    /// Encounter chance multiplier for the time of day
    pub fn time_multiplier(&self, time: TimeOfDay) -> f32 {
        match time {
            TimeOfDay::Morning | TimeOfDay::Afternoon => 1.0,
            TimeOfDay::Evening => self.evening_multiplier,
            TimeOfDay::Night => self.night_multiplier,
        }
    }
}
