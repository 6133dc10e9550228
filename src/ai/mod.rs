//! Archetype-driven combat AI
//!
//! Architecture: tagged dispatch over five pure decision functions, one
//! per behavior archetype, each independently testable. Tuning lives in
//! `ArchetypeProfile` values loaded from `data/archetypes/*.toml`, with
//! built-in defaults when the files are absent.

pub mod archetypes;
pub mod context;
pub mod scoring;

pub use context::DecisionContext;

use crate::combat::{Action, Combatant};
use crate::core::error::Result;
use crate::core::types::Archetype;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Health and safety thresholds (fractions of max hp)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Own-hp fraction below which the archetype's emergency rule fires
    pub hp_emergency: f32,
    /// Ally-hp fraction below which support considers them wounded
    pub ally_heal: f32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            hp_emergency: 0.3,
            ally_heal: 0.6,
        }
    }
}

/// Weights for scoring candidate offensive actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightConfig {
    /// Weight on expected damage dealt
    pub damage: f32,
    /// Penalty weight on exposure (standing at melee to deliver the blow)
    pub safety: f32,
    /// Penalty weight on stamina/mana spent
    pub cost: f32,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            damage: 1.0,
            safety: 0.5,
            cost: 0.1,
        }
    }
}

/// Complete tuning profile for one archetype
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchetypeProfile {
    /// Name of this profile (set from filename when loaded)
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub weights: WeightConfig,
}

impl ArchetypeProfile {
    /// Built-in tuning for an archetype, used when no TOML override exists
    pub fn default_for(archetype: Archetype) -> Self {
        let mut profile = Self {
            name: archetype.name().to_string(),
            ..Self::default()
        };
        match archetype {
            Archetype::Aggressive => {
                profile.thresholds.hp_emergency = 0.0;
                profile.weights.damage = 1.5;
                profile.weights.safety = 0.1;
            }
            Archetype::Defensive => {
                profile.thresholds.hp_emergency = 0.35;
                profile.weights.safety = 1.0;
            }
            Archetype::Balanced => {}
            Archetype::Support => {
                profile.thresholds.ally_heal = 0.55;
            }
            Archetype::Coward => {
                profile.thresholds.hp_emergency = 0.4;
                profile.weights.safety = 2.0;
                profile.weights.cost = 0.5;
            }
        }
        profile
    }
}

/// Load a profile from `data/archetypes/{name}.toml`
pub fn load_profile(name: &str) -> Result<ArchetypeProfile> {
    let path = profile_path(name);
    let contents = fs::read_to_string(&path)?;
    let mut profile: ArchetypeProfile = toml::from_str(&contents)?;
    profile.name = name.to_string();
    Ok(profile)
}

fn profile_path(name: &str) -> PathBuf {
    PathBuf::from("data/archetypes").join(format!("{}.toml", name))
}

/// Tuning profiles for all five archetypes
#[derive(Debug, Clone)]
pub struct ArchetypeProfiles {
    profiles: AHashMap<Archetype, ArchetypeProfile>,
}

impl Default for ArchetypeProfiles {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ArchetypeProfiles {
    /// Built-in defaults only
    pub fn builtin() -> Self {
        let profiles = Archetype::ALL
            .into_iter()
            .map(|a| (a, ArchetypeProfile::default_for(a)))
            .collect();
        Self { profiles }
    }

    /// Load every archetype's TOML file, keeping the built-in default for
    /// any file that is missing or malformed
    pub fn load() -> Self {
        let mut profiles = AHashMap::default();
        for archetype in Archetype::ALL {
            let profile = match load_profile(archetype.name()) {
                Ok(profile) => profile,
                Err(e) => {
                    tracing::warn!(
                        "No tuning file for {} archetype ({}); using built-in defaults",
                        archetype.name(),
                        e
                    );
                    ArchetypeProfile::default_for(archetype)
                }
            };
            profiles.insert(archetype, profile);
        }
        Self { profiles }
    }

    pub fn get(&self, archetype: Archetype) -> &ArchetypeProfile {
        // Every variant is inserted at construction
        self.profiles
            .get(&archetype)
            .unwrap_or_else(|| unreachable!("profile table covers all archetypes"))
    }
}

/// Pick an action for a non-player combatant
///
/// Pure over the provided context; all randomness in combat stays with the
/// manager's seeded RNG, so AI decisions replay identically.
pub fn decide(ctx: &DecisionContext, actor: &Combatant) -> Action {
    let archetype = actor.sheet.archetype.unwrap_or(Archetype::Balanced);
    match archetype {
        Archetype::Aggressive => archetypes::aggressive::decide(ctx, actor),
        Archetype::Defensive => archetypes::defensive::decide(ctx, actor),
        Archetype::Balanced => archetypes::balanced::decide(ctx, actor),
        Archetype::Support => archetypes::support::decide(ctx, actor),
        Archetype::Coward => archetypes::coward::decide(ctx, actor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles_cover_all_archetypes() {
        let profiles = ArchetypeProfiles::builtin();
        for archetype in Archetype::ALL {
            let profile = profiles.get(archetype);
            assert!(profile.thresholds.hp_emergency >= 0.0);
            assert!(profile.thresholds.hp_emergency <= 1.0);
        }
    }

    #[test]
    fn test_coward_flees_earlier_than_defensive() {
        let coward = ArchetypeProfile::default_for(Archetype::Coward);
        let defensive = ArchetypeProfile::default_for(Archetype::Defensive);
        assert!(coward.thresholds.hp_emergency > defensive.thresholds.hp_emergency);
    }

    #[test]
    fn test_aggressive_never_panics_over_hp() {
        let profile = ArchetypeProfile::default_for(Archetype::Aggressive);
        assert_eq!(profile.thresholds.hp_emergency, 0.0);
    }

    #[test]
    fn test_load_missing_profile_errors() {
        assert!(load_profile("no-such-archetype").is_err());
    }
}
