//! Hit, crit, damage and escape math
//!
//! Pure functions over stats and config; all randomness stays with the
//! caller's seeded RNG so identical rolls reproduce identical fights.

use crate::core::config::CombatConfig;
use rand::Rng;

/// Chance (percent) for an attacker to connect
///
/// `base + (accuracy - evasion) * scaling`, clamped into the configured
/// floor/ceiling band so no attack is ever certain or hopeless.
pub fn hit_chance(accuracy: i32, evasion: i32, config: &CombatConfig) -> f32 {
    let raw = config.base_hit_chance + (accuracy - evasion) as f32 * config.hit_scaling;
    raw.clamp(config.min_hit_chance, config.max_hit_chance)
}

/// Roll a percent chance against the RNG
pub fn roll_percent(rng: &mut impl Rng, chance: f32) -> bool {
    rng.gen_range(0.0..100.0) < chance
}

/// Damage applied to the target, floored at 1 so every hit makes progress
///
/// `base * crit_multiplier - defense`, then halved (rounded down, but
/// never below the floor) when the target holds a defending stance.
pub fn damage(
    base: i32,
    critical: bool,
    defense: i32,
    defending: bool,
    config: &CombatConfig,
) -> i32 {
    let raw = if critical {
        (base as f32 * config.crit_multiplier).floor() as i32
    } else {
        base
    };
    let mut applied = raw - defense;
    if defending {
        applied = (applied as f32 * config.defend_reduction).floor() as i32;
    }
    applied.max(1)
}

/// Chance (percent) to escape, driven by agility advantage over the
/// fastest pursuer
pub fn flee_chance(agility: i32, fastest_pursuer_agility: i32, config: &CombatConfig) -> f32 {
    let raw = config.flee_base_chance
        + (agility - fastest_pursuer_agility) as f32 * config.flee_agility_scaling;
    raw.clamp(config.min_hit_chance, config.max_hit_chance)
}
