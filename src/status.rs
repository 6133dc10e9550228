//! Status effects carried by combatants for the duration of a combat
//!
//! Stacking policy: reapplying an effect with the same name REFRESHES it.
//! The newest magnitude wins and the duration resets. Effects never stack
//! independently.

use serde::{Deserialize, Serialize};

/// Stat channels a modifier effect can touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifiedStat {
    Attack,
    Defense,
    Accuracy,
    Evasion,
}

/// What an effect does on each tick (or passively, for modifiers)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatusKind {
    /// Loses `amount` hp at the end of each of the bearer's turns
    DamageOverTime { amount: i32 },
    /// Regains `amount` hp at the end of each of the bearer's turns
    HealOverTime { amount: i32 },
    /// Flat stat delta while the effect lasts
    StatModifier { stat: ModifiedStat, delta: i32 },
}

/// One active status effect on a combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub name: String,
    pub kind: StatusKind,
    /// Turns of the bearer remaining before the effect expires
    pub remaining_turns: u32,
}

impl StatusEffect {
    pub fn new(name: impl Into<String>, kind: StatusKind, turns: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            remaining_turns: turns,
        }
    }

    pub fn poison(amount: i32, turns: u32) -> Self {
        Self::new("Poison", StatusKind::DamageOverTime { amount }, turns)
    }

    pub fn regeneration(amount: i32, turns: u32) -> Self {
        Self::new("Regeneration", StatusKind::HealOverTime { amount }, turns)
    }

    pub fn stat_buff(name: impl Into<String>, stat: ModifiedStat, delta: i32, turns: u32) -> Self {
        Self::new(name, StatusKind::StatModifier { stat, delta }, turns)
    }
}

/// Apply an effect to a status list under the refresh policy
pub fn apply(statuses: &mut Vec<StatusEffect>, effect: StatusEffect) {
    if let Some(existing) = statuses.iter_mut().find(|s| s.name == effect.name) {
        *existing = effect;
    } else {
        statuses.push(effect);
    }
}

/// Net hp delta from ticking every effect once: negative for damage,
/// positive for healing. Expired effects are removed afterwards.
pub fn tick(statuses: &mut Vec<StatusEffect>) -> i32 {
    let mut hp_delta = 0;
    for status in statuses.iter_mut() {
        match status.kind {
            StatusKind::DamageOverTime { amount } => hp_delta -= amount,
            StatusKind::HealOverTime { amount } => hp_delta += amount,
            StatusKind::StatModifier { .. } => {}
        }
        status.remaining_turns = status.remaining_turns.saturating_sub(1);
    }
    statuses.retain(|s| s.remaining_turns > 0);
    hp_delta
}

/// Sum of active modifier deltas for one stat channel
pub fn modifier_total(statuses: &[StatusEffect], stat: ModifiedStat) -> i32 {
    statuses
        .iter()
        .filter_map(|s| match s.kind {
            StatusKind::StatModifier { stat: st, delta } if st == stat => Some(delta),
            _ => None,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reapply_refreshes_instead_of_stacking() {
        let mut statuses = Vec::new();
        apply(&mut statuses, StatusEffect::poison(3, 2));
        tick(&mut statuses);
        assert_eq!(statuses[0].remaining_turns, 1);

        // Reapplied: duration resets, magnitude replaced, still one entry
        apply(&mut statuses, StatusEffect::poison(5, 4));
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].remaining_turns, 4);
        assert_eq!(statuses[0].kind, StatusKind::DamageOverTime { amount: 5 });
    }

    #[test]
    fn test_tick_nets_damage_and_healing() {
        let mut statuses = Vec::new();
        apply(&mut statuses, StatusEffect::poison(4, 3));
        apply(&mut statuses, StatusEffect::regeneration(1, 3));
        assert_eq!(tick(&mut statuses), -3);
    }

    #[test]
    fn test_expired_effects_are_dropped() {
        let mut statuses = Vec::new();
        apply(&mut statuses, StatusEffect::poison(2, 1));
        tick(&mut statuses);
        assert!(statuses.is_empty());
    }

    #[test]
    fn test_modifier_totals_by_channel() {
        let mut statuses = Vec::new();
        apply(
            &mut statuses,
            StatusEffect::stat_buff("War Cry", ModifiedStat::Attack, 5, 3),
        );
        apply(
            &mut statuses,
            StatusEffect::stat_buff("Cursed", ModifiedStat::Attack, -2, 3),
        );
        assert_eq!(modifier_total(&statuses, ModifiedStat::Attack), 3);
        assert_eq!(modifier_total(&statuses, ModifiedStat::Defense), 0);
    }

    #[test]
    fn test_distinct_names_coexist() {
        let mut statuses = Vec::new();
        apply(&mut statuses, StatusEffect::poison(2, 3));
        apply(&mut statuses, StatusEffect::regeneration(2, 3));
        assert_eq!(statuses.len(), 2);
    }
}
