//! Reward computation at combat end
//!
//! Loot and gold come only from enemies actually defeated, and only when
//! the combat ended in victory or a successful escape. A timeout is a
//! designed terminal state, never a payday; fled enemies contribute
//! nothing.

use crate::character::Item;
use crate::combat::combatant::Combatant;
use crate::combat::manager::CombatOutcome;
use crate::core::types::Team;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rewards {
    /// Experience per surviving player-side combatant (total split evenly)
    pub experience: u32,
    pub gold: u32,
    pub loot: Vec<Item>,
}

/// Roll rewards for a resolved combat
pub fn compute(outcome: CombatOutcome, combatants: &[Combatant], rng: &mut impl Rng) -> Rewards {
    match outcome {
        CombatOutcome::Victory | CombatOutcome::Fled => {}
        CombatOutcome::Defeat | CombatOutcome::Timeout => return Rewards::default(),
    }

    let mut total_xp = 0u32;
    let mut gold = 0u32;
    let mut loot = Vec::new();

    for enemy in combatants
        .iter()
        .filter(|c| c.team == Team::Enemy && !c.is_alive())
    {
        let Some(table) = &enemy.sheet.loot else {
            continue;
        };
        total_xp += table.experience;
        gold += if table.gold_max > table.gold_min {
            rng.gen_range(table.gold_min..=table.gold_max)
        } else {
            table.gold_min
        };
        for drop in &table.drops {
            if rng.gen::<f32>() < drop.chance {
                loot.push(drop.item.clone());
            }
        }
    }

    let survivors = combatants
        .iter()
        .filter(|c| c.team == Team::Player && c.is_alive())
        .count() as u32;
    let experience = if survivors > 0 {
        total_xp / survivors
    } else {
        0
    };

    Rewards {
        experience,
        gold,
        loot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{templates, CharacterSheet};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn roster(enemy_hp: i32) -> Vec<Combatant> {
        let hero = Combatant::new(Team::Player, 0, CharacterSheet::adventurer("Hero", 2));
        let mut enemy = Combatant::new(Team::Enemy, 1, templates::bandit().instantiate(2));
        enemy.sheet.hp = enemy_hp;
        vec![hero, enemy]
    }

    #[test]
    fn test_victory_pays_from_defeated_enemies() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let rewards = compute(CombatOutcome::Victory, &roster(0), &mut rng);
        assert!(rewards.experience > 0);
    }

    #[test]
    fn test_timeout_pays_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let rewards = compute(CombatOutcome::Timeout, &roster(0), &mut rng);
        assert_eq!(rewards, Rewards::default());
    }

    #[test]
    fn test_defeat_pays_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let rewards = compute(CombatOutcome::Defeat, &roster(0), &mut rng);
        assert_eq!(rewards, Rewards::default());
    }

    #[test]
    fn test_fled_enemies_contribute_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut combatants = roster(0);
        let mut runaway = Combatant::new(Team::Enemy, 2, templates::bandit().instantiate(2));
        runaway.fled = true;
        combatants.push(runaway);

        let mut lone_kill = ChaCha8Rng::seed_from_u64(4);
        let baseline = compute(CombatOutcome::Victory, &roster(0), &mut lone_kill);
        let with_runaway = compute(CombatOutcome::Victory, &combatants, &mut rng);
        assert_eq!(baseline.experience, with_runaway.experience);
    }

    #[test]
    fn test_escape_still_pays_for_prior_kills() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let rewards = compute(CombatOutcome::Fled, &roster(0), &mut rng);
        assert!(rewards.experience > 0);
    }

    #[test]
    fn test_surviving_enemies_pay_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let rewards = compute(CombatOutcome::Fled, &roster(10), &mut rng);
        assert_eq!(rewards, Rewards::default());
    }
}
