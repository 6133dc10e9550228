//! Offensive option enumeration and scoring
//!
//! Candidates are only ever emitted if the manager would accept them:
//! range, stamina, mana and cooldown gates are all checked here, so a
//! decision function returning one of these never bounces off validation.

use crate::ai::DecisionContext;
use crate::character::AbilityKind;
use crate::combat::{resolve, Action, Combatant};
use crate::position::Range;

/// One legal offensive candidate
#[derive(Debug, Clone)]
pub struct AttackOption {
    pub action: Action,
    /// Probability-weighted damage, crit expectation folded in
    pub expected_damage: f32,
    /// Exposure proxy: 1.0 when delivered from melee, 0.0 otherwise
    pub risk: f32,
    /// Stamina or mana spent
    pub cost: f32,
    /// Tie-break key: (target roster slot, candidate slot)
    ordinal: (usize, usize),
}

/// Probability-weighted damage of one strike before defense
fn expected_damage(
    attacker: &Combatant,
    base: i32,
    target: &Combatant,
    ctx: &DecisionContext,
) -> f32 {
    let hit = resolve::hit_chance(
        attacker.effective_accuracy(),
        target.effective_evasion(),
        ctx.config,
    ) / 100.0;
    let crit = ctx.config.crit_chance / 100.0;
    let average = base as f32 * (1.0 + crit * (ctx.config.crit_multiplier - 1.0));
    let after_defense = (average - target.effective_defense() as f32).max(1.0);
    hit * after_defense
}

/// Every legal offensive action the actor could take right now
pub fn attack_options(ctx: &DecisionContext, actor: &Combatant) -> Vec<AttackOption> {
    let mut options = Vec::new();

    for target in ctx.active_enemies(actor) {
        let at_melee = ctx.distance(actor.id, target.id) == Range::Melee;

        let weapon = &actor.sheet.weapon;
        if actor.sheet.stamina >= weapon.stamina_cost
            && ctx.in_range(actor.id, target.id, weapon.range)
        {
            options.push(AttackOption {
                action: Action::Attack { target: target.id },
                expected_damage: expected_damage(
                    actor,
                    weapon.damage + actor.effective_attack(),
                    target,
                    ctx,
                ),
                risk: if at_melee { 1.0 } else { 0.0 },
                cost: weapon.stamina_cost as f32,
                ordinal: (target.roster_index, 0),
            });
        }

        for (index, ability) in actor.sheet.abilities.iter().enumerate() {
            let AbilityKind::Damage { power } = ability.kind else {
                continue;
            };
            if !actor.ability_ready(index)
                || actor.sheet.mana < ability.mana_cost
                || !ctx.in_range(actor.id, target.id, ability.range)
            {
                continue;
            }
            options.push(AttackOption {
                action: Action::UseAbility {
                    index,
                    target: target.id,
                },
                expected_damage: expected_damage(
                    actor,
                    power + actor.effective_attack(),
                    target,
                    ctx,
                ),
                risk: if at_melee { 1.0 } else { 0.0 },
                cost: ability.mana_cost as f32,
                ordinal: (target.roster_index, index + 1),
            });
        }
    }

    options
}

/// Weighted score for one candidate under the deciding archetype's profile
pub fn score(ctx: &DecisionContext, option: &AttackOption) -> f32 {
    let w = &ctx.profile.weights;
    w.damage * option.expected_damage - w.safety * option.risk - w.cost * option.cost
}

/// Highest-scoring legal offensive action, if any exists
///
/// Deterministic: strict score comparison with a stable ordinal tie-break,
/// so identical states always yield the identical choice.
pub fn best_attack(ctx: &DecisionContext, actor: &Combatant) -> Option<Action> {
    let options = attack_options(ctx, actor);
    let mut best: Option<(&AttackOption, f32)> = None;
    for option in &options {
        let s = score(ctx, option);
        let better = match best {
            None => true,
            Some((incumbent, incumbent_score)) => {
                s > incumbent_score || (s == incumbent_score && option.ordinal < incumbent.ordinal)
            }
        };
        if better {
            best = Some((option, s));
        }
    }
    best.map(|(option, _)| option.action.clone())
}

/// Index of a ready, affordable heal ability
pub fn ready_heal_ability(actor: &Combatant) -> Option<usize> {
    actor.sheet.abilities.iter().enumerate().find_map(|(i, a)| {
        let is_heal = matches!(a.kind, AbilityKind::Heal { .. });
        (is_heal && actor.ability_ready(i) && actor.sheet.mana >= a.mana_cost).then_some(i)
    })
}

/// Index of a ready, affordable friendly status ability (buffs)
pub fn ready_buff_ability(actor: &Combatant) -> Option<usize> {
    actor.sheet.abilities.iter().enumerate().find_map(|(i, a)| {
        let is_buff = matches!(a.kind, AbilityKind::ApplyStatus { .. }) && a.is_friendly();
        (is_buff && actor.ability_ready(i) && actor.sheet.mana >= a.mana_cost).then_some(i)
    })
}

/// Index of a healing consumable in the actor's inventory
pub fn healing_item(actor: &Combatant) -> Option<usize> {
    actor.sheet.inventory.iter().position(|stack| {
        stack.quantity > 0 && matches!(stack.item.kind, crate::character::ItemKind::HealHp(_))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ArchetypeProfile;
    use crate::character::{templates, CharacterSheet};
    use crate::core::config::CombatConfig;
    use crate::core::types::{Archetype, Team};
    use crate::position::PositionManager;

    fn setup(range: Range) -> (Vec<Combatant>, PositionManager) {
        let hero = Combatant::new(Team::Player, 0, CharacterSheet::adventurer("Hero", 3));
        let enemy = Combatant::new(Team::Enemy, 1, templates::bandit().instantiate(3));
        let mut positions = PositionManager::new();
        positions.register(hero.id);
        positions.register(enemy.id);
        positions.set_distance(hero.id, enemy.id, range).unwrap();
        (vec![hero, enemy], positions)
    }

    #[test]
    fn test_no_options_when_out_of_range() {
        let (combatants, positions) = setup(Range::Long);
        let config = CombatConfig::default();
        let profile = ArchetypeProfile::default_for(Archetype::Balanced);
        let ctx = DecisionContext::new(&combatants, &positions, &config, &profile);
        // Shortsword at long range: nothing legal
        assert!(attack_options(&ctx, &combatants[0]).is_empty());
        assert!(best_attack(&ctx, &combatants[0]).is_none());
    }

    #[test]
    fn test_weapon_attack_enumerated_in_range() {
        let (combatants, positions) = setup(Range::Melee);
        let config = CombatConfig::default();
        let profile = ArchetypeProfile::default_for(Archetype::Aggressive);
        let ctx = DecisionContext::new(&combatants, &positions, &config, &profile);
        let options = attack_options(&ctx, &combatants[0]);
        assert_eq!(options.len(), 1);
        assert!(matches!(options[0].action, Action::Attack { .. }));
        assert!(options[0].expected_damage > 0.0);
    }

    #[test]
    fn test_exhausted_actor_has_no_weapon_option() {
        let (mut combatants, positions) = setup(Range::Melee);
        combatants[0].sheet.stamina = 0;
        let config = CombatConfig::default();
        let profile = ArchetypeProfile::default_for(Archetype::Balanced);
        let ctx = DecisionContext::new(&combatants, &positions, &config, &profile);
        assert!(best_attack(&ctx, &combatants[0]).is_none());
    }

    #[test]
    fn test_heal_helpers_see_resources() {
        let (mut combatants, _) = setup(Range::Melee);
        assert!(ready_heal_ability(&combatants[0]).is_some());
        assert!(healing_item(&combatants[0]).is_some());

        combatants[0].sheet.mana = 0;
        combatants[0].sheet.inventory.clear();
        assert!(ready_heal_ability(&combatants[0]).is_none());
        assert!(healing_item(&combatants[0]).is_none());
    }
}
