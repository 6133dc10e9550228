//! Support: keep the living allies standing before hurting anyone

use crate::ai::{scoring, DecisionContext};
use crate::combat::{Action, Combatant};
use crate::position::MoveDirection;

pub fn decide(ctx: &DecisionContext, actor: &Combatant) -> Action {
    // A wounded ally outranks every other concern
    if let Some(ally) = ctx.most_wounded_ally(actor) {
        if ally.sheet.hp_fraction() < ctx.profile.thresholds.ally_heal {
            if let Some(index) = scoring::ready_heal_ability(actor) {
                let reach = actor.sheet.abilities[index].range;
                if ctx.in_range(actor.id, ally.id, reach) {
                    return Action::UseAbility {
                        index,
                        target: ally.id,
                    };
                }
                if ctx.can_move(actor) {
                    return Action::Move {
                        direction: MoveDirection::Closer,
                        relative_to: ally.id,
                    };
                }
            }
            if ally.id == actor.id {
                if let Some(index) = scoring::healing_item(actor) {
                    return Action::UseItem {
                        index,
                        target: actor.id,
                    };
                }
            }
        }
    }

    // Everyone healthy: buff an ally, else fight
    if let Some(index) = scoring::ready_buff_ability(actor) {
        let reach = actor.sheet.abilities[index].range;
        if let Some(ally) = ctx
            .active_allies(actor)
            .into_iter()
            .find(|a| a.id != actor.id && ctx.in_range(actor.id, a.id, reach))
        {
            return Action::UseAbility {
                index,
                target: ally.id,
            };
        }
    }

    if let Some(action) = scoring::best_attack(ctx, actor) {
        return action;
    }
    Action::Defend
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::archetypes::testkit::Battlefield;
    use crate::character::templates;
    use crate::core::types::{Archetype, Team};
    use crate::combat::Combatant;
    use crate::position::Range;

    fn mender_field(range: Range) -> Battlefield {
        Battlefield::new(templates::cult_mender().instantiate(3), Archetype::Support, range)
    }

    #[test]
    fn test_heals_wounded_ally_in_reach() {
        let mut field = mender_field(Range::Medium);
        // Add a badly wounded packmate next to the mender
        let mut packmate = Combatant::new(Team::Enemy, 2, templates::dire_wolf().instantiate(3));
        packmate.sheet.hp = 2;
        field.positions.register(packmate.id);
        let packmate_id = packmate.id;
        field.combatants.push(packmate);

        let action = decide(&field.ctx(), &field.combatants[1]);
        assert!(matches!(
            action,
            Action::UseAbility { target, .. } if target == packmate_id
        ));
    }

    #[test]
    fn test_moves_toward_distant_wounded_ally() {
        let mut field = mender_field(Range::Medium);
        let mut packmate = Combatant::new(Team::Enemy, 2, templates::dire_wolf().instantiate(3));
        packmate.sheet.hp = 2;
        field.positions.register(packmate.id);
        let packmate_id = packmate.id;
        let mender_id = field.combatants[1].id;
        field.combatants.push(packmate);
        field
            .positions
            .set_distance(mender_id, packmate_id, Range::Long)
            .unwrap();

        let action = decide(&field.ctx(), &field.combatants[1]);
        assert_eq!(
            action,
            Action::Move {
                direction: MoveDirection::Closer,
                relative_to: packmate_id,
            }
        );
    }

    #[test]
    fn test_healthy_side_fights_instead() {
        let field = mender_field(Range::Melee);
        let action = decide(&field.ctx(), field.actor());
        // Alone and healthy: swings the cudgel or spits venom
        assert!(matches!(
            action,
            Action::Attack { .. } | Action::UseAbility { .. }
        ));
    }
}
