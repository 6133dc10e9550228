//! Aggressive: close distance relentlessly, spend everything on damage

use crate::ai::{scoring, DecisionContext};
use crate::combat::{Action, Combatant};
use crate::position::{MoveDirection, Range};

pub fn decide(ctx: &DecisionContext, actor: &Combatant) -> Action {
    // Highest-damage legal action, whatever it costs
    if let Some(action) = scoring::best_attack(ctx, actor) {
        return action;
    }

    // Nothing legal: press toward the nearest enemy
    if let Some(enemy) = ctx.nearest_enemy(actor) {
        if ctx.distance(actor.id, enemy.id) > Range::Melee && ctx.can_move(actor) {
            return Action::Move {
                direction: MoveDirection::Closer,
                relative_to: enemy.id,
            };
        }
    }

    Action::Defend
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::archetypes::testkit::Battlefield;
    use crate::core::types::Archetype;

    #[test]
    fn test_attacks_when_in_reach() {
        let field = Battlefield::wolf_at(Range::Melee, Archetype::Aggressive);
        let action = decide(&field.ctx(), field.actor());
        assert!(matches!(action, Action::Attack { .. }));
    }

    #[test]
    fn test_closes_distance_when_out_of_reach() {
        let field = Battlefield::wolf_at(Range::Long, Archetype::Aggressive);
        let action = decide(&field.ctx(), field.actor());
        assert_eq!(
            action,
            Action::Move {
                direction: MoveDirection::Closer,
                relative_to: field.hero().id,
            }
        );
    }

    #[test]
    fn test_defends_when_spent_and_stranded() {
        let mut field = Battlefield::wolf_at(Range::Long, Archetype::Aggressive);
        field.actor_mut().sheet.stamina = 0;
        let action = decide(&field.ctx(), field.actor());
        assert_eq!(action, Action::Defend);
    }
}
