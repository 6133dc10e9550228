//! Defensive: hold ground, and fall back to heal when pressed

use crate::ai::{scoring, DecisionContext};
use crate::combat::{Action, Combatant};
use crate::position::{MoveDirection, Range};

pub fn decide(ctx: &DecisionContext, actor: &Combatant) -> Action {
    // Emergency: wounded past the threshold, patch up or retreat
    if actor.sheet.hp_fraction() < ctx.profile.thresholds.hp_emergency {
        if let Some(index) = scoring::ready_heal_ability(actor) {
            return Action::UseAbility {
                index,
                target: actor.id,
            };
        }
        if let Some(index) = scoring::healing_item(actor) {
            return Action::UseItem {
                index,
                target: actor.id,
            };
        }
        if let Some(enemy) = ctx.nearest_enemy(actor) {
            if ctx.distance(actor.id, enemy.id) < Range::Long && ctx.can_move(actor) {
                return Action::Move {
                    direction: MoveDirection::Farther,
                    relative_to: enemy.id,
                };
            }
        }
        return Action::Defend;
    }

    // Healthy enough: strike whatever is already in reach, never chase
    if let Some(action) = scoring::best_attack(ctx, actor) {
        return action;
    }
    Action::Defend
}
