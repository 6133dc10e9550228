//! Balanced: work the equipped weapon's band, then attack
//!
//! Band-seeking runs both directions: a melee fighter closes in, and a
//! ranged fighter caught at melee opens distance back out to its band
//! before loosing again. Beyond that it never voluntarily retreats.

use crate::ai::{scoring, DecisionContext};
use crate::combat::{Action, Combatant};
use crate::position::MoveDirection;

pub fn decide(ctx: &DecisionContext, actor: &Combatant) -> Action {
    let band = actor.sheet.weapon.range;

    if let Some(enemy) = ctx.nearest_enemy(actor) {
        let current = ctx.distance(actor.id, enemy.id);
        if current != band && ctx.can_move(actor) {
            let direction = if current > band {
                MoveDirection::Closer
            } else {
                MoveDirection::Farther
            };
            return Action::Move {
                direction,
                relative_to: enemy.id,
            };
        }
    }

    if let Some(action) = scoring::best_attack(ctx, actor) {
        return action;
    }
    Action::Defend
}
