//! Coward: fight only while it feels safe, and run the moment it doesn't

use crate::ai::{scoring, DecisionContext};
use crate::combat::{Action, Combatant};
use crate::position::{MoveDirection, Range};

pub fn decide(ctx: &DecisionContext, actor: &Combatant) -> Action {
    // Below the threshold nothing else matters: run, unconditionally
    if actor.sheet.hp_fraction() < ctx.profile.thresholds.hp_emergency {
        return Action::Flee;
    }

    // Otherwise the least exposed attack available; the coward profile's
    // heavy safety and cost weights do the flinching
    if let Some(action) = scoring::best_attack(ctx, actor) {
        return action;
    }

    // Cornered with nothing to throw: back away
    if let Some(enemy) = ctx.nearest_enemy(actor) {
        if ctx.distance(actor.id, enemy.id) == Range::Melee && ctx.can_move(actor) {
            return Action::Move {
                direction: MoveDirection::Farther,
                relative_to: enemy.id,
            };
        }
    }
    Action::Defend
}
