//! Actions a combatant can take on its turn, and what came of them

use crate::core::types::CombatantId;
use crate::position::MoveDirection;
use serde::{Deserialize, Serialize};

/// One combatant's choice for one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Strike `target` with the equipped weapon
    Attack { target: CombatantId },
    /// Use the ability at `index` in the actor's known list
    UseAbility { index: usize, target: CombatantId },
    /// Consume the inventory item at `index`
    UseItem { index: usize, target: CombatantId },
    /// Shift one rank closer to or farther from `relative_to`
    Move {
        direction: MoveDirection,
        relative_to: CombatantId,
    },
    /// Take a damage-reducing stance until the next own turn
    Defend,
    /// Attempt to escape the combat
    Flee,
}

impl Action {
    /// Short verb for logs and error messages
    pub fn verb(&self) -> &'static str {
        match self {
            Action::Attack { .. } => "attack",
            Action::UseAbility { .. } => "ability",
            Action::UseItem { .. } => "item",
            Action::Move { .. } => "move",
            Action::Defend => "defend",
            Action::Flee => "flee",
        }
    }
}

/// What a successfully processed action did
///
/// Validation failures never produce an outcome; they come back as errors
/// with the combat untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// The attack or damage ability connected (true for every
    /// non-offensive action that resolved)
    pub hit: bool,
    pub critical: bool,
    /// Damage dealt to the target, zero for misses and non-offensive acts
    pub damage: i32,
    pub target_defeated: bool,
    /// This action resolved the combat; only bookkeeping may follow
    pub combat_ended: bool,
    pub message: String,
}

impl ActionOutcome {
    /// Outcome for an action that did what it said without any rolls
    pub fn plain(message: impl Into<String>) -> Self {
        Self {
            hit: true,
            critical: false,
            damage: 0,
            target_defeated: false,
            combat_ended: false,
            message: message.into(),
        }
    }

    /// Outcome for a missed attack
    pub fn miss(message: impl Into<String>) -> Self {
        Self {
            hit: false,
            critical: false,
            damage: 0,
            target_defeated: false,
            combat_ended: false,
            message: message.into(),
        }
    }
}
