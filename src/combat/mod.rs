//! The turn-based combat state machine and its resolution math

pub mod action;
pub mod combatant;
pub mod manager;
pub mod resolve;
pub mod rewards;

pub use action::{Action, ActionOutcome};
pub use combatant::Combatant;
pub use manager::{CombatManager, CombatOutcome, CombatPhase, CombatResult};
pub use rewards::Rewards;
