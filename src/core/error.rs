use crate::core::types::CombatantId;
use crate::position::Range;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CombatError {
    /// The submitted action belongs to a combatant whose turn it is not.
    /// Also covers late submissions after the turn pointer has advanced.
    #[error("Not this combatant's turn: {0:?}")]
    NotYourTurn(CombatantId),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Out of range: {action} requires {required:?} or nearer, current distance is {actual:?}")]
    OutOfRange {
        action: String,
        required: Range,
        actual: Range,
    },

    #[error("Insufficient {resource}: need {needed}, have {available}")]
    InsufficientResource {
        resource: &'static str,
        needed: i32,
        available: i32,
    },

    #[error("Unknown combatant: {0:?}")]
    UnknownCombatant(CombatantId),

    /// Misuse of the combat API (acting on a resolved combat, finishing
    /// twice). A gameplay bug in the caller, not a gameplay outcome.
    #[error("Combat contract violation: {0}")]
    ContractViolation(&'static str),

    #[error("Narration error: {0}")]
    Narration(String),

    #[error("Decision error: {0}")]
    Decision(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl CombatError {
    /// True for the recoverable action-validation failures that leave the
    /// combat untouched; the same actor may resubmit a corrected action.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CombatError::NotYourTurn(_)
                | CombatError::InvalidTarget(_)
                | CombatError::OutOfRange { .. }
                | CombatError::InsufficientResource { .. }
                | CombatError::UnknownCombatant(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CombatError>;
