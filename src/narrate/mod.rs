//! Round narration
//!
//! Narration is strictly presentational. Combat state is resolved before a
//! narrator ever sees it, so a slow or failing narrator can degrade to
//! template text without touching mechanics.

pub mod llm;

use crate::combat::CombatOutcome;
use crate::core::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use llm::LlmNarrator;

/// Everything a narrator may know about a finished round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u32,
    pub location: String,
    /// Plain one-line descriptions of each resolved action, in turn order
    pub action_lines: Vec<String>,
    /// Set on the final round only
    pub outcome: Option<CombatOutcome>,
}

impl RoundSummary {
    pub fn new(round: u32, location: impl Into<String>) -> Self {
        Self {
            round,
            location: location.into(),
            action_lines: Vec::new(),
            outcome: None,
        }
    }
}

/// Prose generation seam
#[async_trait]
pub trait Narrator: Send + Sync {
    async fn narrate_round(&self, summary: &RoundSummary) -> Result<String>;
}

/// Deterministic narrator that stitches the mechanical action lines together
///
/// Used directly in tests and as the degradation target when an LLM
/// narrator errors or times out.
#[derive(Debug, Default, Clone)]
pub struct TemplateNarrator;

impl TemplateNarrator {
    /// Synchronous rendering, shared with the async trait impl
    pub fn render(&self, summary: &RoundSummary) -> String {
        let mut text = format!("Round {}: {}", summary.round, summary.action_lines.join(" "));
        if let Some(outcome) = summary.outcome {
            let coda = match outcome {
                CombatOutcome::Victory => "The last foe falls.",
                CombatOutcome::Defeat => "Darkness closes in.",
                CombatOutcome::Fled => "The fight is left behind.",
                CombatOutcome::Timeout => "Both sides break off, spent.",
            };
            text.push(' ');
            text.push_str(coda);
        }
        text
    }
}

#[async_trait]
impl Narrator for TemplateNarrator {
    async fn narrate_round(&self, summary: &RoundSummary) -> Result<String> {
        Ok(self.render(summary))
    }
}
