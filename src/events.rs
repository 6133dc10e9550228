//! Domain events emitted while a combat runs
//!
//! Events are pushed to an explicit sink passed into the runner, never to
//! a global bus, so tests, replay loggers and any presentation layer can
//! observe a combat without hidden coupling.

use crate::combat::{ActionOutcome, CombatOutcome};
use crate::core::types::{CombatantId, Round};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    CombatStarted {
        seed: u64,
        /// Initiative order as (id, name) pairs, first turn holder first
        order: Vec<(CombatantId, String)>,
    },
    ActionTaken {
        round: Round,
        actor: CombatantId,
        action: String,
        outcome: ActionOutcome,
    },
    /// A submitted action failed validation; the turn did not advance
    ActionRejected {
        round: Round,
        actor: CombatantId,
        reason: String,
    },
    RoundNarrated {
        round: Round,
        text: String,
    },
    CombatEnded {
        outcome: CombatOutcome,
        rounds: Round,
    },
}

/// Observer seam for combat events
pub trait EventSink {
    fn emit(&mut self, event: &CombatEvent);
}

/// Sink that drops everything
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &CombatEvent) {}
}

/// Sink that keeps every event, mostly for tests and replay capture
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<CombatEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &CombatEvent) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_order() {
        let mut sink = RecordingSink::default();
        sink.emit(&CombatEvent::RoundNarrated {
            round: 1,
            text: "Steel rings out.".into(),
        });
        sink.emit(&CombatEvent::CombatEnded {
            outcome: CombatOutcome::Victory,
            rounds: 1,
        });
        assert_eq!(sink.events.len(), 2);
        assert!(matches!(sink.events[0], CombatEvent::RoundNarrated { .. }));
    }
}
