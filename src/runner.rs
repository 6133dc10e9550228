//! Combat orchestration
//!
//! `CombatRunner` owns the loop around a `CombatManager`: it pulls the
//! protagonist's actions from an injected `ActionProvider`, drives enemy
//! turns through the archetype AI, emits events to an injected sink, and
//! hands each finished round to an injected `Narrator`. Every external
//! dependency is bounded: slow providers fall back to `Defend`, slow or
//! failing narrators degrade to template text, and neither touches the
//! resolved mechanics.

use crate::ai::{self, ArchetypeProfiles, DecisionContext};
use crate::combat::{Action, CombatManager, CombatPhase, CombatResult};
use crate::core::error::{CombatError, Result};
use crate::core::types::{CombatantId, Round, Team};
use crate::events::{CombatEvent, EventSink};
use crate::narrate::{Narrator, RoundSummary, TemplateNarrator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retries granted to a provider whose action fails validation before the
/// turn is forfeited to `Defend`
const MAX_REJECTED_ACTIONS: u32 = 3;

/// Snapshot handed to an `ActionProvider` on the protagonist's turn
#[derive(Debug, Clone)]
pub struct TurnView {
    pub actor: CombatantId,
    pub round: Round,
    /// Every combatant still in the fight
    pub roster: Vec<RosterEntry>,
}

#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub id: CombatantId,
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub team: Team,
}

impl TurnView {
    fn capture(manager: &CombatManager, actor: CombatantId) -> Self {
        let roster = manager
            .combatants()
            .iter()
            .filter(|c| c.is_active())
            .map(|c| RosterEntry {
                id: c.id,
                name: c.sheet.name.clone(),
                hp: c.sheet.hp,
                max_hp: c.sheet.stats.max_hp,
                team: c.team,
            })
            .collect();
        Self {
            actor,
            round: manager.round(),
            roster,
        }
    }
}

/// Protagonist decision seam
#[async_trait]
pub trait ActionProvider: Send {
    async fn choose(&mut self, view: &TurnView) -> Result<Action>;
}

/// Provider that replays a fixed action sequence, then defends
///
/// Used by tests and the demo binary's scripted mode.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    actions: Vec<Action>,
    cursor: usize,
}

impl ScriptedProvider {
    pub fn new(actions: Vec<Action>) -> Self {
        Self { actions, cursor: 0 }
    }
}

#[async_trait]
impl ActionProvider for ScriptedProvider {
    async fn choose(&mut self, _view: &TurnView) -> Result<Action> {
        let action = self
            .actions
            .get(self.cursor)
            .cloned()
            .unwrap_or(Action::Defend);
        self.cursor += 1;
        Ok(action)
    }
}

/// Provider that plays the protagonist with the archetype AI
///
/// Lets the demo binary run full auto-battles without a human in the loop.
pub struct AutoProvider;

#[async_trait]
impl ActionProvider for AutoProvider {
    async fn choose(&mut self, _view: &TurnView) -> Result<Action> {
        // The runner short-circuits this provider and decides in-loop,
        // where it has manager access. Reaching here is a wiring bug.
        Err(CombatError::Decision(
            "AutoProvider must be driven by the runner".into(),
        ))
    }
}

/// Full transcript of a finished combat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatReport {
    pub result: CombatResult,
    pub narration: Vec<String>,
    pub log: Vec<CombatEvent>,
}

/// Drives one combat from `start` to `finish`
pub struct CombatRunner {
    manager: CombatManager,
    location: String,
    narrator: Box<dyn Narrator>,
    profiles: ArchetypeProfiles,
    auto_protagonist: bool,
}

impl CombatRunner {
    pub fn new(manager: CombatManager, location: impl Into<String>, narrator: Box<dyn Narrator>) -> Self {
        Self {
            manager,
            location: location.into(),
            narrator,
            profiles: ArchetypeProfiles::load(),
            auto_protagonist: false,
        }
    }

    /// Replace the loaded archetype profiles, mostly for tests
    pub fn with_profiles(mut self, profiles: ArchetypeProfiles) -> Self {
        self.profiles = profiles;
        self
    }

    /// Drive the protagonist with the archetype AI instead of the provider
    pub fn auto_protagonist(mut self) -> Self {
        self.auto_protagonist = true;
        self
    }

    pub fn manager(&self) -> &CombatManager {
        &self.manager
    }

    /// Run the combat to resolution
    ///
    /// The manager must already be started. Returns the finished report
    /// with result, per-round narration, and the full event log.
    pub async fn run(
        &mut self,
        provider: &mut dyn ActionProvider,
        sink: &mut dyn EventSink,
    ) -> Result<CombatReport> {
        if self.manager.phase() == CombatPhase::Idle {
            return Err(CombatError::ContractViolation(
                "run called before combat start",
            ));
        }

        let order = self
            .manager
            .turn_order()
            .iter()
            .filter_map(|id| self.manager.combatant(*id))
            .map(|c| (c.id, c.sheet.name.clone()))
            .collect();
        let mut log: Vec<CombatEvent> = Vec::new();
        let started = CombatEvent::CombatStarted {
            seed: self.manager.seed(),
            order,
        };
        sink.emit(&started);
        log.push(started);

        let mut narration = Vec::new();
        let mut summary = RoundSummary::new(self.manager.round(), self.location.clone());

        while let Some(actor) = self.manager.current_turn() {
            let round_before = self.manager.round();
            let action = self.select_action(provider, actor, &mut log, sink).await?;

            let outcome = match self.manager.process_action(actor, &action) {
                Ok(outcome) => outcome,
                Err(err) if err.is_validation() => {
                    // select_action only returns validated or safe actions;
                    // a rejection here means Defend itself failed
                    return Err(CombatError::ContractViolation(
                        "fallback action rejected by manager",
                    ));
                }
                Err(err) => return Err(err),
            };

            summary.action_lines.push(outcome.message.clone());
            let event = CombatEvent::ActionTaken {
                round: round_before,
                actor,
                action: action.verb().to_string(),
                outcome: outcome.clone(),
            };
            sink.emit(&event);
            log.push(event);

            let resolved = !matches!(self.manager.phase(), CombatPhase::InCombat);
            if resolved {
                summary.outcome = self.manager.outcome();
            }
            if resolved || self.manager.round() != round_before {
                let text = self.narrate(&summary).await;
                let event = CombatEvent::RoundNarrated {
                    round: summary.round,
                    text: text.clone(),
                };
                sink.emit(&event);
                log.push(event);
                narration.push(text);
                summary = RoundSummary::new(self.manager.round(), self.location.clone());
            }
        }

        let result = self.manager.finish()?;
        let ended = CombatEvent::CombatEnded {
            outcome: result.outcome,
            rounds: result.rounds,
        };
        sink.emit(&ended);
        log.push(ended);

        tracing::info!(
            outcome = ?result.outcome,
            rounds = result.rounds,
            seed = result.seed,
            "combat resolved"
        );

        Ok(CombatReport {
            result,
            narration,
            log,
        })
    }

    /// Pick the acting combatant's action
    ///
    /// Enemy turns and auto-protagonist turns go through the archetype AI,
    /// which only emits legal actions. Provider turns are bounded by the
    /// decision timeout and a retry budget; exhausting either forfeits the
    /// turn to `Defend`.
    async fn select_action(
        &mut self,
        provider: &mut dyn ActionProvider,
        actor: CombatantId,
        log: &mut Vec<CombatEvent>,
        sink: &mut dyn EventSink,
    ) -> Result<Action> {
        let combatant = self
            .manager
            .combatant(actor)
            .ok_or(CombatError::UnknownCombatant(actor))?;

        if combatant.team == Team::Enemy || self.auto_protagonist {
            let archetype = combatant
                .sheet
                .archetype
                .unwrap_or(crate::core::types::Archetype::Balanced);
            let profile = self.profiles.get(archetype).clone();
            let ctx = DecisionContext::from_manager(&self.manager, &profile);
            return Ok(ai::decide(&ctx, combatant));
        }

        let timeout = Duration::from_millis(self.manager.config().decision_timeout_ms);
        let view = TurnView::capture(&self.manager, actor);

        for _ in 0..MAX_REJECTED_ACTIONS {
            let chosen = match tokio::time::timeout(timeout, provider.choose(&view)).await {
                Ok(Ok(action)) => action,
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "action provider failed, defending");
                    return Ok(Action::Defend);
                }
                Err(_) => {
                    tracing::warn!(timeout_ms = timeout.as_millis() as u64, "action provider timed out, defending");
                    return Ok(Action::Defend);
                }
            };

            match self.manager.validate(actor, &chosen) {
                Ok(()) => return Ok(chosen),
                Err(err) if err.is_validation() => {
                    let event = CombatEvent::ActionRejected {
                        round: self.manager.round(),
                        actor,
                        reason: err.to_string(),
                    };
                    sink.emit(&event);
                    log.push(event);
                    tracing::debug!(error = %err, "action rejected, asking again");
                }
                Err(err) => return Err(err),
            }
        }

        tracing::warn!("retry budget exhausted, defending");
        Ok(Action::Defend)
    }

    /// Narrate a round, degrading to template text on error or timeout
    async fn narrate(&self, summary: &RoundSummary) -> String {
        let timeout = Duration::from_millis(self.manager.config().narration_timeout_ms);
        match tokio::time::timeout(timeout, self.narrator.narrate_round(summary)).await {
            Ok(Ok(text)) => text,
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "narrator failed, using template");
                TemplateNarrator.render(summary)
            }
            Err(_) => {
                tracing::warn!("narrator timed out, using template");
                TemplateNarrator.render(summary)
            }
        }
    }
}
