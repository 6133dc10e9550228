//! Read-only view of combat state handed to the decision functions

use crate::ai::ArchetypeProfile;
use crate::combat::{CombatManager, Combatant};
use crate::core::config::CombatConfig;
use crate::core::types::CombatantId;
use crate::position::{PositionManager, Range};

/// Everything an archetype needs to pick an action, borrowed from the
/// manager for the duration of one decision
pub struct DecisionContext<'a> {
    pub combatants: &'a [Combatant],
    pub positions: &'a PositionManager,
    pub config: &'a CombatConfig,
    /// Tuning for the archetype currently deciding
    pub profile: &'a ArchetypeProfile,
}

impl<'a> DecisionContext<'a> {
    pub fn new(
        combatants: &'a [Combatant],
        positions: &'a PositionManager,
        config: &'a CombatConfig,
        profile: &'a ArchetypeProfile,
    ) -> Self {
        Self {
            combatants,
            positions,
            config,
            profile,
        }
    }

    pub fn from_manager(manager: &'a CombatManager, profile: &'a ArchetypeProfile) -> Self {
        Self::new(
            manager.combatants(),
            manager.positions(),
            manager.config(),
            profile,
        )
    }

    /// Opposing combatants still in the fight
    pub fn active_enemies(&self, actor: &Combatant) -> Vec<&'a Combatant> {
        self.combatants
            .iter()
            .filter(|c| c.team != actor.team && c.is_active())
            .collect()
    }

    /// Living allies, the actor included
    pub fn active_allies(&self, actor: &Combatant) -> Vec<&'a Combatant> {
        self.combatants
            .iter()
            .filter(|c| c.team == actor.team && c.is_active())
            .collect()
    }

    /// Distance between two registered combatants. Ids come from the same
    /// manager as this context, so lookup failure collapses to `Close`.
    pub fn distance(&self, a: CombatantId, b: CombatantId) -> Range {
        self.positions.distance(a, b).unwrap_or(Range::Close)
    }

    pub fn in_range(&self, a: CombatantId, b: CombatantId, required: Range) -> bool {
        self.distance(a, b) <= required
    }

    /// Nearest active enemy; ties break by roster position so decisions
    /// replay identically
    pub fn nearest_enemy(&self, actor: &Combatant) -> Option<&'a Combatant> {
        self.active_enemies(actor)
            .into_iter()
            .min_by_key(|e| (self.distance(actor.id, e.id), e.roster_index))
    }

    /// Most wounded living ally (actor included), by hp fraction
    pub fn most_wounded_ally(&self, actor: &Combatant) -> Option<&'a Combatant> {
        self.active_allies(actor).into_iter().min_by(|a, b| {
            a.sheet
                .hp_fraction()
                .partial_cmp(&b.sheet.hp_fraction())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.roster_index.cmp(&b.roster_index))
        })
    }

    /// Whether the actor can pay for a one-rank move
    pub fn can_move(&self, actor: &Combatant) -> bool {
        actor.sheet.stamina >= self.config.move_stamina_cost
    }
}
