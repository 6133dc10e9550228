//! Per-combat wrapper around a character sheet
//!
//! A `Combatant` lives exactly as long as one combat. The wrapped sheet is
//! handed back in the final snapshot; everything else here (initiative,
//! cooldowns, stance, statuses) is combat-scoped and discarded.

use crate::character::CharacterSheet;
use crate::core::types::{CombatantId, Team};
use crate::status::{self, ModifiedStat, StatusEffect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub team: Team,
    /// Fixed at combat start; never recomputed
    pub initiative: i32,
    /// Position in the starting roster, the final initiative tie-break
    pub roster_index: usize,
    pub sheet: CharacterSheet,
    pub statuses: Vec<StatusEffect>,
    /// Remaining cooldown per known ability, indexed like `sheet.abilities`
    pub cooldowns: Vec<u32>,
    /// Damage-reduction stance, cleared when the combatant next acts
    pub defending: bool,
    /// Left the combat alive; no longer targetable, never drops loot
    pub fled: bool,
}

impl Combatant {
    pub fn new(team: Team, roster_index: usize, sheet: CharacterSheet) -> Self {
        let cooldowns = vec![0; sheet.abilities.len()];
        Self {
            id: CombatantId::new(),
            team,
            initiative: 0,
            roster_index,
            sheet,
            statuses: Vec::new(),
            cooldowns,
            defending: false,
            fled: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.sheet.is_alive()
    }

    /// Still participating: alive and has not escaped
    pub fn is_active(&self) -> bool {
        self.is_alive() && !self.fled
    }

    /// Attack stat with active status modifiers folded in
    pub fn effective_attack(&self) -> i32 {
        self.sheet.stats.attack + status::modifier_total(&self.statuses, ModifiedStat::Attack)
    }

    pub fn effective_defense(&self) -> i32 {
        self.sheet.stats.defense + status::modifier_total(&self.statuses, ModifiedStat::Defense)
    }

    pub fn effective_accuracy(&self) -> i32 {
        self.sheet.stats.accuracy + status::modifier_total(&self.statuses, ModifiedStat::Accuracy)
    }

    pub fn effective_evasion(&self) -> i32 {
        self.sheet.stats.evasion + status::modifier_total(&self.statuses, ModifiedStat::Evasion)
    }

    /// Whether ability `index` is off cooldown
    pub fn ability_ready(&self, index: usize) -> bool {
        self.cooldowns.get(index).is_some_and(|c| *c == 0)
    }

    /// Count down every running cooldown by one turn
    pub fn tick_cooldowns(&mut self) {
        for cd in &mut self.cooldowns {
            *cd = cd.saturating_sub(1);
        }
    }
}
