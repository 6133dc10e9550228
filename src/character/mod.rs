//! Character data the combat engine operates on
//!
//! A `CharacterSheet` belongs to the character subsystem and outlives any
//! single combat. Combat takes ownership of the sheets at start and hands
//! them back in the final snapshot, so damage, healing, spent resources
//! and consumed items persist afterwards.

pub mod templates;

use crate::core::types::Archetype;
use crate::position::Range;
use crate::status::StatusEffect;
use serde::{Deserialize, Serialize};

/// Persistent stat block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub accuracy: i32,
    pub evasion: i32,
    /// Secondary stat: drives initiative and flee contests
    pub agility: i32,
    pub max_stamina: i32,
    pub max_mana: i32,
}

/// Equipped weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub damage: i32,
    /// Maximum rank the weapon reaches; usable at this rank or nearer
    pub range: Range,
    pub stamina_cost: i32,
}

impl Weapon {
    pub fn shortsword() -> Self {
        Self {
            name: "Shortsword".into(),
            damage: 8,
            range: Range::Melee,
            stamina_cost: 4,
        }
    }

    pub fn spear() -> Self {
        Self {
            name: "Spear".into(),
            damage: 7,
            range: Range::Close,
            stamina_cost: 4,
        }
    }

    pub fn hunting_bow() -> Self {
        Self {
            name: "Hunting Bow".into(),
            damage: 6,
            range: Range::Long,
            stamina_cost: 3,
        }
    }

    pub fn claws() -> Self {
        Self {
            name: "Claws".into(),
            damage: 5,
            range: Range::Melee,
            stamina_cost: 2,
        }
    }

    pub fn cudgel() -> Self {
        Self {
            name: "Cudgel".into(),
            damage: 10,
            range: Range::Melee,
            stamina_cost: 6,
        }
    }

    /// Whether this weapon's nominal band is beyond arm's reach
    pub fn is_ranged(&self) -> bool {
        self.range >= Range::Medium
    }
}

/// What an ability does when it connects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Offensive: rolls to hit, deals `power`-based damage
    Damage { power: i32 },
    /// Restores `power` hp to a living ally (or self); never misses
    Heal { power: i32 },
    /// Attaches a status effect to the target; never misses
    ApplyStatus { effect: StatusEffect },
}

/// A known ability with its resource gates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub kind: AbilityKind,
    pub range: Range,
    pub mana_cost: i32,
    /// Turns of the user before the ability is ready again
    pub cooldown: u32,
}

impl Ability {
    pub fn mend_wounds() -> Self {
        Self {
            name: "Mend Wounds".into(),
            kind: AbilityKind::Heal { power: 12 },
            range: Range::Close,
            mana_cost: 6,
            cooldown: 2,
        }
    }

    pub fn venom_spit() -> Self {
        Self {
            name: "Venom Spit".into(),
            kind: AbilityKind::ApplyStatus {
                effect: StatusEffect::poison(3, 3),
            },
            range: Range::Medium,
            mana_cost: 4,
            cooldown: 3,
        }
    }

    pub fn shadow_bolt() -> Self {
        Self {
            name: "Shadow Bolt".into(),
            kind: AbilityKind::Damage { power: 11 },
            range: Range::Long,
            mana_cost: 5,
            cooldown: 2,
        }
    }

    /// Whether this ability targets the user's own side
    pub fn is_friendly(&self) -> bool {
        match &self.kind {
            AbilityKind::Heal { .. } => true,
            AbilityKind::Damage { .. } => false,
            AbilityKind::ApplyStatus { effect } => !matches!(
                effect.kind,
                crate::status::StatusKind::DamageOverTime { .. }
            ),
        }
    }
}

/// Consumable item effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    HealHp(i32),
    RestoreStamina(i32),
    RestoreMana(i32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub kind: ItemKind,
}

impl Item {
    pub fn healing_draught() -> Self {
        Self {
            name: "Healing Draught".into(),
            kind: ItemKind::HealHp(15),
        }
    }

    pub fn stamina_tonic() -> Self {
        Self {
            name: "Stamina Tonic".into(),
            kind: ItemKind::RestoreStamina(10),
        }
    }
}

/// An inventory slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: Item,
    pub quantity: u32,
}

/// Rewards carried by a defeated enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootTable {
    pub experience: u32,
    pub gold_min: u32,
    pub gold_max: u32,
    /// Each drop rolls independently against its chance in [0, 1]
    pub drops: Vec<LootDrop>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootDrop {
    pub item: Item,
    pub chance: f32,
}

/// One character as combat sees it: stats, pools, equipment, abilities,
/// inventory, and (for enemies) loot plus a behavior archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub name: String,
    pub level: u32,
    pub stats: Stats,
    pub hp: i32,
    pub stamina: i32,
    pub mana: i32,
    pub weapon: Weapon,
    pub abilities: Vec<Ability>,
    pub inventory: Vec<ItemStack>,
    pub loot: Option<LootTable>,
    /// None for player-controlled characters
    pub archetype: Option<Archetype>,
}

impl CharacterSheet {
    /// A fresh adventurer at the given level, full pools
    pub fn adventurer(name: impl Into<String>, level: u32) -> Self {
        let lvl = level as i32;
        let stats = Stats {
            max_hp: 30 + 6 * lvl,
            attack: 6 + 2 * lvl,
            defense: 3 + lvl,
            accuracy: 55 + 3 * lvl,
            evasion: 12 + 2 * lvl,
            agility: 10 + lvl,
            max_stamina: 20 + 3 * lvl,
            max_mana: 10 + 2 * lvl,
        };
        Self {
            name: name.into(),
            level,
            hp: stats.max_hp,
            stamina: stats.max_stamina,
            mana: stats.max_mana,
            stats,
            weapon: Weapon::shortsword(),
            abilities: vec![Ability::mend_wounds()],
            inventory: vec![ItemStack {
                item: Item::healing_draught(),
                quantity: 2,
            }],
            loot: None,
            archetype: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.stats.max_hp <= 0 {
            return 0.0;
        }
        self.hp as f32 / self.stats.max_hp as f32
    }

    /// Reduce hp, clamped at zero
    pub fn take_damage(&mut self, amount: i32) {
        self.hp = (self.hp - amount.max(0)).max(0);
    }

    /// Restore hp, clamped at the maximum
    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount.max(0)).min(self.stats.max_hp);
    }

    pub fn spend_stamina(&mut self, amount: i32) {
        self.stamina = (self.stamina - amount).max(0);
    }

    pub fn spend_mana(&mut self, amount: i32) {
        self.mana = (self.mana - amount).max(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut sheet = CharacterSheet::adventurer("Wren", 1);
        sheet.take_damage(9999);
        assert_eq!(sheet.hp, 0);
        assert!(!sheet.is_alive());
    }

    #[test]
    fn test_heal_clamps_at_max() {
        let mut sheet = CharacterSheet::adventurer("Wren", 1);
        sheet.take_damage(5);
        sheet.heal(9999);
        assert_eq!(sheet.hp, sheet.stats.max_hp);
    }

    #[test]
    fn test_hp_fraction_halves() {
        let mut sheet = CharacterSheet::adventurer("Wren", 1);
        sheet.hp = sheet.stats.max_hp / 2;
        assert!((sheet.hp_fraction() - 0.5).abs() < 0.05);
    }

    #[test]
    fn test_heal_ability_is_friendly() {
        assert!(Ability::mend_wounds().is_friendly());
        assert!(!Ability::shadow_bolt().is_friendly());
        assert!(!Ability::venom_spit().is_friendly());
    }

    #[test]
    fn test_bow_is_ranged() {
        assert!(Weapon::hunting_bow().is_ranged());
        assert!(!Weapon::shortsword().is_ranged());
    }
}
