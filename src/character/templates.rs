//! Enemy templates instantiated per encounter
//!
//! Templates scale their stat block with the spawned level so enemies stay
//! level-appropriate without a separate progression table.

use crate::character::{
    Ability, CharacterSheet, Item, ItemStack, LootDrop, LootTable, Stats, Weapon,
};
use crate::core::types::{Archetype, DangerTier};
use crate::position::Range;

/// A reusable enemy definition
#[derive(Debug, Clone)]
pub struct EnemyTemplate {
    pub name: &'static str,
    pub base: Stats,
    pub weapon: Weapon,
    pub abilities: Vec<Ability>,
    pub archetype: Archetype,
    /// Rank this enemy opens combat at relative to the protagonist
    pub opening_range: Range,
    pub loot: LootTable,
}

impl EnemyTemplate {
    /// Build a combat-ready sheet at the given level
    ///
    /// Per-level growth: +4 hp, +1 attack/defense/agility, +2 accuracy,
    /// +1 evasion, and loot xp/gold scale linearly.
    pub fn instantiate(&self, level: u32) -> CharacterSheet {
        let lvl = level.max(1) as i32;
        let stats = Stats {
            max_hp: self.base.max_hp + 4 * (lvl - 1),
            attack: self.base.attack + (lvl - 1),
            defense: self.base.defense + (lvl - 1),
            accuracy: self.base.accuracy + 2 * (lvl - 1),
            evasion: self.base.evasion + (lvl - 1),
            agility: self.base.agility + (lvl - 1),
            max_stamina: self.base.max_stamina + 2 * (lvl - 1),
            max_mana: self.base.max_mana + (lvl - 1),
        };
        let loot = LootTable {
            experience: self.loot.experience * level.max(1),
            gold_min: self.loot.gold_min * level.max(1),
            gold_max: self.loot.gold_max * level.max(1),
            drops: self.loot.drops.clone(),
        };
        CharacterSheet {
            name: self.name.into(),
            level: level.max(1),
            hp: stats.max_hp,
            stamina: stats.max_stamina,
            mana: stats.max_mana,
            stats,
            weapon: self.weapon.clone(),
            abilities: self.abilities.clone(),
            inventory: Vec::new(),
            loot: Some(loot),
            archetype: Some(self.archetype),
        }
    }
}

fn base_stats(hp: i32, attack: i32, defense: i32, accuracy: i32, evasion: i32, agility: i32) -> Stats {
    Stats {
        max_hp: hp,
        attack,
        defense,
        accuracy,
        evasion,
        agility,
        max_stamina: 20,
        max_mana: 10,
    }
}

pub fn giant_rat() -> EnemyTemplate {
    EnemyTemplate {
        name: "Giant Rat",
        base: base_stats(12, 4, 1, 45, 18, 14),
        weapon: Weapon::claws(),
        abilities: vec![],
        archetype: Archetype::Coward,
        opening_range: Range::Close,
        loot: LootTable {
            experience: 8,
            gold_min: 0,
            gold_max: 3,
            drops: vec![],
        },
    }
}

pub fn dire_wolf() -> EnemyTemplate {
    EnemyTemplate {
        name: "Dire Wolf",
        base: base_stats(20, 7, 2, 55, 15, 16),
        weapon: Weapon::claws(),
        abilities: vec![],
        archetype: Archetype::Aggressive,
        opening_range: Range::Close,
        loot: LootTable {
            experience: 14,
            gold_min: 0,
            gold_max: 4,
            drops: vec![],
        },
    }
}

pub fn bandit() -> EnemyTemplate {
    EnemyTemplate {
        name: "Bandit",
        base: base_stats(24, 7, 3, 55, 12, 11),
        weapon: Weapon::shortsword(),
        abilities: vec![],
        archetype: Archetype::Balanced,
        opening_range: Range::Close,
        loot: LootTable {
            experience: 18,
            gold_min: 3,
            gold_max: 10,
            drops: vec![LootDrop {
                item: Item::stamina_tonic(),
                chance: 0.25,
            }],
        },
    }
}

pub fn bandit_archer() -> EnemyTemplate {
    EnemyTemplate {
        name: "Bandit Archer",
        base: base_stats(18, 6, 2, 60, 14, 12),
        weapon: Weapon::hunting_bow(),
        abilities: vec![],
        archetype: Archetype::Balanced,
        opening_range: Range::Long,
        loot: LootTable {
            experience: 18,
            gold_min: 3,
            gold_max: 9,
            drops: vec![],
        },
    }
}

pub fn gravemarsh_shade() -> EnemyTemplate {
    EnemyTemplate {
        name: "Gravemarsh Shade",
        base: base_stats(22, 6, 2, 58, 20, 13),
        weapon: Weapon::claws(),
        abilities: vec![Ability::shadow_bolt()],
        archetype: Archetype::Defensive,
        opening_range: Range::Medium,
        loot: LootTable {
            experience: 26,
            gold_min: 4,
            gold_max: 12,
            drops: vec![LootDrop {
                item: Item::healing_draught(),
                chance: 0.3,
            }],
        },
    }
}

pub fn cult_mender() -> EnemyTemplate {
    EnemyTemplate {
        name: "Cult Mender",
        base: base_stats(20, 4, 2, 50, 10, 9),
        weapon: Weapon::cudgel(),
        abilities: vec![Ability::mend_wounds(), Ability::venom_spit()],
        archetype: Archetype::Support,
        opening_range: Range::Medium,
        loot: LootTable {
            experience: 24,
            gold_min: 5,
            gold_max: 14,
            drops: vec![LootDrop {
                item: Item::healing_draught(),
                chance: 0.5,
            }],
        },
    }
}

pub fn marsh_ogre() -> EnemyTemplate {
    EnemyTemplate {
        name: "Marsh Ogre",
        base: base_stats(40, 11, 5, 50, 6, 7),
        weapon: Weapon::cudgel(),
        abilities: vec![],
        archetype: Archetype::Aggressive,
        opening_range: Range::Close,
        loot: LootTable {
            experience: 40,
            gold_min: 10,
            gold_max: 25,
            drops: vec![LootDrop {
                item: Item::healing_draught(),
                chance: 0.4,
            }],
        },
    }
}

/// Spawn pool for a danger tier. Safe has no pool; the encounter system
/// never rolls there.
pub fn pool_for_tier(tier: DangerTier) -> Vec<EnemyTemplate> {
    match tier {
        DangerTier::Safe => vec![],
        DangerTier::Low => vec![giant_rat(), dire_wolf()],
        DangerTier::Medium => vec![dire_wolf(), bandit(), bandit_archer()],
        DangerTier::High => vec![bandit(), bandit_archer(), gravemarsh_shade(), cult_mender()],
        DangerTier::Deadly => vec![marsh_ogre(), gravemarsh_shade(), cult_mender()],
    }
}
