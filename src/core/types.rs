//! Core type definitions used throughout the combat engine

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a combatant within one combat instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombatantId(pub Uuid);

impl CombatantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CombatantId {
    fn default() -> Self {
        Self::new()
    }
}

/// Which side of a combat a combatant fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Player,
    Enemy,
}

impl Team {
    pub fn opposing(self) -> Team {
        match self {
            Team::Player => Team::Enemy,
            Team::Enemy => Team::Player,
        }
    }
}

/// Location danger classification controlling encounter probability
/// and enemy strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DangerTier {
    Safe,
    Low,
    Medium,
    High,
    Deadly,
}

/// Time of day, as coarse as the encounter system cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

/// Behavior archetype assigned to every non-player combatant at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Aggressive,
    Defensive,
    Balanced,
    Support,
    Coward,
}

impl Archetype {
    pub const ALL: [Archetype; 5] = [
        Archetype::Aggressive,
        Archetype::Defensive,
        Archetype::Balanced,
        Archetype::Support,
        Archetype::Coward,
    ];

    /// Profile file stem under `data/archetypes/`
    pub fn name(self) -> &'static str {
        match self {
            Archetype::Aggressive => "aggressive",
            Archetype::Defensive => "defensive",
            Archetype::Balanced => "balanced",
            Archetype::Support => "support",
            Archetype::Coward => "coward",
        }
    }
}

/// Round counter within one combat
pub type Round = u32;
