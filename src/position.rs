//! Categorical positioning between combatant pairs
//!
//! No coordinates, no pathfinding. Every pair of combatants is exactly one
//! of four tactical ranks apart, and only `shift` changes a pair, one rank
//! per call.

use crate::core::error::{CombatError, Result};
use crate::core::types::CombatantId;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

/// Categorical distance rank. Ordered: Melee < Close < Medium < Long.
///
/// A range requirement is a maximum: a `Medium`-range attack is usable at
/// melee, close, or medium but not long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Range {
    Melee,
    Close,
    Medium,
    Long,
}

impl Range {
    /// One rank nearer, saturating at melee
    pub fn closer(self) -> Range {
        match self {
            Range::Melee | Range::Close => Range::Melee,
            Range::Medium => Range::Close,
            Range::Long => Range::Medium,
        }
    }

    /// One rank farther, saturating at long
    pub fn farther(self) -> Range {
        match self {
            Range::Melee => Range::Close,
            Range::Close => Range::Medium,
            Range::Medium | Range::Long => Range::Long,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Range::Melee => "melee",
            Range::Close => "close",
            Range::Medium => "medium",
            Range::Long => "long",
        }
    }
}

/// Direction of a one-rank move relative to another combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDirection {
    Closer,
    Farther,
}

/// Symmetric pair-distance state for one combat
///
/// Owned exclusively by a single `CombatManager`; never shared across
/// combats. Purely positional: resource costs for moving are the
/// manager's business.
#[derive(Debug, Clone, Default)]
pub struct PositionManager {
    ranges: AHashMap<(CombatantId, CombatantId), Range>,
    known: AHashSet<CombatantId>,
}

/// Normalize an unordered pair to a stable key
fn pair(a: CombatantId, b: CombatantId) -> (CombatantId, CombatantId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl PositionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a combatant. Pairs involving it default to `Close` until
    /// set explicitly.
    pub fn register(&mut self, id: CombatantId) {
        self.known.insert(id);
    }

    fn check_known(&self, id: CombatantId) -> Result<()> {
        if self.known.contains(&id) {
            Ok(())
        } else {
            Err(CombatError::UnknownCombatant(id))
        }
    }

    /// Set a pair's distance directly. Used only while seeding starting
    /// positions at combat start; during combat only `shift` moves pairs.
    pub fn set_distance(&mut self, a: CombatantId, b: CombatantId, range: Range) -> Result<()> {
        self.check_known(a)?;
        self.check_known(b)?;
        self.ranges.insert(pair(a, b), range);
        Ok(())
    }

    /// Current distance rank between two combatants
    ///
    /// A combatant is at melee with itself, so self-targeted actions never
    /// fail range validation.
    pub fn distance(&self, a: CombatantId, b: CombatantId) -> Result<Range> {
        self.check_known(a)?;
        self.check_known(b)?;
        if a == b {
            return Ok(Range::Melee);
        }
        Ok(self.ranges.get(&pair(a, b)).copied().unwrap_or(Range::Close))
    }

    /// True iff the actual distance is at or inside the required rank
    pub fn in_range(&self, a: CombatantId, b: CombatantId, required: Range) -> Result<bool> {
        Ok(self.distance(a, b)? <= required)
    }

    /// Shift `actor` one rank closer to or farther from `relative_to`.
    ///
    /// Saturates at the melee/long extremes: shifting past an extreme is a
    /// no-op, not an error. Returns the resulting distance.
    pub fn shift(
        &mut self,
        actor: CombatantId,
        direction: MoveDirection,
        relative_to: CombatantId,
    ) -> Result<Range> {
        let current = self.distance(actor, relative_to)?;
        let next = match direction {
            MoveDirection::Closer => current.closer(),
            MoveDirection::Farther => current.farther(),
        };
        if actor != relative_to {
            self.ranges.insert(pair(actor, relative_to), next);
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mgr_with_two() -> (PositionManager, CombatantId, CombatantId) {
        let mut mgr = PositionManager::new();
        let a = CombatantId::new();
        let b = CombatantId::new();
        mgr.register(a);
        mgr.register(b);
        (mgr, a, b)
    }

    #[test]
    fn test_unknown_combatant_rejected() {
        let (mgr, a, _) = mgr_with_two();
        let stranger = CombatantId::new();
        assert!(matches!(
            mgr.distance(a, stranger),
            Err(CombatError::UnknownCombatant(_))
        ));
    }

    #[test]
    fn test_closer_walk_saturates_at_melee() {
        let (mut mgr, a, b) = mgr_with_two();
        mgr.set_distance(a, b, Range::Long).unwrap();

        assert_eq!(mgr.shift(a, MoveDirection::Closer, b).unwrap(), Range::Medium);
        assert_eq!(mgr.shift(a, MoveDirection::Closer, b).unwrap(), Range::Close);
        assert_eq!(mgr.shift(a, MoveDirection::Closer, b).unwrap(), Range::Melee);
        // Saturated: further shifts are no-ops
        assert_eq!(mgr.shift(a, MoveDirection::Closer, b).unwrap(), Range::Melee);
        assert_eq!(mgr.distance(a, b).unwrap(), Range::Melee);
    }

    #[test]
    fn test_farther_walk_saturates_at_long() {
        let (mut mgr, a, b) = mgr_with_two();
        mgr.set_distance(a, b, Range::Melee).unwrap();

        assert_eq!(mgr.shift(a, MoveDirection::Farther, b).unwrap(), Range::Close);
        assert_eq!(mgr.shift(a, MoveDirection::Farther, b).unwrap(), Range::Medium);
        assert_eq!(mgr.shift(a, MoveDirection::Farther, b).unwrap(), Range::Long);
        assert_eq!(mgr.shift(a, MoveDirection::Farther, b).unwrap(), Range::Long);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let (mut mgr, a, b) = mgr_with_two();
        mgr.set_distance(a, b, Range::Medium).unwrap();
        assert_eq!(mgr.distance(a, b).unwrap(), mgr.distance(b, a).unwrap());

        mgr.shift(b, MoveDirection::Closer, a).unwrap();
        assert_eq!(mgr.distance(a, b).unwrap(), Range::Close);
    }

    #[test]
    fn test_in_range_melee_requires_exact_melee() {
        let (mut mgr, a, b) = mgr_with_two();
        for d in [Range::Close, Range::Medium, Range::Long] {
            mgr.set_distance(a, b, d).unwrap();
            assert!(!mgr.in_range(a, b, Range::Melee).unwrap());
        }
        mgr.set_distance(a, b, Range::Melee).unwrap();
        assert!(mgr.in_range(a, b, Range::Melee).unwrap());
    }

    #[test]
    fn test_long_requirement_is_satisfied_anywhere() {
        let (mut mgr, a, b) = mgr_with_two();
        for d in [Range::Melee, Range::Close, Range::Medium, Range::Long] {
            mgr.set_distance(a, b, d).unwrap();
            assert!(mgr.in_range(a, b, Range::Long).unwrap());
        }
    }

    #[test]
    fn test_self_distance_is_melee() {
        let (mgr, a, _) = mgr_with_two();
        assert_eq!(mgr.distance(a, a).unwrap(), Range::Melee);
    }
}
