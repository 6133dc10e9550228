//! One pure decision function per behavior archetype
//!
//! Shared shape, in priority order: the archetype's emergency rule, then
//! a move toward the range its preferred action needs, then the
//! highest-scoring legal action, then `Defend` when nothing is legal.

pub mod aggressive;
pub mod balanced;
pub mod coward;
pub mod defensive;
pub mod support;
