//! Duskhollow - Turn-Based Combat Engine

pub mod ai;
pub mod character;
pub mod combat;
pub mod core;
pub mod encounter;
pub mod events;
pub mod narrate;
pub mod position;
pub mod runner;
pub mod status;
