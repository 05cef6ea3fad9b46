//! Core data models for the stats engine.

mod duel;
mod ids;
mod match_record;
mod roster;
mod stats;

pub use duel::*;
pub use ids::*;
pub use match_record::*;
pub use roster::*;
pub use stats::*;
