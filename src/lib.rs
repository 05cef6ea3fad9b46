//! # Frag Ledger
//!
//! Career statistics, head-to-head records and team balancing for a
//! tactical team shooter, computed from normalized per-match records.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (match records, aggregates, duels, rosters)
//! - **calculate**: Aggregation, derived metrics, duel reconciliation, team balancing
//! - **storage**: JSONL match store used by the command-line tool
//! - **config**: Configuration loading and validation
//!
//! Every computation is a pure function of the match collection it is given.
//! Callers re-run them after any insert, delete or bulk replace of matches.

pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;

pub use models::*;
