//! Reconciled head-to-head records between two players.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MatchId, Role, SteamId};

/// Symmetric kill ledger between player A and player B.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelLedger {
    pub player_a: SteamId,
    pub player_b: SteamId,
    pub a_kills: u32,
    pub b_kills: u32,
}

impl DuelLedger {
    pub fn new(player_a: impl Into<SteamId>, player_b: impl Into<SteamId>) -> Self {
        Self {
            player_a: player_a.into(),
            player_b: player_b.into(),
            a_kills: 0,
            b_kills: 0,
        }
    }

    /// Kill difference from A's perspective.
    pub fn diff(&self) -> i64 {
        i64::from(self.a_kills) - i64::from(self.b_kills)
    }

    /// Total kills exchanged.
    pub fn total(&self) -> u32 {
        self.a_kills + self.b_kills
    }
}

/// One match's contribution to a duel ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelMatchEntry {
    pub match_id: MatchId,
    pub source_file: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub a_kills: u32,
    pub b_kills: u32,
    pub a_role: Role,
    pub b_role: Role,
    pub a_team: String,
    pub b_team: String,
}

/// Full reconciliation result: running totals plus newest-first history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelReport {
    pub ledger: DuelLedger,
    pub history: Vec<DuelMatchEntry>,
}
