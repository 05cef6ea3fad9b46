//! Roster pins and team balancing results.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SteamId;

/// Where a player has been manually placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterSlot {
    Team1,
    Team2,
    Bench,
}

/// Manual placements keyed by steam ID. Players without an entry are unassigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterAssignment {
    slots: HashMap<SteamId, RosterSlot>,
}

impl RosterAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin a player to a slot, replacing any earlier pin.
    pub fn pin(&mut self, steam_id: impl Into<SteamId>, slot: RosterSlot) {
        self.slots.insert(steam_id.into(), slot);
    }

    /// Builder form of [`RosterAssignment::pin`].
    pub fn with(mut self, steam_id: impl Into<SteamId>, slot: RosterSlot) -> Self {
        self.pin(steam_id, slot);
        self
    }

    /// Remove a pin, returning the player to the unassigned pool.
    pub fn unpin(&mut self, steam_id: &str) -> Option<RosterSlot> {
        self.slots.remove(steam_id)
    }

    /// The slot for a player, or `None` if unassigned.
    pub fn slot(&self, steam_id: &str) -> Option<RosterSlot> {
        self.slots.get(steam_id).copied()
    }
}

/// Partitioning strategy used by the balancer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStrategy {
    /// Highest rated first, onto the lighter team
    #[default]
    Greedy,
    /// Minimum rating gap over every possible fill
    Exhaustive,
}

impl fmt::Display for BalanceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceStrategy::Greedy => write!(f, "greedy"),
            BalanceStrategy::Exhaustive => write!(f, "exhaustive"),
        }
    }
}

impl FromStr for BalanceStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "greedy" => Ok(BalanceStrategy::Greedy),
            "exhaustive" => Ok(BalanceStrategy::Exhaustive),
            other => Err(format!("unknown balance strategy: {}", other)),
        }
    }
}

/// A player placed on a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub steam_id: SteamId,
    pub name: String,
    pub average_rating: f64,
    pub pinned: bool,
}

/// Two teams in placement order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamSplit {
    pub team1: Vec<TeamMember>,
    pub team2: Vec<TeamMember>,
}

impl TeamSplit {
    pub fn team1_rating(&self) -> f64 {
        self.team1.iter().map(|m| m.average_rating).sum()
    }

    pub fn team2_rating(&self) -> f64 {
        self.team2.iter().map(|m| m.average_rating).sum()
    }

    /// Absolute difference between the two rating totals.
    pub fn rating_gap(&self) -> f64 {
        (self.team1_rating() - self.team2_rating()).abs()
    }
}
