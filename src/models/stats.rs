//! Career statistics and derived metric models.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{PlayerMatchRecord, SteamId};

/// Role classification based on share of sniper kills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Rifler,
    Sniper,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Rifler => write!(f, "Rifler"),
            Role::Sniper => write!(f, "Sniper"),
        }
    }
}

/// Career totals for one steam ID across every match it appears in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPlayerStats {
    pub steam_id: SteamId,

    /// Name from the most recently replayed match
    pub name: String,

    /// Team label from the most recently replayed match
    pub last_team: String,

    /// Number of matches this player took part in
    pub matches: u32,

    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub rounds_played: u32,
    pub damage_total: u32,
    pub sniper_kills: u32,
    pub utility_damage: u32,
    pub flashes_thrown: u32,
    pub opening_kills: u32,
    pub opening_deaths: u32,
    pub opening_attempts: u32,
    pub trade_kills: u32,
    pub clutches_won: u32,

    /// Sum of per-match ratings
    pub rating_total: f64,
}

impl AggregatedPlayerStats {
    /// Create an empty aggregate for a player.
    pub fn new(steam_id: impl Into<SteamId>, name: impl Into<String>) -> Self {
        Self {
            steam_id: steam_id.into(),
            name: name.into(),
            last_team: String::new(),
            matches: 0,
            kills: 0,
            deaths: 0,
            assists: 0,
            rounds_played: 0,
            damage_total: 0,
            sniper_kills: 0,
            utility_damage: 0,
            flashes_thrown: 0,
            opening_kills: 0,
            opening_deaths: 0,
            opening_attempts: 0,
            trade_kills: 0,
            clutches_won: 0,
            rating_total: 0.0,
        }
    }

    /// Fold one match record into the running totals.
    ///
    /// Name and team are overwritten, so the last record absorbed wins.
    pub fn absorb(&mut self, record: &PlayerMatchRecord) {
        self.matches += 1;
        self.kills += record.kills;
        self.deaths += record.deaths;
        self.assists += record.assists;
        self.rounds_played += record.rounds_played;
        self.damage_total += record.damage_total;
        self.sniper_kills += record.sniper_kills;
        self.utility_damage += record.utility_damage;
        self.flashes_thrown += record.flashes_thrown;
        self.opening_kills += record.opening_kills;
        self.opening_deaths += record.opening_deaths;
        self.opening_attempts += record.opening_attempts;
        self.trade_kills += record.trade_kills;
        self.clutches_won += record.clutches.total();
        self.rating_total += record.rating;
        self.name.clone_from(&record.name);
        self.last_team.clone_from(&record.team);
    }

    /// Mean per-match rating, 0 when no matches were played.
    pub fn average_rating(&self) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            self.rating_total / self.matches as f64
        }
    }
}

/// Aggregates for every player, keyed by steam ID.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerAggregates {
    players: BTreeMap<SteamId, AggregatedPlayerStats>,
}

impl PlayerAggregates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the aggregate for a steam ID.
    pub fn get(&self, steam_id: &str) -> Option<&AggregatedPlayerStats> {
        self.players.get(steam_id)
    }

    /// Get or create the aggregate for a record's steam ID.
    pub(crate) fn entry_for(&mut self, record: &PlayerMatchRecord) -> &mut AggregatedPlayerStats {
        self.players
            .entry(record.steam_id.clone())
            .or_insert_with(|| AggregatedPlayerStats::new(record.steam_id.clone(), record.name.clone()))
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Iterate in steam ID order.
    pub fn iter(&self) -> impl Iterator<Item = &AggregatedPlayerStats> {
        self.players.values()
    }

    /// Players sorted by average rating (descending); ties keep steam ID order.
    pub fn sorted_by_rating(&self) -> Vec<&AggregatedPlayerStats> {
        let mut sorted: Vec<_> = self.players.values().collect();
        sorted.sort_by(|a, b| b.average_rating().total_cmp(&a.average_rating()));
        sorted
    }

    pub fn into_vec(self) -> Vec<AggregatedPlayerStats> {
        self.players.into_values().collect()
    }
}

/// Playstyle scores on a 0-100 scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaystyleScores {
    pub firepower: u8,
    pub entry: u8,
    pub opening: u8,
    pub trading: u8,
    pub clutching: u8,
    pub sniping: u8,
    pub utility: u8,
}

/// Rate statistics and composite scores for one stat line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMetrics {
    pub kpr: f64,
    pub dpr: f64,
    pub apr: f64,
    pub adr: f64,
    pub kd: f64,
    pub average_rating: f64,
    pub impact: f64,
    pub role: Role,
    pub playstyle: PlaystyleScores,
}
