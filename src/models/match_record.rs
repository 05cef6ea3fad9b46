//! Normalized match records.
//!
//! One `MatchRecord` per ingested match file, holding one `PlayerMatchRecord`
//! per participant. Records arrive already validated; older files lack trade
//! and clutch fields, which deserialize to zero.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_steam_id, EntityId, MatchId, SteamId};

/// Clutch rounds won, by number of opponents left alive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClutchBrackets {
    #[serde(default, rename = "1v1")]
    pub v1: u32,
    #[serde(default, rename = "1v2")]
    pub v2: u32,
    #[serde(default, rename = "1v3")]
    pub v3: u32,
    #[serde(default, rename = "1v4")]
    pub v4: u32,
    #[serde(default, rename = "1v5")]
    pub v5: u32,
}

impl ClutchBrackets {
    /// Total clutches won across all brackets.
    pub fn total(&self) -> u32 {
        self.v1 + self.v2 + self.v3 + self.v4 + self.v5
    }
}

/// One side of a head-to-head, as recorded on the owning player's record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelEntry {
    pub opponent_name: String,

    /// Times the owner killed the opponent
    pub kills: u32,

    /// Times the opponent killed the owner
    pub deaths: u32,

    /// Always `kills - deaths`
    pub diff: i64,
}

impl DuelEntry {
    pub fn new(opponent_name: impl Into<String>, kills: u32, deaths: u32) -> Self {
        Self {
            opponent_name: opponent_name.into(),
            kills,
            deaths,
            diff: i64::from(kills) - i64::from(deaths),
        }
    }
}

/// A single player's performance in a single match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMatchRecord {
    /// Display name at the time of the match
    pub name: String,

    #[serde(deserialize_with = "deserialize_steam_id")]
    pub steam_id: SteamId,

    /// Team label (e.g. "Team A")
    #[serde(default)]
    pub team: String,

    /// Starting side, when known
    #[serde(default)]
    pub side: Option<String>,

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

    #[serde(default)]
    pub trade_kills: u32,

    #[serde(default)]
    pub clutches: ClutchBrackets,

    /// Composite per-match rating
    pub rating: f64,

    /// Head-to-head entries keyed by opponent steam ID
    #[serde(default)]
    pub duels: BTreeMap<SteamId, DuelEntry>,
}

impl PlayerMatchRecord {
    /// Create an empty record for a player; counting stats start at zero.
    pub fn new(steam_id: impl Into<SteamId>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steam_id: steam_id.into(),
            team: String::new(),
            side: None,
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
            clutches: ClutchBrackets::default(),
            rating: 0.0,
            duels: BTreeMap::new(),
        }
    }

    /// Builder method to set the team label.
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = team.into();
        self
    }

    /// Builder method to record a head-to-head against an opponent.
    pub fn with_duel(mut self, opponent_id: impl Into<SteamId>, entry: DuelEntry) -> Self {
        self.duels.insert(opponent_id.into(), entry);
        self
    }

    /// Look up this player's recorded duel against an opponent.
    pub fn duel_against(&self, opponent_id: &str) -> Option<&DuelEntry> {
        self.duels.get(opponent_id)
    }
}

/// A parsed match with all of its participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Unique identifier (derived from source_file)
    #[serde(default)]
    pub id: MatchId,

    /// Name of the file the match was ingested from
    pub source_file: String,

    /// When the match was played, if it could be determined
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,

    /// One record per participant
    pub players: Vec<PlayerMatchRecord>,
}

impl MatchRecord {
    /// Create a new MatchRecord with an ID derived from the source filename.
    pub fn new(
        source_file: impl Into<String>,
        timestamp: Option<DateTime<Utc>>,
        players: Vec<PlayerMatchRecord>,
    ) -> Self {
        let source_file = source_file.into();
        let id = EntityId::generate(&[&source_file]);

        Self {
            id,
            source_file,
            timestamp,
            players,
        }
    }

    /// Derive the ID from the source filename if the record arrived without one.
    pub fn ensure_id(&mut self) {
        if self.id.is_empty() {
            self.id = EntityId::generate(&[&self.source_file]);
        }
    }

    /// Find a participant by steam ID.
    pub fn player(&self, steam_id: &str) -> Option<&PlayerMatchRecord> {
        self.players.iter().find(|p| p.steam_id == steam_id)
    }

    /// Whether the given steam ID took part in this match.
    pub fn has_player(&self, steam_id: &str) -> bool {
        self.player(steam_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clutch_total() {
        let clutches = ClutchBrackets {
            v1: 2,
            v2: 1,
            ..Default::default()
        };
        assert_eq!(clutches.total(), 3);
    }

    #[test]
    fn test_duel_entry_diff() {
        assert_eq!(DuelEntry::new("bob", 3, 5).diff, -2);
        assert_eq!(DuelEntry::new("bob", 4, 1).diff, 3);
    }

    #[test]
    fn test_legacy_record_defaults_optional_fields() {
        let json = r#"{
            "name": "alice",
            "steam_id": 76561198000000001,
            "kills": 20, "deaths": 10, "assists": 4,
            "rounds_played": 24, "damage_total": 2100,
            "sniper_kills": 2, "utility_damage": 150, "flashes_thrown": 6,
            "opening_kills": 3, "opening_deaths": 2, "opening_attempts": 5,
            "rating": 1.21
        }"#;

        let record: PlayerMatchRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.steam_id, "76561198000000001");
        assert_eq!(record.trade_kills, 0);
        assert_eq!(record.clutches.total(), 0);
        assert!(record.duels.is_empty());
        assert_eq!(record.team, "");
    }

    #[test]
    fn test_partial_clutch_brackets() {
        let clutches: ClutchBrackets = serde_json::from_str(r#"{"1v1": 2, "1v3": 1}"#).unwrap();
        assert_eq!(clutches.v1, 2);
        assert_eq!(clutches.v2, 0);
        assert_eq!(clutches.v3, 1);
        assert_eq!(clutches.total(), 3);
    }

    #[test]
    fn test_match_id_deterministic() {
        let m1 = MatchRecord::new("match_01.json", None, vec![]);
        let m2 = MatchRecord::new("match_01.json", None, vec![]);
        let m3 = MatchRecord::new("match_02.json", None, vec![]);
        assert_eq!(m1.id, m2.id);
        assert_ne!(m1.id, m3.id);
    }

    #[test]
    fn test_ensure_id_fills_missing() {
        let mut m: MatchRecord =
            serde_json::from_str(r#"{"source_file": "match_01.json", "players": []}"#).unwrap();
        assert!(m.id.is_empty());
        assert!(m.timestamp.is_none());

        m.ensure_id();
        assert_eq!(m.id, MatchRecord::new("match_01.json", None, vec![]).id);
    }

    #[test]
    fn test_match_player_lookup() {
        let m = MatchRecord::new(
            "match_01.json",
            None,
            vec![
                PlayerMatchRecord::new("1", "alice").with_team("A"),
                PlayerMatchRecord::new("2", "bob").with_team("B"),
            ],
        );

        assert_eq!(m.player("2").map(|p| p.name.as_str()), Some("bob"));
        assert!(m.has_player("1"));
        assert!(!m.has_player("3"));
    }

    #[test]
    fn test_match_serialization() {
        let m = MatchRecord::new(
            "match_01.json",
            None,
            vec![PlayerMatchRecord::new("1", "alice").with_duel("2", DuelEntry::new("bob", 2, 1))],
        );

        let json = serde_json::to_string(&m).unwrap();
        let deserialized: MatchRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
