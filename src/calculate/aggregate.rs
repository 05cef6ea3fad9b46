//! Career aggregation.
//!
//! Aggregates are always rebuilt by replaying the whole match collection, so
//! removing a match and re-running gives the same result as never having
//! added it. Replay runs oldest first, ordered by `(timestamp, match id)` with
//! untimestamped matches before any dated one, so the latest-wins name and
//! team come from the most recent match regardless of input order.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::models::{MatchRecord, PlayerAggregates};

/// Matches in the order they are folded into aggregates.
pub fn replay_order(matches: &[MatchRecord]) -> Vec<&MatchRecord> {
    let mut ordered: Vec<&MatchRecord> = matches.iter().collect();
    ordered.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
    ordered
}

/// Fold every match into one aggregate per steam ID.
pub fn aggregate(matches: &[MatchRecord]) -> PlayerAggregates {
    let mut aggregates = PlayerAggregates::new();

    for m in replay_order(matches) {
        let mut seen: HashSet<&str> = HashSet::with_capacity(m.players.len());

        for record in &m.players {
            if !seen.insert(record.steam_id.as_str()) {
                warn!(
                    "Steam ID {} listed twice in match {} ({}), counting once",
                    record.steam_id, m.id, m.source_file
                );
                continue;
            }
            aggregates.entry_for(record).absorb(record);
        }
    }

    debug!(
        "Aggregated {} players from {} matches",
        aggregates.len(),
        matches.len()
    );
    aggregates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClutchBrackets, PlayerMatchRecord};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn record(steam_id: &str, name: &str, kills: u32, deaths: u32, rating: f64) -> PlayerMatchRecord {
        let mut r = PlayerMatchRecord::new(steam_id, name);
        r.kills = kills;
        r.deaths = deaths;
        r.rounds_played = 24;
        r.damage_total = 2000;
        r.rating = rating;
        r
    }

    fn dated(file: &str, day: u32, players: Vec<PlayerMatchRecord>) -> MatchRecord {
        let ts = Utc.with_ymd_and_hms(2024, 5, day, 20, 0, 0).single();
        MatchRecord::new(file, ts, players)
    }

    fn sample_matches() -> Vec<MatchRecord> {
        vec![
            dated(
                "m1.json",
                1,
                vec![record("1", "alice", 20, 10, 1.2), record("2", "bob", 10, 20, 0.8)],
            ),
            dated(
                "m2.json",
                2,
                vec![record("1", "alice", 15, 15, 1.0), record("3", "carol", 25, 12, 1.5)],
            ),
            dated(
                "m3.json",
                3,
                vec![record("2", "bob", 18, 14, 1.1), record("3", "carol", 12, 18, 0.9)],
            ),
        ]
    }

    #[test]
    fn test_same_player_twice() {
        let m1 = MatchRecord::new("a.json", None, vec![record("1", "alice", 20, 10, 1.2)]);
        let m2 = MatchRecord::new("b.json", None, vec![record("1", "alice", 20, 10, 1.0)]);

        let aggregates = aggregate(&[m1, m2]);
        let alice = aggregates.get("1").unwrap();

        assert_eq!(aggregates.len(), 1);
        assert_eq!(alice.matches, 2);
        assert_eq!(alice.kills, 40);
        assert_eq!(alice.deaths, 20);
        assert_eq!(alice.rounds_played, 48);
        assert!((alice.average_rating() - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_idempotent() {
        let matches = sample_matches();
        assert_eq!(aggregate(&matches), aggregate(&matches));
    }

    #[test]
    fn test_aggregate_input_order_irrelevant() {
        let matches = sample_matches();
        let mut reversed = matches.clone();
        reversed.reverse();

        assert_eq!(aggregate(&matches), aggregate(&reversed));
    }

    #[test]
    fn test_removal_equals_never_added() {
        let matches = sample_matches();

        let without_second: Vec<MatchRecord> = matches
            .iter()
            .filter(|m| m.source_file != "m2.json")
            .cloned()
            .collect();
        let never_added = vec![matches[0].clone(), matches[2].clone()];

        assert_eq!(aggregate(&without_second), aggregate(&never_added));

        let full = aggregate(&matches);
        let reduced = aggregate(&without_second);
        let alice_full = full.get("1").unwrap();
        let alice_reduced = reduced.get("1").unwrap();
        assert_eq!(alice_full.matches, 2);
        assert_eq!(alice_reduced.matches, 1);
        assert!(alice_reduced.kills <= alice_full.kills);
    }

    #[test]
    fn test_name_latest_wins_by_timestamp() {
        let newest = dated("late.json", 20, vec![record("1", "alice_new", 1, 1, 1.0)]);
        let oldest = dated("early.json", 2, vec![record("1", "alice_old", 1, 1, 1.0)]);

        // Newest supplied first; replay order still puts it last.
        let aggregates = aggregate(&[newest, oldest]);
        assert_eq!(aggregates.get("1").unwrap().name, "alice_new");
    }

    #[test]
    fn test_untimestamped_matches_replay_first() {
        let undated = MatchRecord::new("undated.json", None, vec![record("1", "undated", 1, 1, 1.0)]);
        let dated_match = dated("dated.json", 1, vec![record("1", "dated", 1, 1, 1.0)]);

        let aggregates = aggregate(&[dated_match, undated]);
        assert_eq!(aggregates.get("1").unwrap().name, "dated");
    }

    #[test]
    fn test_clutch_brackets_summed() {
        let mut r = record("1", "alice", 10, 10, 1.0);
        r.clutches = ClutchBrackets {
            v1: 2,
            v2: 1,
            v3: 0,
            v4: 0,
            v5: 0,
        };
        let before = aggregate(&[MatchRecord::new("a.json", None, vec![record("1", "alice", 0, 0, 1.0)])]);
        let after = aggregate(&[
            MatchRecord::new("a.json", None, vec![record("1", "alice", 0, 0, 1.0)]),
            MatchRecord::new("b.json", None, vec![r]),
        ]);

        assert_eq!(
            after.get("1").unwrap().clutches_won - before.get("1").unwrap().clutches_won,
            3
        );
    }

    #[test]
    fn test_duplicate_participant_counted_once() {
        let m = MatchRecord::new(
            "dup.json",
            None,
            vec![record("1", "alice", 10, 5, 1.0), record("1", "alice", 10, 5, 1.0)],
        );

        let aggregates = aggregate(&[m]);
        let alice = aggregates.get("1").unwrap();
        assert_eq!(alice.matches, 1);
        assert_eq!(alice.kills, 10);
    }

    #[test]
    fn test_empty_collection() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_matches_counter_equals_participation() {
        let matches = sample_matches();
        let aggregates = aggregate(&matches);

        for player in aggregates.iter() {
            let expected = matches.iter().filter(|m| m.has_player(&player.steam_id)).count();
            assert_eq!(player.matches as usize, expected);
        }
    }
}
