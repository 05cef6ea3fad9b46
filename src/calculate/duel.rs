//! Head-to-head reconciliation.
//!
//! A duel between two players may be logged on either player's record, not
//! necessarily both. A's own entry is preferred; otherwise B's entry is read
//! from the other side.

use std::cmp::Ordering;

use tracing::debug;

use crate::config::MetricsConfig;
use crate::models::{DuelLedger, DuelMatchEntry, DuelReport, MatchRecord, PlayerAggregates, PlayerMatchRecord};

use super::metrics::classify_role;

/// Which side's record a match's duel tally was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuelLookup {
    /// A recorded the duel against B
    PreferA { a_kills: u32, b_kills: u32 },
    /// Only B recorded the duel against A
    FallbackB { a_kills: u32, b_kills: u32 },
    /// Neither side recorded it
    NoRecord,
}

impl DuelLookup {
    /// Resolve one match's duel between `a` and `b`.
    pub fn resolve(a: &PlayerMatchRecord, b: &PlayerMatchRecord) -> Self {
        if let Some(entry) = a.duel_against(&b.steam_id) {
            return DuelLookup::PreferA {
                a_kills: entry.kills,
                b_kills: entry.deaths,
            };
        }
        if let Some(entry) = b.duel_against(&a.steam_id) {
            return DuelLookup::FallbackB {
                a_kills: entry.deaths,
                b_kills: entry.kills,
            };
        }
        DuelLookup::NoRecord
    }

    /// Kills as `(a_kills, b_kills)`, if anything was recorded.
    pub fn tally(&self) -> Option<(u32, u32)> {
        match *self {
            DuelLookup::PreferA { a_kills, b_kills } | DuelLookup::FallbackB { a_kills, b_kills } => {
                Some((a_kills, b_kills))
            }
            DuelLookup::NoRecord => None,
        }
    }
}

/// Reconcile every duel between two players across all shared matches.
///
/// Returns `None` when either steam ID has no aggregate, or both IDs are the
/// same player. History is newest first; ties fall back to match ID.
pub fn reconcile(
    matches: &[MatchRecord],
    players: &PlayerAggregates,
    player_a: &str,
    player_b: &str,
    config: &MetricsConfig,
) -> Option<DuelReport> {
    if player_a == player_b {
        return None;
    }
    if players.get(player_a).is_none() || players.get(player_b).is_none() {
        debug!("Cannot reconcile {} vs {}: unknown player", player_a, player_b);
        return None;
    }

    let mut ledger = DuelLedger::new(player_a, player_b);
    let mut history = Vec::new();

    for m in matches {
        let (Some(a), Some(b)) = (m.player(player_a), m.player(player_b)) else {
            continue;
        };

        let Some((a_kills, b_kills)) = DuelLookup::resolve(a, b).tally() else {
            continue;
        };

        ledger.a_kills += a_kills;
        ledger.b_kills += b_kills;

        history.push(DuelMatchEntry {
            match_id: m.id.clone(),
            source_file: m.source_file.clone(),
            timestamp: m.timestamp,
            a_kills,
            b_kills,
            a_role: classify_role(a.sniper_kills, a.kills, config.sniper_threshold),
            b_role: classify_role(b.sniper_kills, b.kills, config.sniper_threshold),
            a_team: a.team.clone(),
            b_team: b.team.clone(),
        });
    }

    history.sort_by(|x, y| match y.timestamp.cmp(&x.timestamp) {
        Ordering::Equal => x.match_id.cmp(&y.match_id),
        other => other,
    });

    Some(DuelReport { ledger, history })
}
