//! Team balancing.
//!
//! Pinned players are placed first and always stay where they were pinned.
//! The rest are distributed so both teams end up with `active / 2` players,
//! trying to keep the summed average ratings close.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::BalanceConfig;
use crate::models::{AggregatedPlayerStats, BalanceStrategy, RosterAssignment, RosterSlot, TeamMember, TeamSplit};

/// Balancing failures. No partial split is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    #[error("Need an even number of at least 2 active players, got {active}")]
    InvalidRosterParity { active: usize },
}

/// Roster split into pinned teams and the unassigned pool, pool sorted best first.
struct Prepared {
    split: TeamSplit,
    pool: Vec<TeamMember>,
    team_size: usize,
}

fn member(player: &AggregatedPlayerStats, pinned: bool) -> TeamMember {
    TeamMember {
        steam_id: player.steam_id.clone(),
        name: player.name.clone(),
        average_rating: player.average_rating(),
        pinned,
    }
}

fn prepare(
    roster: &[AggregatedPlayerStats],
    assignments: &RosterAssignment,
) -> Result<Prepared, BalanceError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(roster.len());
    let mut split = TeamSplit::default();
    let mut pool = Vec::new();

    for player in roster {
        if !seen.insert(player.steam_id.as_str()) {
            warn!("Player {} listed twice in roster, ignoring repeat", player.steam_id);
            continue;
        }
        match assignments.slot(&player.steam_id) {
            Some(RosterSlot::Bench) => {}
            Some(RosterSlot::Team1) => split.team1.push(member(player, true)),
            Some(RosterSlot::Team2) => split.team2.push(member(player, true)),
            None => pool.push(member(player, false)),
        }
    }

    let active = split.team1.len() + split.team2.len() + pool.len();
    if active < 2 || active % 2 != 0 {
        return Err(BalanceError::InvalidRosterParity { active });
    }

    let team_size = active / 2;
    if split.team1.len() > team_size || split.team2.len() > team_size {
        warn!(
            "Pins overfill a team ({} / {} pinned, team size {})",
            split.team1.len(),
            split.team2.len(),
            team_size
        );
    }

    // Stable: equal ratings keep roster order.
    pool.sort_by(|a, b| b.average_rating.total_cmp(&a.average_rating));

    Ok(Prepared {
        split,
        pool,
        team_size,
    })
}

/// Balance a roster with the default greedy strategy.
pub fn balance(
    roster: &[AggregatedPlayerStats],
    assignments: &RosterAssignment,
) -> Result<TeamSplit, BalanceError> {
    let prepared = prepare(roster, assignments)?;
    Ok(fill_greedy(prepared))
}

/// Balance a roster with the configured strategy.
pub fn balance_with(
    roster: &[AggregatedPlayerStats],
    assignments: &RosterAssignment,
    config: &BalanceConfig,
) -> Result<TeamSplit, BalanceError> {
    let prepared = prepare(roster, assignments)?;

    let split = match config.strategy {
        BalanceStrategy::Greedy => fill_greedy(prepared),
        BalanceStrategy::Exhaustive => {
            let overfilled = prepared.split.team1.len() > prepared.team_size
                || prepared.split.team2.len() > prepared.team_size;
            if overfilled {
                fill_greedy(prepared)
            } else if prepared.pool.len() > config.exhaustive_pool_limit {
                warn!(
                    "Pool of {} exceeds exhaustive limit {}, using greedy",
                    prepared.pool.len(),
                    config.exhaustive_pool_limit
                );
                fill_greedy(prepared)
            } else {
                fill_exhaustive(prepared)
            }
        }
    };

    debug!(
        "Balanced {} v {} ({:.2} vs {:.2}) using {}",
        split.team1.len(),
        split.team2.len(),
        split.team1_rating(),
        split.team2_rating(),
        config.strategy
    );
    Ok(split)
}

/// Highest rated first: onto team 1 while it has room and is not ahead,
/// otherwise onto team 2.
fn fill_greedy(prepared: Prepared) -> TeamSplit {
    let Prepared {
        mut split,
        pool,
        team_size,
    } = prepared;

    let mut team1_sum = split.team1_rating();
    let mut team2_sum = split.team2_rating();

    for candidate in pool {
        let team1_open = split.team1.len() < team_size;
        let team2_full = split.team2.len() >= team_size;

        if team1_open && (team1_sum <= team2_sum || team2_full) {
            team1_sum += candidate.average_rating;
            split.team1.push(candidate);
        } else {
            // pinned + pool == 2 * team_size, so team 2 has room here
            team2_sum += candidate.average_rating;
            split.team2.push(candidate);
        }
    }

    split
}

/// Depth-first search over which pool members fill team 1's open slots.
struct FillSearch<'a> {
    ratings: &'a [f64],
    pick: usize,
    base_gap: f64,
    pool_total: f64,
    current: Vec<usize>,
    best: Vec<usize>,
    best_gap: f64,
}

impl FillSearch<'_> {
    fn visit(&mut self, start: usize, picked_sum: f64) {
        if self.current.len() == self.pick {
            let rest = self.pool_total - picked_sum;
            let gap = (self.base_gap + picked_sum - rest).abs();
            if gap < self.best_gap {
                self.best_gap = gap;
                self.best.clone_from(&self.current);
            }
            return;
        }

        let remaining = self.pick - self.current.len();
        for i in start..=(self.ratings.len() - remaining) {
            self.current.push(i);
            self.visit(i + 1, picked_sum + self.ratings[i]);
            self.current.pop();
        }
    }
}

/// Try every fill of team 1's open slots and keep the smallest rating gap.
/// The first fill found wins ties.
fn fill_exhaustive(prepared: Prepared) -> TeamSplit {
    let Prepared {
        mut split,
        pool,
        team_size,
    } = prepared;

    let ratings: Vec<f64> = pool.iter().map(|m| m.average_rating).collect();
    let mut search = FillSearch {
        ratings: &ratings,
        pick: team_size - split.team1.len(),
        base_gap: split.team1_rating() - split.team2_rating(),
        pool_total: ratings.iter().sum(),
        current: Vec::new(),
        best: Vec::new(),
        best_gap: f64::INFINITY,
    };
    search.visit(0, 0.0);

    let chosen: HashSet<usize> = search.best.into_iter().collect();
    for (i, candidate) in pool.into_iter().enumerate() {
        if chosen.contains(&i) {
            split.team1.push(candidate);
        } else {
            split.team2.push(candidate);
        }
    }

    split
}
