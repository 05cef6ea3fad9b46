//! Rate statistics, role classification and playstyle scores.
//!
//! Everything here works on a [`StatLine`], so the same formulas serve both a
//! career aggregate and a single match record.

use crate::config::{MetricsConfig, PlaystyleTargets};
use crate::models::{AggregatedPlayerStats, PlayerMatchRecord, PlayerMetrics, PlaystyleScores, Role};

use super::{per, safe_ratio, score_against};

/// Counting stats over some number of matches.
pub trait StatLine {
    fn kills(&self) -> u32;
    fn deaths(&self) -> u32;
    fn assists(&self) -> u32;
    fn rounds_played(&self) -> u32;
    fn damage_total(&self) -> u32;
    fn sniper_kills(&self) -> u32;
    fn utility_damage(&self) -> u32;
    fn opening_kills(&self) -> u32;
    fn opening_attempts(&self) -> u32;
    fn trade_kills(&self) -> u32;
    fn clutches_won(&self) -> u32;
    fn matches(&self) -> u32;
    fn rating_total(&self) -> f64;

    fn kpr(&self) -> f64 {
        per(self.kills(), self.rounds_played())
    }

    fn dpr(&self) -> f64 {
        per(self.deaths(), self.rounds_played())
    }

    fn apr(&self) -> f64 {
        per(self.assists(), self.rounds_played())
    }

    fn adr(&self) -> f64 {
        per(self.damage_total(), self.rounds_played())
    }

    /// Kills per death; with no deaths this is the raw kill count.
    fn kd(&self) -> f64 {
        if self.deaths() == 0 {
            self.kills() as f64
        } else {
            per(self.kills(), self.deaths())
        }
    }

    fn average_rating(&self) -> f64 {
        safe_ratio(self.rating_total(), self.matches() as f64)
    }
}

impl StatLine for AggregatedPlayerStats {
    fn kills(&self) -> u32 {
        self.kills
    }
    fn deaths(&self) -> u32 {
        self.deaths
    }
    fn assists(&self) -> u32 {
        self.assists
    }
    fn rounds_played(&self) -> u32 {
        self.rounds_played
    }
    fn damage_total(&self) -> u32 {
        self.damage_total
    }
    fn sniper_kills(&self) -> u32 {
        self.sniper_kills
    }
    fn utility_damage(&self) -> u32 {
        self.utility_damage
    }
    fn opening_kills(&self) -> u32 {
        self.opening_kills
    }
    fn opening_attempts(&self) -> u32 {
        self.opening_attempts
    }
    fn trade_kills(&self) -> u32 {
        self.trade_kills
    }
    fn clutches_won(&self) -> u32 {
        self.clutches_won
    }
    fn matches(&self) -> u32 {
        self.matches
    }
    fn rating_total(&self) -> f64 {
        self.rating_total
    }
}

impl StatLine for PlayerMatchRecord {
    fn kills(&self) -> u32 {
        self.kills
    }
    fn deaths(&self) -> u32 {
        self.deaths
    }
    fn assists(&self) -> u32 {
        self.assists
    }
    fn rounds_played(&self) -> u32 {
        self.rounds_played
    }
    fn damage_total(&self) -> u32 {
        self.damage_total
    }
    fn sniper_kills(&self) -> u32 {
        self.sniper_kills
    }
    fn utility_damage(&self) -> u32 {
        self.utility_damage
    }
    fn opening_kills(&self) -> u32 {
        self.opening_kills
    }
    fn opening_attempts(&self) -> u32 {
        self.opening_attempts
    }
    fn trade_kills(&self) -> u32 {
        self.trade_kills
    }
    fn clutches_won(&self) -> u32 {
        self.clutches.total()
    }
    fn matches(&self) -> u32 {
        1
    }
    fn rating_total(&self) -> f64 {
        self.rating
    }
}

/// Sniper if strictly more than `threshold` of kills came from sniper rifles.
pub fn classify_role(sniper_kills: u32, kills: u32, threshold: f64) -> Role {
    if kills == 0 {
        return Role::Rifler;
    }
    if per(sniper_kills, kills) > threshold {
        Role::Sniper
    } else {
        Role::Rifler
    }
}

/// Score each playstyle dimension against its reference maximum.
pub fn playstyle_scores<S: StatLine + ?Sized>(line: &S, targets: &PlaystyleTargets) -> PlaystyleScores {
    let matches = line.matches();

    PlaystyleScores {
        firepower: score_against(line.adr(), targets.firepower_adr),
        entry: score_against(
            per(line.opening_kills(), line.opening_attempts()),
            targets.entry_success,
        ),
        opening: score_against(per(line.opening_kills(), matches), targets.opening_per_match),
        trading: score_against(per(line.trade_kills(), matches), targets.trades_per_match),
        clutching: score_against(per(line.clutches_won(), matches), targets.clutches_per_match),
        sniping: score_against(per(line.sniper_kills(), line.kills()), targets.sniper_share),
        utility: score_against(per(line.utility_damage(), matches), targets.utility_per_match),
    }
}

/// Impact rating: average rating scaled by the damping constant.
pub fn impact_rating<S: StatLine + ?Sized>(line: &S, damping: f64) -> f64 {
    line.average_rating() * damping
}

/// Compute every derived metric for a stat line.
pub fn player_metrics<S: StatLine + ?Sized>(line: &S, config: &MetricsConfig) -> PlayerMetrics {
    PlayerMetrics {
        kpr: line.kpr(),
        dpr: line.dpr(),
        apr: line.apr(),
        adr: line.adr(),
        kd: line.kd(),
        average_rating: line.average_rating(),
        impact: impact_rating(line, config.impact_damping),
        role: classify_role(line.sniper_kills(), line.kills(), config.sniper_threshold),
        playstyle: playstyle_scores(line, &config.targets),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClutchBrackets;
    use pretty_assertions::assert_eq;

    fn aggregate_line() -> AggregatedPlayerStats {
        let mut stats = AggregatedPlayerStats::new("1", "alice");
        stats.matches = 2;
        stats.kills = 40;
        stats.deaths = 20;
        stats.assists = 8;
        stats.rounds_played = 48;
        stats.damage_total = 4320;
        stats.sniper_kills = 10;
        stats.utility_damage = 300;
        stats.opening_kills = 6;
        stats.opening_attempts = 10;
        stats.trade_kills = 3;
        stats.clutches_won = 1;
        stats.rating_total = 2.4;
        stats
    }

    #[test]
    fn test_rates() {
        let stats = aggregate_line();

        assert!((stats.kpr() - 40.0 / 48.0).abs() < 1e-9);
        assert!((stats.dpr() - 20.0 / 48.0).abs() < 1e-9);
        assert!((stats.apr() - 8.0 / 48.0).abs() < 1e-9);
        assert!((stats.adr() - 90.0).abs() < 1e-9);
        assert!((stats.kd() - 2.0).abs() < 1e-9);
        assert!((StatLine::average_rating(&stats) - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_rates_zero_rounds() {
        let stats = AggregatedPlayerStats::new("1", "alice");

        assert_eq!(stats.kpr(), 0.0);
        assert_eq!(stats.dpr(), 0.0);
        assert_eq!(stats.apr(), 0.0);
        assert_eq!(stats.adr(), 0.0);
        assert_eq!(StatLine::average_rating(&stats), 0.0);
    }

    #[test]
    fn test_kd_zero_deaths_is_kill_count() {
        let mut stats = AggregatedPlayerStats::new("1", "alice");
        stats.kills = 10;
        stats.deaths = 0;

        assert_eq!(stats.kd(), 10.0);
        assert_eq!(format!("{:.2}", stats.kd()), "10.00");
    }

    #[test]
    fn test_role_boundary() {
        assert_eq!(classify_role(40, 100, 0.4), Role::Rifler);
        assert_eq!(classify_role(41, 100, 0.4), Role::Sniper);
        assert_eq!(classify_role(0, 0, 0.4), Role::Rifler);
        assert_eq!(classify_role(2, 5, 0.4), Role::Rifler);
    }

    #[test]
    fn test_playstyle_scores() {
        let stats = aggregate_line();
        let scores = playstyle_scores(&stats, &PlaystyleTargets::default());

        assert_eq!(
            scores,
            PlaystyleScores {
                firepower: 90, // 90 ADR / 100
                entry: 100,    // 0.6 success / 0.6
                opening: 86,   // 3 per match / 3.5
                trading: 50,   // 1.5 per match / 3.0
                clutching: 50, // 0.5 per match / 1.0
                sniping: 50,   // 0.25 share / 0.5
                utility: 50,   // 150 per match / 300
            }
        );
    }

    #[test]
    fn test_playstyle_scores_clamped() {
        let mut stats = aggregate_line();
        stats.damage_total = 48 * 150;
        stats.clutches_won = 10;

        let scores = playstyle_scores(&stats, &PlaystyleTargets::default());
        assert_eq!(scores.firepower, 100);
        assert_eq!(scores.clutching, 100);
    }

    #[test]
    fn test_playstyle_scores_empty_line() {
        let stats = AggregatedPlayerStats::new("1", "alice");
        let scores = playstyle_scores(&stats, &PlaystyleTargets::default());
        assert_eq!(scores, PlaystyleScores::default());
    }

    #[test]
    fn test_single_match_metrics() {
        let mut record = PlayerMatchRecord::new("1", "alice");
        record.kills = 20;
        record.deaths = 10;
        record.rounds_played = 24;
        record.damage_total = 2400;
        record.sniper_kills = 12;
        record.rating = 1.3;
        record.clutches = ClutchBrackets {
            v1: 1,
            ..Default::default()
        };

        let metrics = player_metrics(&record, &MetricsConfig::default());

        assert!((metrics.adr - 100.0).abs() < 1e-9);
        assert!((metrics.kd - 2.0).abs() < 1e-9);
        assert!((metrics.average_rating - 1.3).abs() < 1e-9);
        assert!((metrics.impact - 1.3 * 0.95).abs() < 1e-9);
        assert_eq!(metrics.role, Role::Sniper);
        assert_eq!(metrics.playstyle.clutching, 100);
        assert_eq!(metrics.playstyle.sniping, 100);
    }

    #[test]
    fn test_impact_rating() {
        let stats = aggregate_line();
        assert!((impact_rating(&stats, 0.95) - 1.14).abs() < 1e-9);
    }
}
