//! Statistics calculation engine.
//!
//! Pure functions over an in-memory match collection:
//! - Career aggregation by steam ID (full replay, never incremental)
//! - Rate statistics, role classification and playstyle scores
//! - Head-to-head reconciliation between two players
//! - Team balancing with manual pins

pub mod aggregate;
pub mod balance;
pub mod duel;
pub mod metrics;

pub use aggregate::{aggregate, replay_order};
pub use balance::{balance, balance_with, BalanceError};
pub use duel::{reconcile, DuelLookup};
pub use metrics::{classify_role, player_metrics, playstyle_scores, StatLine};

/// Divide, returning 0 when the denominator is zero.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Per-unit rate over a count, 0 when the count is zero.
pub fn per(value: u32, count: u32) -> f64 {
    safe_ratio(value as f64, count as f64)
}

/// Score a value against a reference maximum on a 0-100 scale.
pub fn score_against(value: f64, target: f64) -> u8 {
    let scaled = (safe_ratio(value, target) * 100.0).round();
    scaled.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_ratio() {
        assert_eq!(safe_ratio(3.0, 4.0), 0.75);
        assert_eq!(safe_ratio(3.0, 0.0), 0.0);
        assert_eq!(safe_ratio(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_per() {
        assert!((per(20, 24) - 0.8333).abs() < 0.001);
        assert_eq!(per(20, 0), 0.0);
    }

    #[test]
    fn test_score_against() {
        assert_eq!(score_against(50.0, 100.0), 50);
        assert_eq!(score_against(0.3, 0.6), 50);
        assert_eq!(score_against(250.0, 100.0), 100);
        assert_eq!(score_against(0.0, 3.5), 0);
        assert_eq!(score_against(1.0, 0.0), 0);
    }

    #[test]
    fn test_score_against_rounds_half_up() {
        // 87.5 / 100 -> 87.5 -> 88
        assert_eq!(score_against(87.5, 100.0), 88);
        assert_eq!(score_against(87.4, 100.0), 87);
    }
}
