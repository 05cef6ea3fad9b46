//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::BalanceStrategy;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Reference maxima for the 100-point playstyle scale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaystyleTargets {
    /// Average damage per round
    #[serde(default = "default_firepower_adr")]
    pub firepower_adr: f64,

    /// Opening kills per opening attempt
    #[serde(default = "default_entry_success")]
    pub entry_success: f64,

    /// Opening kills per match
    #[serde(default = "default_opening_per_match")]
    pub opening_per_match: f64,

    /// Trade kills per match
    #[serde(default = "default_trades_per_match")]
    pub trades_per_match: f64,

    /// Clutches won per match
    #[serde(default = "default_clutches_per_match")]
    pub clutches_per_match: f64,

    /// Sniper kills per kill
    #[serde(default = "default_sniper_share")]
    pub sniper_share: f64,

    /// Utility damage per match
    #[serde(default = "default_utility_per_match")]
    pub utility_per_match: f64,
}

fn default_firepower_adr() -> f64 {
    100.0
}

fn default_entry_success() -> f64 {
    0.6
}

fn default_opening_per_match() -> f64 {
    3.5
}

fn default_trades_per_match() -> f64 {
    3.0
}

fn default_clutches_per_match() -> f64 {
    1.0
}

fn default_sniper_share() -> f64 {
    0.5
}

fn default_utility_per_match() -> f64 {
    300.0
}

impl Default for PlaystyleTargets {
    fn default() -> Self {
        Self {
            firepower_adr: default_firepower_adr(),
            entry_success: default_entry_success(),
            opening_per_match: default_opening_per_match(),
            trades_per_match: default_trades_per_match(),
            clutches_per_match: default_clutches_per_match(),
            sniper_share: default_sniper_share(),
            utility_per_match: default_utility_per_match(),
        }
    }
}

impl PlaystyleTargets {
    fn named(&self) -> [(&'static str, f64); 7] {
        [
            ("firepower_adr", self.firepower_adr),
            ("entry_success", self.entry_success),
            ("opening_per_match", self.opening_per_match),
            ("trades_per_match", self.trades_per_match),
            ("clutches_per_match", self.clutches_per_match),
            ("sniper_share", self.sniper_share),
            ("utility_per_match", self.utility_per_match),
        ]
    }
}

/// Derived metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsConfig {
    /// Share of kills with a sniper rifle above which a player is a Sniper
    #[serde(default = "default_sniper_threshold")]
    pub sniper_threshold: f64,

    /// Multiplier applied to average rating to get impact
    #[serde(default = "default_impact_damping")]
    pub impact_damping: f64,

    #[serde(default)]
    pub targets: PlaystyleTargets,
}

fn default_sniper_threshold() -> f64 {
    0.4
}

fn default_impact_damping() -> f64 {
    0.95
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            sniper_threshold: default_sniper_threshold(),
            impact_damping: default_impact_damping(),
            targets: PlaystyleTargets::default(),
        }
    }
}

/// Team balancer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BalanceConfig {
    #[serde(default)]
    pub strategy: BalanceStrategy,

    /// Largest unassigned pool the exhaustive strategy will search
    #[serde(default = "default_exhaustive_pool_limit")]
    pub exhaustive_pool_limit: usize,
}

fn default_exhaustive_pool_limit() -> usize {
    20
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            strategy: BalanceStrategy::default(),
            exhaustive_pool_limit: default_exhaustive_pool_limit(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub metrics: MetricsConfig,

    #[serde(default)]
    pub balance: BalanceConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            metrics: MetricsConfig::default(),
            balance: BalanceConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.metrics.sniper_threshold;
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "Sniper threshold must be between 0 and 1, got {}",
                threshold
            )));
        }

        let damping = self.metrics.impact_damping;
        if damping <= 0.0 || !damping.is_finite() {
            return Err(ConfigError::ValidationError(
                "Impact damping must be greater than 0".to_string(),
            ));
        }

        for (name, value) in self.metrics.targets.named() {
            if value <= 0.0 || !value.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "Playstyle target {} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if self.balance.exhaustive_pool_limit == 0 {
            return Err(ConfigError::ValidationError(
                "Exhaustive pool limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
