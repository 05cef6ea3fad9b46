//! Local match store.
//!
//! A thin filesystem harness around the engine:
//! - Normalized match records (JSONL, one match per line)
//! - Derived player aggregates exported for other tools

pub mod jsonl;

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use crate::models::{AggregatedPlayerStats, MatchRecord};

pub use jsonl::{EntityType, JsonlReader, JsonlWriter};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn normalized_dir(&self) -> PathBuf {
        self.data_dir.join("normalized")
    }

    pub fn derived_dir(&self) -> PathBuf {
        self.data_dir.join("derived")
    }

    /// Full path of the file holding an entity type.
    pub fn entity_path(&self, entity: EntityType) -> PathBuf {
        let dir = match entity {
            EntityType::Match => self.normalized_dir(),
            EntityType::PlayerStats => self.derived_dir(),
        };
        dir.join(entity.filename())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Keep the last occurrence of each ID, preserving first-seen order.
pub fn dedup_by_id<T, F>(items: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<T> = Vec::with_capacity(items.len());

    for item in items {
        let existing = index.get(key(&item)).copied();
        match existing {
            Some(pos) => out[pos] = item,
            None => {
                index.insert(key(&item).to_string(), out.len());
                out.push(item);
            }
        }
    }

    out
}

/// Read every stored match, later duplicates replacing earlier ones.
pub fn read_matches(config: &StorageConfig) -> Result<Vec<MatchRecord>, StorageError> {
    let reader = JsonlReader::<MatchRecord>::new(config.entity_path(EntityType::Match));
    let mut matches = reader.read_all()?;
    for m in &mut matches {
        m.ensure_id();
    }
    let total = matches.len();
    let matches = dedup_by_id(matches, |m| m.id.as_str());

    if matches.len() != total {
        debug!("Dropped {} duplicate match records", total - matches.len());
    }
    Ok(matches)
}

/// Append matches to the store.
pub fn append_matches(config: &StorageConfig, matches: &[MatchRecord]) -> Result<usize, StorageError> {
    let writer = JsonlWriter::new(config.entity_path(EntityType::Match));
    writer.append_batch(matches)
}

/// Replace the exported player aggregates.
pub fn write_player_stats(
    config: &StorageConfig,
    stats: &[AggregatedPlayerStats],
) -> Result<usize, StorageError> {
    let writer = JsonlWriter::new(config.entity_path(EntityType::PlayerStats));
    let count = writer.write_all(stats)?;
    info!("Exported {} player aggregates", count);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerMatchRecord;
    use tempfile::TempDir;

    fn sample_match(file: &str, kills: u32) -> MatchRecord {
        let mut p = PlayerMatchRecord::new("1", "alice");
        p.kills = kills;
        MatchRecord::new(file, None, vec![p])
    }

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(config.normalized_dir(), PathBuf::from("/data/normalized"));
        assert_eq!(config.derived_dir(), PathBuf::from("/data/derived"));
        assert_eq!(
            config.entity_path(EntityType::Match),
            PathBuf::from("/data/normalized/matches.jsonl")
        );
        assert_eq!(
            config.entity_path(EntityType::PlayerStats),
            PathBuf::from("/data/derived/player_stats.jsonl")
        );
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn test_dedup_by_id_last_wins() {
        let items = vec![("a", 1), ("b", 2), ("a", 3)];
        let deduped = dedup_by_id(items, |item| item.0);
        assert_eq!(deduped, vec![("a", 3), ("b", 2)]);
    }

    #[test]
    fn test_read_matches_missing_store() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().to_path_buf());

        assert!(read_matches(&config).unwrap().is_empty());
    }

    #[test]
    fn test_append_and_read_matches_dedups() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().to_path_buf());

        append_matches(&config, &[sample_match("m1.json", 10), sample_match("m2.json", 5)]).unwrap();
        append_matches(&config, &[sample_match("m1.json", 12)]).unwrap();

        let matches = read_matches(&config).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].source_file, "m1.json");
        assert_eq!(matches[0].players[0].kills, 12);
    }

    #[test]
    fn test_write_player_stats() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().to_path_buf());

        let stats = vec![
            AggregatedPlayerStats::new("1", "alice"),
            AggregatedPlayerStats::new("2", "bob"),
        ];
        assert_eq!(write_player_stats(&config, &stats).unwrap(), 2);

        let reader = JsonlReader::<AggregatedPlayerStats>::new(config.entity_path(EntityType::PlayerStats));
        assert_eq!(reader.read_all().unwrap(), stats);
    }
}
