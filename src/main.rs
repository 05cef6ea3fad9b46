use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use frag_ledger::calculate::{aggregate, balance_with, player_metrics, reconcile};
use frag_ledger::config::AppConfig;
use frag_ledger::models::{
    AggregatedPlayerStats, BalanceStrategy, MatchRecord, PlayerMetrics, RosterAssignment,
    RosterSlot, TeamMember,
};
use frag_ledger::storage::{self, JsonlReader, StorageConfig};

#[derive(Parser)]
#[command(name = "frag-ledger")]
#[command(about = "Career stats, duels and team balancing from match logs")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortKey {
    Rating,
    Kd,
    Adr,
    Kills,
}

#[derive(Subcommand)]
enum Commands {
    /// Career leaderboard for every player
    Stats {
        /// Column to sort by (descending)
        #[arg(long, value_enum, default_value = "rating")]
        sort: SortKey,

        /// Max rows to show
        #[arg(long)]
        limit: Option<usize>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Detailed career view for one player
    Player {
        steam_id: String,

        #[arg(long)]
        json: bool,
    },

    /// Per-player metrics for a single match
    Match { match_id: String },

    /// Head-to-head record between two players
    Duel {
        player_a: String,
        player_b: String,

        #[arg(long)]
        json: bool,
    },

    /// Split players into two even teams
    Balance {
        /// Steam IDs taking part (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        players: Vec<String>,

        /// Steam IDs pinned to team 1
        #[arg(long, value_delimiter = ',')]
        team1: Vec<String>,

        /// Steam IDs pinned to team 2
        #[arg(long, value_delimiter = ',')]
        team2: Vec<String>,

        /// Steam IDs sitting out
        #[arg(long, value_delimiter = ',')]
        bench: Vec<String>,

        /// Override the configured strategy (greedy or exhaustive)
        #[arg(long)]
        strategy: Option<BalanceStrategy>,
    },

    /// Append normalized match records (JSONL) to the store
    Import { path: PathBuf },

    /// Write career aggregates to the derived directory
    Export,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }
    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    let json_layer = cli
        .json_logs
        .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!cli.json_logs)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    tracing::debug!("Starting frag-ledger v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(config.data_dir.clone());

    match cli.command {
        Commands::Stats { sort, limit, json } => {
            let matches = load_matches(&storage)?;
            let players = aggregate(&matches);

            let mut rows: Vec<(&AggregatedPlayerStats, PlayerMetrics)> = players
                .iter()
                .map(|p| (p, player_metrics(p, &config.metrics)))
                .collect();
            rows.sort_by(|(pa, ma), (pb, mb)| match sort {
                SortKey::Rating => mb.average_rating.total_cmp(&ma.average_rating),
                SortKey::Kd => mb.kd.total_cmp(&ma.kd),
                SortKey::Adr => mb.adr.total_cmp(&ma.adr),
                SortKey::Kills => pb.kills.cmp(&pa.kills),
            });
            rows.truncate(limit.unwrap_or(usize::MAX));

            if json {
                let out: Vec<_> = rows
                    .iter()
                    .map(|(p, m)| serde_json::json!({ "player": p, "metrics": m }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
                return Ok(());
            }

            println!(
                "=== Career Stats ({} players, {} matches) ===\n",
                players.len(),
                matches.len()
            );
            println!(
                "{:<20} {:>4} {:>6} {:>6} {:>6} {:>6} {:>7}  {}",
                "Player", "MP", "K", "D", "K/D", "ADR", "Rating", "Role"
            );
            for (p, m) in &rows {
                println!(
                    "{:<20} {:>4} {:>6} {:>6} {:>6.2} {:>6.1} {:>7.2}  {}",
                    truncate(&p.name, 20),
                    p.matches,
                    p.kills,
                    p.deaths,
                    m.kd,
                    m.adr,
                    m.average_rating,
                    m.role
                );
            }
        }
        Commands::Player { steam_id, json } => {
            let matches = load_matches(&storage)?;
            let players = aggregate(&matches);
            let Some(player) = players.get(steam_id.trim()) else {
                bail!("No matches found for player {}", steam_id);
            };
            let metrics = player_metrics(player, &config.metrics);

            if json {
                let out = serde_json::json!({ "player": player, "metrics": metrics });
                println!("{}", serde_json::to_string_pretty(&out)?);
                return Ok(());
            }

            println!("=== {} ({}) ===\n", player.name, player.steam_id);
            println!("Matches:          {}", player.matches);
            println!("Last team:        {}", player.last_team);
            println!("Role:             {}", metrics.role);
            println!("Rating:           {:.2}", metrics.average_rating);
            println!("Impact:           {:.2}", metrics.impact);
            println!("K/D:              {:.2}", metrics.kd);
            println!("KPR / DPR / APR:  {:.2} / {:.2} / {:.2}", metrics.kpr, metrics.dpr, metrics.apr);
            println!("ADR:              {:.1}", metrics.adr);
            println!("Opening K/D:      {} / {}", player.opening_kills, player.opening_deaths);
            println!("Trade kills:      {}", player.trade_kills);
            println!("Clutches won:     {}", player.clutches_won);
            println!("Flashes thrown:   {}", player.flashes_thrown);

            let style = &metrics.playstyle;
            println!("\nPlaystyle:");
            for (label, score) in [
                ("Firepower", style.firepower),
                ("Entry", style.entry),
                ("Opening", style.opening),
                ("Trading", style.trading),
                ("Clutching", style.clutching),
                ("Sniping", style.sniping),
                ("Utility", style.utility),
            ] {
                println!("  {:<10} {:>3}", label, score);
            }
        }
        Commands::Match { match_id } => {
            let matches = load_matches(&storage)?;
            let Some(m) = matches.iter().find(|m| m.id.as_str() == match_id.trim()) else {
                bail!("Match not found: {}", match_id);
            };

            let when = m
                .timestamp
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "unknown date".to_string());
            println!("=== {} ({}) ===\n", m.source_file, when);

            let mut records: Vec<_> = m.players.iter().collect();
            records.sort_by(|a, b| a.team.cmp(&b.team).then(b.rating.total_cmp(&a.rating)));

            println!(
                "{:<10} {:<20} {:>4} {:>4} {:>4} {:>6} {:>6}  {}",
                "Team", "Player", "K", "D", "A", "ADR", "Rating", "Role"
            );
            for record in records {
                let metrics = player_metrics(record, &config.metrics);
                println!(
                    "{:<10} {:<20} {:>4} {:>4} {:>4} {:>6.1} {:>6.2}  {}",
                    truncate(&record.team, 10),
                    truncate(&record.name, 20),
                    record.kills,
                    record.deaths,
                    record.assists,
                    metrics.adr,
                    metrics.average_rating,
                    metrics.role
                );
            }
        }
        Commands::Duel {
            player_a,
            player_b,
            json,
        } => {
            let matches = load_matches(&storage)?;
            let players = aggregate(&matches);

            let Some(report) = reconcile(
                &matches,
                &players,
                player_a.trim(),
                player_b.trim(),
                &config.metrics,
            ) else {
                println!("Not enough data to compare {} and {}.", player_a, player_b);
                return Ok(());
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            let name_of = |id: &str| {
                players
                    .get(id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| id.to_string())
            };
            let (name_a, name_b) = (name_of(&report.ledger.player_a), name_of(&report.ledger.player_b));

            println!(
                "=== {} {} - {} {} (diff {:+}) ===\n",
                name_a,
                report.ledger.a_kills,
                report.ledger.b_kills,
                name_b,
                report.ledger.diff()
            );
            if report.history.is_empty() {
                println!("No recorded duels.");
            }
            for entry in &report.history {
                let when = entry
                    .timestamp
                    .map(|t| t.date_naive().to_string())
                    .unwrap_or_else(|| "----------".to_string());
                println!(
                    "  {}  {:>2} - {:<2}  {} ({}, {}) vs {} ({}, {})  [{}]",
                    when,
                    entry.a_kills,
                    entry.b_kills,
                    name_a,
                    entry.a_team,
                    entry.a_role,
                    name_b,
                    entry.b_team,
                    entry.b_role,
                    entry.source_file
                );
            }
        }
        Commands::Balance {
            players: ids,
            team1,
            team2,
            bench,
            strategy,
        } => {
            let matches = load_matches(&storage)?;
            let players = aggregate(&matches);

            let mut roster = Vec::with_capacity(ids.len());
            for id in &ids {
                match players.get(id.trim()) {
                    Some(p) => roster.push(p.clone()),
                    None => bail!("Unknown player: {}", id),
                }
            }

            let mut assignments = RosterAssignment::new();
            for (slot, pinned) in [
                (RosterSlot::Team1, &team1),
                (RosterSlot::Team2, &team2),
                (RosterSlot::Bench, &bench),
            ] {
                for id in pinned {
                    assignments.pin(id.trim(), slot);
                }
            }

            let mut balance_config = config.balance.clone();
            if let Some(strategy) = strategy {
                balance_config.strategy = strategy;
            }

            let split = balance_with(&roster, &assignments, &balance_config)
                .context("Cannot balance this roster")?;

            print_team("Team 1", &split.team1, split.team1_rating());
            print_team("Team 2", &split.team2, split.team2_rating());
            println!("\nRating gap: {:.2}", split.rating_gap());
        }
        Commands::Import { path } => {
            let reader = JsonlReader::<MatchRecord>::new(path);
            if !reader.path().exists() {
                bail!("Import file not found: {:?}", reader.path());
            }

            let mut matches = reader
                .read_all()
                .with_context(|| format!("Failed to read {:?}", reader.path()))?;
            for m in &mut matches {
                m.ensure_id();
            }

            let count = storage::append_matches(&storage, &matches)?;
            println!("Imported {} matches from {:?}", count, reader.path());
        }
        Commands::Export => {
            let matches = load_matches(&storage)?;
            let players = aggregate(&matches).into_vec();
            let count = storage::write_player_stats(&storage, &players)?;
            println!(
                "Exported {} players from {} matches to {:?}",
                count,
                matches.len(),
                storage.derived_dir()
            );
        }
    }

    Ok(())
}

fn load_matches(storage: &StorageConfig) -> Result<Vec<MatchRecord>> {
    let matches = storage::read_matches(storage).context("Failed to read match store")?;
    tracing::info!("Loaded {} matches", matches.len());
    Ok(matches)
}

fn print_team(label: &str, members: &[TeamMember], rating: f64) {
    println!("{} (total rating {:.2})", label, rating);
    for member in members {
        let pin = if member.pinned { " [pinned]" } else { "" };
        println!(
            "  {:<20} {:>5.2}{}",
            truncate(&member.name, 20),
            member.average_rating,
            pin
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
