//! # Command Line Interface
//!
//! Table management and import commands for the `gameday-importer` binary.

use crate::config::ImporterConfig;
use crate::coordinator::{ImportCoordinator, ImportScope, ImportSummary};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use gameday_feed::{GameSource, HttpGameSource};
use gameday_store::{MemoryStore, PgStore, RecordKind, Store};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Gameday play-by-play importer
#[derive(Parser, Debug)]
#[command(name = "gameday-importer", version)]
#[command(about = "Import gameday play-by-play data into Postgres")]
pub struct Cli {
    /// Directory holding default.toml and per-environment config files
    #[arg(long, global = true, default_value = "config")]
    pub config: PathBuf,

    /// Database URL, overriding configuration
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Feed base URL, overriding configuration
    #[arg(long, global = true)]
    pub feed_url: Option<String>,

    /// Import into memory instead of the database
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Log filter, e.g. `debug` or `gameday_importer=trace`
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drop and recreate every table
    CreateTables,
    /// Drop and recreate the pitches table
    CreatePitchesTable,
    /// Drop and recreate the players table
    CreatePlayersTable,
    /// Drop and recreate the hits table
    CreateHitsTable,
    /// Drop and recreate the game_stats table
    CreateGameStatsTable,
    /// Import pitches for every team in the given years
    ImportPitchesForYear(YearsArgs),
    /// Import pitches for one team in the given years
    ImportPitchesForTeamAndYear(TeamYearsArgs),
    /// Import players for every team in the given years
    ImportPlayersForYear(YearsArgs),
    /// Import players for one team in the given years
    ImportPlayersForTeamAndYear(TeamYearsArgs),
    /// Import hits for every team in the given years
    ImportHitsForYear(YearsArgs),
    /// Import hits for one team in the given years
    ImportHitsForTeamAndYear(TeamYearsArgs),
    /// Import game stats for every team in the given years
    ImportGameStatsForYear(YearsArgs),
    /// Import game stats for one team in the given years
    ImportGameStatsForTeamAndYear(TeamYearsArgs),
}

#[derive(Args, Debug)]
pub struct YearsArgs {
    /// Four-digit seasons
    #[arg(required = true, num_args = 1.., value_parser = parse_year)]
    pub years: Vec<i32>,
}

#[derive(Args, Debug)]
pub struct TeamYearsArgs {
    /// Team code, e.g. `sea`
    pub team: String,

    /// Four-digit seasons
    #[arg(required = true, num_args = 1.., value_parser = parse_year)]
    pub years: Vec<i32>,
}

/// A parsed command, independent of how it was spelled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateTables,
    CreateTable(RecordKind),
    Import { kind: RecordKind, scope: ImportScope },
}

impl From<Commands> for Command {
    fn from(command: Commands) -> Self {
        use RecordKind::*;

        let all = |kind, args: YearsArgs| Command::Import {
            kind,
            scope: ImportScope::AllTeams { years: args.years },
        };
        let team = |kind, args: TeamYearsArgs| Command::Import {
            kind,
            scope: ImportScope::Team { team_code: args.team, years: args.years },
        };

        match command {
            Commands::CreateTables => Command::CreateTables,
            Commands::CreatePitchesTable => Command::CreateTable(Pitches),
            Commands::CreatePlayersTable => Command::CreateTable(Players),
            Commands::CreateHitsTable => Command::CreateTable(Hits),
            Commands::CreateGameStatsTable => Command::CreateTable(GameStats),
            Commands::ImportPitchesForYear(args) => all(Pitches, args),
            Commands::ImportPitchesForTeamAndYear(args) => team(Pitches, args),
            Commands::ImportPlayersForYear(args) => all(Players, args),
            Commands::ImportPlayersForTeamAndYear(args) => team(Players, args),
            Commands::ImportHitsForYear(args) => all(Hits, args),
            Commands::ImportHitsForTeamAndYear(args) => team(Hits, args),
            Commands::ImportGameStatsForYear(args) => all(GameStats, args),
            Commands::ImportGameStatsForTeamAndYear(args) => team(GameStats, args),
        }
    }
}

/// Years are exactly four ASCII digits
fn parse_year(value: &str) -> Result<i32, String> {
    if value.len() != 4 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{value}' is not a four-digit year"));
    }
    value.parse().map_err(|_| format!("'{value}' is not a four-digit year"))
}

impl Cli {
    /// Apply command-line overrides on top of loaded configuration
    pub fn apply_overrides(&self, config: &mut ImporterConfig) {
        if let Some(url) = &self.database_url {
            config.database.url = url.clone();
        }
        if let Some(url) = &self.feed_url {
            config.feed.base_url = url.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

/// CLI handler
pub struct CliHandler {
    config: ImporterConfig,
    dry_run: bool,
}

impl CliHandler {
    pub fn new(config: ImporterConfig, dry_run: bool) -> Self {
        Self { config, dry_run }
    }

    /// Run one command. Returns `false` when any import job failed.
    pub async fn handle_command(&self, command: Command) -> Result<bool> {
        match command {
            Command::CreateTables => {
                self.database().await?.create_tables().await?;
                Ok(true)
            }
            Command::CreateTable(kind) => {
                self.database().await?.create_table(kind).await?;
                Ok(true)
            }
            Command::Import { kind, scope } => {
                let summary = self.import(kind, scope).await?;
                Ok(!summary.has_failures())
            }
        }
    }

    async fn import(&self, kind: RecordKind, scope: ImportScope) -> Result<ImportSummary> {
        let source: Arc<dyn GameSource> =
            Arc::new(HttpGameSource::new(&self.config.feed).context("Invalid feed configuration")?);

        let store: Arc<dyn Store> = if self.dry_run {
            info!("Dry run: records are kept in memory and discarded on exit");
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(self.database().await?)
        };

        let coordinator = ImportCoordinator::new(source, store);
        let summary = coordinator.import_kind(kind, scope).await?;

        println!("{}", serde_json::to_string_pretty(&summary)?);

        Ok(summary)
    }

    async fn database(&self) -> Result<PgStore> {
        if self.dry_run {
            bail!("table creation needs a database and cannot run with --dry-run");
        }
        PgStore::connect(&self.config.database)
            .await
            .context("Failed to connect to database")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("gameday-importer").chain(args.iter().copied()))
    }

    #[test]
    fn test_create_commands() {
        let cli = parse(&["create-tables"]).unwrap();
        assert_eq!(Command::from(cli.command), Command::CreateTables);

        let cli = parse(&["create-game-stats-table"]).unwrap();
        assert_eq!(Command::from(cli.command), Command::CreateTable(RecordKind::GameStats));
    }

    #[test]
    fn test_import_for_years() {
        let cli = parse(&["import-pitches-for-year", "2014", "2015"]).unwrap();
        assert_eq!(
            Command::from(cli.command),
            Command::Import {
                kind: RecordKind::Pitches,
                scope: ImportScope::AllTeams { years: vec![2014, 2015] },
            }
        );
    }

    #[test]
    fn test_import_for_team_and_years() {
        let cli = parse(&["import-game-stats-for-team-and-year", "sea", "2015"]).unwrap();
        assert_eq!(
            Command::from(cli.command),
            Command::Import {
                kind: RecordKind::GameStats,
                scope: ImportScope::Team { team_code: "sea".to_string(), years: vec![2015] },
            }
        );
    }

    #[test]
    fn test_rejects_bad_years() {
        assert!(parse(&["import-hits-for-year", "15"]).is_err());
        assert!(parse(&["import-hits-for-year", "20155"]).is_err());
        assert!(parse(&["import-hits-for-year", "+201"]).is_err());
        assert!(parse(&["import-players-for-team-and-year", "sea", "year"]).is_err());
    }

    #[test]
    fn test_requires_years() {
        assert!(parse(&["import-hits-for-year"]).is_err());
        assert!(parse(&["import-players-for-team-and-year", "sea"]).is_err());
    }

    #[test]
    fn test_rejects_unknown_command() {
        assert!(parse(&["import-umpires-for-year", "2015"]).is_err());
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn test_global_flags_override_config() {
        let cli = parse(&[
            "import-hits-for-year",
            "2015",
            "--dry-run",
            "--feed-url",
            "http://feed.test/mlb",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert!(cli.dry_run);

        let mut config = ImporterConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.feed.base_url, "http://feed.test/mlb");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.database.url, ImporterConfig::default().database.url);
    }

    #[tokio::test]
    async fn test_dry_run_cannot_create_tables() {
        let handler = CliHandler::new(ImporterConfig::default(), true);
        let err = handler.handle_command(Command::CreateTables).await.unwrap_err();
        assert!(err.to_string().contains("--dry-run"));
    }
}
