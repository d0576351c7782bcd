//! Importer configuration
//!
//! Layered lowest to highest: built-in defaults (with `DATABASE_URL` standing
//! in for the default database url), `config/default.toml`,
//! `config/{GAMEDAY_ENV}.toml`, then `GAMEDAY__SECTION__KEY` environment
//! variables. Command-line flags are applied last by the binary.

use config::{Config, ConfigError, Environment, File};
use gameday_feed::FeedConfig;
use gameday_store::DatabaseConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "GAMEDAY";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImporterConfig {
    pub database: DatabaseConfig,
    pub feed: FeedConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Compact }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl ImporterConfig {
    /// Load configuration from a specific directory and the environment
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let defaults = Self::default();
        let environment =
            std::env::var("GAMEDAY_ENV").unwrap_or_else(|_| "development".to_string());

        let database_url = std::env::var("DATABASE_URL").unwrap_or(defaults.database.url);

        let max_connections = i64::from(defaults.database.max_connections);
        let acquire_timeout_secs = defaults.database.acquire_timeout_secs as i64;

        let builder = Config::builder()
            .set_default("database.url", database_url)?
            .set_default("database.max_connections", max_connections)?
            .set_default("database.acquire_timeout_secs", acquire_timeout_secs)?
            .set_default("feed.base_url", defaults.feed.base_url)?
            .set_default("feed.timeout_secs", defaults.feed.timeout_secs as i64)?
            .set_default("feed.user_agent", defaults.feed.user_agent)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", "compact")?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{environment}.toml"))).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), String> {
        self.database.validate()?;
        self.feed.validate()?;

        if self.logging.level.trim().is_empty() {
            return Err("logging level must not be empty".to_string());
        }

        Ok(())
    }
}
