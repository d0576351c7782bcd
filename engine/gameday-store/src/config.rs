use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Database configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,

    /// Connection pool size. Every concurrent import job draws from this pool.
    pub max_connections: u32,

    /// How long a job waits for a pooled connection before failing
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://go-gameday@localhost:5432/go-gameday".to_string(),
            max_connections: 32,
            acquire_timeout_secs: 30,
        }
    }
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), ..Default::default() }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("database url must not be empty".to_string());
        }

        if self.max_connections == 0 {
            return Err("database max_connections must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(DatabaseConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_connections() {
        let config = DatabaseConfig { max_connections: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_url() {
        assert!(DatabaseConfig::new("").validate().is_err());
    }
}
