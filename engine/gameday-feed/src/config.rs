use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the gameday feed client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Root of the feed, e.g. `https://gameday.example.org/components/game/mlb`
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/components/game/mlb".to_string(),
            timeout_secs: 30,
            user_agent: concat!("gameday-feed/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FeedConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Default::default() }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("feed base_url must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("feed timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}
