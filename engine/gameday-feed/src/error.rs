//! Error types for the gameday feed

use thiserror::Error;

/// Result type alias for feed operations
pub type Result<T> = std::result::Result<T, FeedError>;

/// Failures reaching or reading the gameday feed.
///
/// None of these are retried: the job that hit one stops.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Transport-level failure (connect, timeout, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed answered with a non-success status
    #[error("Feed request to {url} failed with status {status}")]
    Status { url: String, status: reqwest::StatusCode },

    /// The feed answered with a body that is not the expected JSON document
    #[error("Failed to decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL cannot be used to build request URLs
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),
}

impl FeedError {
    pub fn invalid_url(msg: impl Into<String>) -> Self {
        Self::InvalidUrl(msg.into())
    }
}
