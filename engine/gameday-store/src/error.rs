//! Error types for the storage layer

use thiserror::Error;

/// Result type alias for storage operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while talking to the store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached at startup
    #[error("Failed to connect to the database: {0}")]
    Connection(#[source] sqlx::Error),

    /// An insert hit a unique index. Expected when re-importing a game that
    /// was partially written by an earlier run.
    #[error("Duplicate key in {table}: {detail}")]
    DuplicateKey { table: &'static str, detail: String },

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, StoreError::DuplicateKey { .. })
    }
}
