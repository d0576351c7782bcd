//! Error types for the importer

use gameday_feed::FeedError;
use gameday_store::StoreError;
use thiserror::Error;

/// Result type alias for import operations
pub type Result<T> = std::result::Result<T, ImportError>;

/// Errors that stop an import job
#[derive(Error, Debug)]
pub enum ImportError {
    /// The feed could not be read
    #[error("Source fetch error: {0}")]
    Source(#[from] FeedError),

    /// The store rejected a read or write for a reason other than a duplicate key
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The job's task panicked or was torn down before reporting
    #[error("Import job for {team_code} did not complete: {message}")]
    WorkerPanicked { team_code: String, message: String },
}

/// A feed value that should have been numeric but was not.
///
/// Never fatal: callers substitute a conservative default.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed {field} value {value:?}")]
pub struct MalformedField {
    pub field: &'static str,
    pub value: String,
}

impl MalformedField {
    pub fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self { field, value: value.into() }
    }
}
