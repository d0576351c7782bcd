//! # Gameday Importer
//!
//! Pulls completed games from a [`GameSource`](gameday_feed::GameSource),
//! flattens them into table rows and writes them through a
//! [`Store`](gameday_store::Store).
//!
//! - **outcome**: winner and walk-off loss for a tracked team
//! - **mapper**: game to pitch, hit, player and game-stat rows
//! - **coordinator**: one concurrent import job per team
//! - **config** / **logging** / **cli**: the binary's ambient setup

pub mod cli;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod logging;
pub mod mapper;
pub mod outcome;


pub use config::{ImporterConfig, LogFormat, LoggingConfig};
pub use coordinator::{
    ImportCoordinator, ImportJob, ImportScope, ImportSummary, JobStats, TeamReport, TeamStatus,
};
pub use error::{ImportError, MalformedField, Result};
pub use outcome::{resolve, GameOutcome};
