//! Gameday Feed
//!
//! Game model for play-by-play baseball data and the [`GameSource`] contract
//! the importer reads games through. [`HttpGameSource`] reads the JSON feed;
//! [`InMemoryGameSource`] serves games already held in memory.

pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod source;

pub use config::FeedConfig;
pub use error::{FeedError, Result};
pub use http::HttpGameSource;
pub use models::*;
pub use reqwest::StatusCode;
pub use source::{GameSource, GameStream, InMemoryGameSource};
