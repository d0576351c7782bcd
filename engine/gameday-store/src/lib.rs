//! # Gameday Store
//!
//! Relational persistence for flattened gameday records.
//!
//! - **Store**: the contract import jobs write through
//! - **PgStore**: Postgres implementation over a shared sqlx pool
//! - **MemoryStore**: in-memory implementation with the same unique indexes
//! - **schema**: table definitions for `pitches`, `players`, `hits`,
//!   `game_stats` and the `imported_games` ledger

pub mod config;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod records;
pub mod schema;
pub mod store;

pub use config::DatabaseConfig;
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use records::{
    GameStatRecord, Half, HitRecord, PitchRecord, PlayerRecord, Record, RecordKind,
};
pub use store::Store;
