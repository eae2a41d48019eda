//! SQLite storage implementation for the stockfolio engine.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `stockfolio-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The single-writer actor that gives `commit_trade` its atomicity
//! - Repository implementations for the ledger, accounts, quotes and
//!   snapshots
//!
//! This crate is the only place where Diesel dependencies exist; `core` is
//! database-agnostic and works with traits.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod accounts;
pub mod ledger;
pub mod market_data;
pub mod snapshots;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from stockfolio-core for convenience
pub use stockfolio_core::errors::{DatabaseError, Error, Result};
