//! Stockfolio Core - Ledger/valuation engine for trading accounts.
//!
//! This crate contains the core business logic: the append-only trade
//! ledger, position and balance derivation, the trade executor, and the
//! valuation, allocation and snapshot services. It is database-agnostic
//! and defines traits that are implemented by the `storage-sqlite` crate.

pub mod accounts;
pub mod allocation;
pub mod constants;
pub mod errors;
pub mod ledger;
pub mod market_data;
pub mod positions;
pub mod snapshots;
pub mod trading;
pub mod valuation;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
