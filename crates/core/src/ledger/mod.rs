//! Append-only trade ledger: the sole source of truth for account state.

pub mod ledger_errors;
pub mod ledger_model;
pub mod ledger_traits;
pub mod memory_repository;

pub use ledger_errors::LedgerError;
pub use ledger_model::*;
pub use ledger_traits::*;
pub use memory_repository::MemoryLedgerRepository;

#[cfg(test)]
mod memory_repository_tests;
