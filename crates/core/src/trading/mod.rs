//! Trade execution: validation, per-account serialization, atomic commit.

pub mod trade_executor;
pub mod trading_errors;
pub mod trading_model;

pub use trade_executor::{TradeExecutor, TradeExecutorTrait};
pub use trading_errors::TradeError;
pub use trading_model::*;

#[cfg(test)]
mod trade_executor_tests;
