//! The canonical position calculator: a pure fold over the ordered ledger.
//!
//! Every path that needs a position or balance (trade commit, replay,
//! valuation) goes through this module, so the weighted-average cost rule is
//! applied in exactly one place.

pub mod calculator_errors;
pub mod position_calculator;
pub mod positions_model;

pub use calculator_errors::CalculatorError;
pub use position_calculator::*;
pub use positions_model::*;
