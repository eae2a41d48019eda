use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalculatorError {
    #[error("Insufficient shares of {symbol}: requested {requested}, held {held}")]
    InsufficientShares {
        symbol: String,
        requested: Decimal,
        held: Decimal,
    },

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
}
