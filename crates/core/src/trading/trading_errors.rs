use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a trade submission is rejected or cannot currently proceed.
///
/// Business-rule rejections (`InsufficientFunds`, `InsufficientShares`)
/// leave account state untouched and carry the specific shortfall. `Busy`
/// is the only transient variant; it is surfaced after bounded internal
/// retries and is safe for the caller to retry.
#[derive(Error, Debug)]
pub enum TradeError {
    #[error("Invalid trade request: {0}")]
    Validation(String),

    #[error("Insufficient funds: trade costs {required}, balance is {available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    #[error("Insufficient shares of {symbol}: requested {requested}, held {held}")]
    InsufficientShares {
        symbol: String,
        requested: Decimal,
        held: Decimal,
    },

    #[error("Account {0} is busy with another trade, try again")]
    Busy(String),

    #[error("Idempotency key '{0}' was already used for a different trade")]
    DuplicateKeyConflict(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),
}
