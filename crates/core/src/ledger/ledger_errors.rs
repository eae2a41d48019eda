use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Idempotency key {0} is already committed")]
    DuplicateIdempotencyKey(String),
}
