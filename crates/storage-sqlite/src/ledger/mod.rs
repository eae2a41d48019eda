pub mod model;
pub mod repository;

pub use model::{BalanceDB, IdempotencyRecordDB, PositionDB, TransactionDB};
pub use repository::SqliteLedgerRepository;
