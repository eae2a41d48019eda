use async_trait::async_trait;

use super::ledger_model::{Balance, IdempotencyRecord, NewTransaction, Transaction};
use crate::positions::Position;
use crate::Result;

/// Contract for the ledger store and its materialized views.
///
/// The ledger is append-only; `commit_trade` is the only write path and the
/// trade executor is its only caller. Positions and the cash balance are
/// views kept consistent with the ledger under the same commit, so readers
/// observe either the pre- or post-commit state, never a torn one.
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    /// All transactions for an account, ordered by (timestamp,
    /// sequence_number) ascending. Side-effect free.
    fn replay(&self, account_id: &str) -> Result<Vec<Transaction>>;

    fn get_transaction(&self, transaction_id: &str) -> Result<Option<Transaction>>;

    /// Materialized positions with a significant quantity.
    fn get_positions(&self, account_id: &str) -> Result<Vec<Position>>;

    fn get_position(&self, account_id: &str, symbol: &str) -> Result<Option<Position>>;

    /// Materialized cash balance. `None` until the first committed trade.
    fn get_balance(&self, account_id: &str) -> Result<Option<Balance>>;

    fn find_idempotent(&self, key: &str) -> Result<Option<IdempotencyRecord>>;

    /// Atomically appends the transaction (assigning the next per-account
    /// sequence number), updates the position and balance views, and stores
    /// the idempotency record. All four succeed or none do, and the append
    /// is durable before this returns.
    async fn commit_trade(
        &self,
        transaction: NewTransaction,
        position: Position,
        balance: Balance,
        idempotency: Option<IdempotencyRecord>,
    ) -> Result<Transaction>;
}
