use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use log::debug;

use super::ledger_errors::LedgerError;
use super::ledger_model::{Balance, IdempotencyRecord, NewTransaction, Transaction};
use super::ledger_traits::LedgerRepositoryTrait;
use crate::constants::is_quantity_significant;
use crate::positions::Position;
use crate::{Error, Result};

#[derive(Default)]
struct AccountLedgerState {
    transactions: Vec<Transaction>,
    positions: HashMap<String, Position>,
    balance: Option<Balance>,
    next_sequence: i64,
}

/// In-memory ledger store. Commits happen under a single write lock, so the
/// append, position and balance updates are atomic with respect to readers.
///
/// Used by unit tests and available as a lightweight runtime store; the
/// durable SQLite implementation lives behind the same trait.
#[derive(Default)]
pub struct MemoryLedgerRepository {
    state: RwLock<HashMap<String, AccountLedgerState>>,
    idempotency: RwLock<HashMap<String, IdempotencyRecord>>,
}

impl MemoryLedgerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state<T>(
        &self,
        f: impl FnOnce(&HashMap<String, AccountLedgerState>) -> T,
    ) -> Result<T> {
        let state = self
            .state
            .read()
            .map_err(|e| Error::Unexpected(e.to_string()))?;
        Ok(f(&state))
    }
}

#[async_trait]
impl LedgerRepositoryTrait for MemoryLedgerRepository {
    fn replay(&self, account_id: &str) -> Result<Vec<Transaction>> {
        self.read_state(|state| {
            let mut txns = state
                .get(account_id)
                .map(|s| s.transactions.clone())
                .unwrap_or_default();
            txns.sort_by(|a, b| {
                a.timestamp
                    .cmp(&b.timestamp)
                    .then(a.sequence_number.cmp(&b.sequence_number))
            });
            txns
        })
    }

    fn get_transaction(&self, transaction_id: &str) -> Result<Option<Transaction>> {
        self.read_state(|state| {
            state
                .values()
                .flat_map(|s| s.transactions.iter())
                .find(|t| t.id == transaction_id)
                .cloned()
        })
    }

    fn get_positions(&self, account_id: &str) -> Result<Vec<Position>> {
        self.read_state(|state| {
            let mut positions: Vec<Position> = state
                .get(account_id)
                .map(|s| {
                    s.positions
                        .values()
                        .filter(|p| is_quantity_significant(&p.quantity))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            positions.sort_by(|a, b| a.symbol.cmp(&b.symbol));
            positions
        })
    }

    fn get_position(&self, account_id: &str, symbol: &str) -> Result<Option<Position>> {
        self.read_state(|state| {
            state
                .get(account_id)
                .and_then(|s| s.positions.get(symbol))
                .cloned()
        })
    }

    fn get_balance(&self, account_id: &str) -> Result<Option<Balance>> {
        self.read_state(|state| state.get(account_id).and_then(|s| s.balance.clone()))
    }

    fn find_idempotent(&self, key: &str) -> Result<Option<IdempotencyRecord>> {
        let records = self
            .idempotency
            .read()
            .map_err(|e| Error::Unexpected(e.to_string()))?;
        Ok(records.get(key).cloned())
    }

    async fn commit_trade(
        &self,
        transaction: NewTransaction,
        position: Position,
        balance: Balance,
        idempotency: Option<IdempotencyRecord>,
    ) -> Result<Transaction> {
        transaction.validate()?;
        if transaction.account_id != position.account_id
            || transaction.account_id != balance.account_id
        {
            return Err(LedgerError::InvalidTransaction(
                "transaction, position and balance must target one account".to_string(),
            )
            .into());
        }

        let mut state = self
            .state
            .write()
            .map_err(|e| Error::Unexpected(e.to_string()))?;
        let mut records = self
            .idempotency
            .write()
            .map_err(|e| Error::Unexpected(e.to_string()))?;
        if let Some(record) = &idempotency {
            if records.contains_key(&record.key) {
                return Err(LedgerError::DuplicateIdempotencyKey(record.key.clone()).into());
            }
        }
        let account_state = state.entry(transaction.account_id.clone()).or_default();

        account_state.next_sequence += 1;
        let committed = transaction.into_transaction(account_state.next_sequence);

        account_state.transactions.push(committed.clone());
        account_state
            .positions
            .insert(position.symbol.clone(), position);
        account_state.balance = Some(balance);

        if let Some(record) = idempotency {
            records.insert(record.key.clone(), record);
        }

        debug!(
            "Committed {} {} x {} @ {} for account {} (seq {})",
            committed.side,
            committed.quantity,
            committed.symbol,
            committed.price,
            committed.account_id,
            committed.sequence_number
        );
        Ok(committed)
    }
}
