use std::sync::Arc;

use async_trait::async_trait;
use diesel::dsl::max;
use diesel::prelude::*;
use log::debug;

use super::model::{BalanceDB, IdempotencyRecordDB, PositionDB, TransactionDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{balances, idempotency_keys, positions, transactions};
use crate::utils::parse_decimal;
use stockfolio_core::constants::is_quantity_significant;
use stockfolio_core::ledger::{
    Balance, IdempotencyRecord, LedgerError, LedgerRepositoryTrait, NewTransaction, Transaction,
};
use stockfolio_core::positions::Position;
use stockfolio_core::Result;

/// Ledger persistence over SQLite.
///
/// Reads go straight to the pool. `commit_trade` runs as one job on the
/// single-writer actor, so the append, position, balance and idempotency
/// writes share one immediate transaction and the WAL flush happens before
/// the caller sees success.
pub struct SqliteLedgerRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SqliteLedgerRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl LedgerRepositoryTrait for SqliteLedgerRepository {
    fn replay(&self, account_id: &str) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        // Timestamps are fixed-width UTC text, so this text ordering is the
        // (timestamp, sequence_number) ordering the calculator requires.
        transactions::table
            .filter(transactions::account_id.eq(account_id))
            .order((
                transactions::timestamp.asc(),
                transactions::sequence_number.asc(),
            ))
            .select(TransactionDB::as_select())
            .load::<TransactionDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(TransactionDB::into_domain)
            .collect()
    }

    fn get_transaction(&self, transaction_id: &str) -> Result<Option<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        transactions::table
            .find(transaction_id)
            .select(TransactionDB::as_select())
            .first::<TransactionDB>(&mut conn)
            .optional()
            .into_core()?
            .map(TransactionDB::into_domain)
            .transpose()
    }

    fn get_positions(&self, account_id: &str) -> Result<Vec<Position>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = positions::table
            .filter(positions::account_id.eq(account_id))
            .order(positions::symbol.asc())
            .select(PositionDB::as_select())
            .load::<PositionDB>(&mut conn)
            .into_core()?;

        let mut held = Vec::with_capacity(rows.len());
        for row in rows {
            // Fully-sold rows stay in the table to preserve their cost
            // history, but are not listed as holdings.
            if is_quantity_significant(&parse_decimal(&row.quantity)?) {
                held.push(row.into_domain()?);
            }
        }
        Ok(held)
    }

    fn get_position(&self, account_id: &str, symbol: &str) -> Result<Option<Position>> {
        let mut conn = get_connection(&self.pool)?;
        positions::table
            .find(PositionDB::row_id(account_id, symbol))
            .select(PositionDB::as_select())
            .first::<PositionDB>(&mut conn)
            .optional()
            .into_core()?
            .map(PositionDB::into_domain)
            .transpose()
    }

    fn get_balance(&self, account_id: &str) -> Result<Option<Balance>> {
        let mut conn = get_connection(&self.pool)?;
        balances::table
            .find(account_id)
            .select(BalanceDB::as_select())
            .first::<BalanceDB>(&mut conn)
            .optional()
            .into_core()?
            .map(BalanceDB::into_domain)
            .transpose()
    }

    fn find_idempotent(&self, key: &str) -> Result<Option<IdempotencyRecord>> {
        let mut conn = get_connection(&self.pool)?;
        idempotency_keys::table
            .find(key)
            .select(IdempotencyRecordDB::as_select())
            .first::<IdempotencyRecordDB>(&mut conn)
            .optional()
            .into_core()?
            .map(IdempotencyRecordDB::into_domain)
            .transpose()
    }

    async fn commit_trade(
        &self,
        transaction: NewTransaction,
        position: Position,
        balance: Balance,
        idempotency: Option<IdempotencyRecord>,
    ) -> Result<Transaction> {
        transaction.validate()?;

        self.writer
            .exec(move |conn| {
                let last_sequence: Option<i64> = transactions::table
                    .filter(transactions::account_id.eq(&transaction.account_id))
                    .select(max(transactions::sequence_number))
                    .first(conn)
                    .into_core()?;
                let committed = transaction.into_transaction(last_sequence.unwrap_or(0) + 1);

                diesel::insert_into(transactions::table)
                    .values(TransactionDB::from(&committed))
                    .execute(conn)
                    .into_core()?;

                diesel::replace_into(positions::table)
                    .values(PositionDB::from(&position))
                    .execute(conn)
                    .into_core()?;

                diesel::replace_into(balances::table)
                    .values(BalanceDB::from(&balance))
                    .execute(conn)
                    .into_core()?;

                if let Some(record) = &idempotency {
                    // A key written by a commit that raced past the executor's
                    // pre-check must fail the whole transaction, not clobber
                    // the stored confirmation.
                    let taken = idempotency_keys::table
                        .find(&record.key)
                        .count()
                        .get_result::<i64>(conn)
                        .into_core()?
                        > 0;
                    if taken {
                        return Err(
                            LedgerError::DuplicateIdempotencyKey(record.key.clone()).into()
                        );
                    }
                    diesel::insert_into(idempotency_keys::table)
                        .values(IdempotencyRecordDB::from(record))
                        .execute(conn)
                        .into_core()?;
                }

                debug!(
                    "Committed transaction {} (sequence {}) for account {}",
                    committed.id, committed.sequence_number, committed.account_id
                );
                Ok(committed)
            })
            .await
    }
}
