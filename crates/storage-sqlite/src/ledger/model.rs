//! Database models for the ledger and its materialized views.

use std::str::FromStr;

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::StorageError;
use crate::utils::{format_decimal, format_timestamp, parse_decimal, parse_timestamp};
use stockfolio_core::ledger::{Balance, IdempotencyRecord, TradeSide, Transaction};
use stockfolio_core::positions::Position;
use stockfolio_core::Result;

#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub account_id: String,
    pub symbol: String,
    pub side: String,
    pub quantity: String,
    pub price: String,
    pub timestamp: String,
    pub sequence_number: i64,
    pub created_at: String,
}

impl TransactionDB {
    pub fn into_domain(self) -> Result<Transaction> {
        Ok(Transaction {
            id: self.id,
            account_id: self.account_id,
            symbol: self.symbol,
            side: TradeSide::from_str(&self.side)
                .map_err(|e| StorageError::Decode(e.to_string()))?,
            quantity: parse_decimal(&self.quantity)?,
            price: parse_decimal(&self.price)?,
            timestamp: parse_timestamp(&self.timestamp)?,
            sequence_number: self.sequence_number,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

impl From<&Transaction> for TransactionDB {
    fn from(txn: &Transaction) -> Self {
        Self {
            id: txn.id.clone(),
            account_id: txn.account_id.clone(),
            symbol: txn.symbol.clone(),
            side: txn.side.as_str().to_string(),
            quantity: format_decimal(&txn.quantity),
            price: format_decimal(&txn.price),
            timestamp: format_timestamp(&txn.timestamp),
            sequence_number: txn.sequence_number,
            created_at: format_timestamp(&txn.created_at),
        }
    }
}

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Serialize,
    Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::positions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PositionDB {
    pub id: String,
    pub account_id: String,
    pub symbol: String,
    pub quantity: String,
    pub average_cost: String,
    pub updated_at: String,
}

impl PositionDB {
    pub fn row_id(account_id: &str, symbol: &str) -> String {
        format!("{}:{}", account_id, symbol)
    }

    pub fn into_domain(self) -> Result<Position> {
        Ok(Position {
            account_id: self.account_id,
            symbol: self.symbol,
            quantity: parse_decimal(&self.quantity)?,
            average_cost: parse_decimal(&self.average_cost)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

impl From<&Position> for PositionDB {
    fn from(position: &Position) -> Self {
        Self {
            id: Self::row_id(&position.account_id, &position.symbol),
            account_id: position.account_id.clone(),
            symbol: position.symbol.clone(),
            quantity: format_decimal(&position.quantity),
            average_cost: format_decimal(&position.average_cost),
            updated_at: format_timestamp(&position.updated_at),
        }
    }
}

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Serialize,
    Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::balances)]
#[diesel(primary_key(account_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BalanceDB {
    pub account_id: String,
    pub cash: String,
    pub updated_at: String,
}

impl BalanceDB {
    pub fn into_domain(self) -> Result<Balance> {
        Ok(Balance {
            account_id: self.account_id,
            cash: parse_decimal(&self.cash)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

impl From<&Balance> for BalanceDB {
    fn from(balance: &Balance) -> Self {
        Self {
            account_id: balance.account_id.clone(),
            cash: format_decimal(&balance.cash),
            updated_at: format_timestamp(&balance.updated_at),
        }
    }
}

#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::idempotency_keys)]
#[diesel(primary_key(key))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct IdempotencyRecordDB {
    pub key: String,
    pub account_id: String,
    pub fingerprint: String,
    pub transaction_id: String,
    pub result: String,
    pub created_at: String,
}

impl IdempotencyRecordDB {
    pub fn into_domain(self) -> Result<IdempotencyRecord> {
        Ok(IdempotencyRecord {
            key: self.key,
            account_id: self.account_id,
            fingerprint: self.fingerprint,
            transaction_id: self.transaction_id,
            result: self.result,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

impl From<&IdempotencyRecord> for IdempotencyRecordDB {
    fn from(record: &IdempotencyRecord) -> Self {
        Self {
            key: record.key.clone(),
            account_id: record.account_id.clone(),
            fingerprint: record.fingerprint.clone(),
            transaction_id: record.transaction_id.clone(),
            result: record.result.clone(),
            created_at: format_timestamp(&record.created_at),
        }
    }
}
