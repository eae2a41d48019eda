use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ledger_errors::LedgerError;

pub const TRADE_SIDE_BUY: &str = "BUY";
pub const TRADE_SIDE_SELL: &str = "SELL";

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => TRADE_SIDE_BUY,
            TradeSide::Sell => TRADE_SIDE_SELL,
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeSide {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            TRADE_SIDE_BUY => Ok(TradeSide::Buy),
            TRADE_SIDE_SELL => Ok(TradeSide::Sell),
            other => Err(LedgerError::InvalidTransaction(format!(
                "unknown trade side '{}'",
                other
            ))),
        }
    }
}

/// A committed trade event. Immutable once appended to the ledger.
///
/// `sequence_number` is assigned by the store at commit time and totally
/// orders same-timestamp events within an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub symbol: String,
    pub side: TradeSide,
    pub quantity: Decimal,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
    pub sequence_number: i64,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Cash moved by this trade: quantity times price.
    pub fn gross_amount(&self) -> Decimal {
        self.quantity * self.price
    }
}

/// A trade event before the store has assigned its sequence number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub id: String,
    pub account_id: String,
    pub symbol: String,
    pub side: TradeSide,
    pub quantity: Decimal,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl NewTransaction {
    pub fn new(
        account_id: &str,
        symbol: &str,
        side: TradeSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            account_id: account_id.to_string(),
            symbol: symbol.to_string(),
            side,
            quantity,
            price,
            timestamp: Utc::now(),
        }
    }

    /// Rejects malformed trades before any state is touched.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.symbol.trim().is_empty() {
            return Err(LedgerError::InvalidTransaction(
                "symbol is empty".to_string(),
            ));
        }
        if self.quantity <= Decimal::ZERO {
            return Err(LedgerError::InvalidTransaction(format!(
                "quantity must be strictly positive, got {}",
                self.quantity
            )));
        }
        if self.price <= Decimal::ZERO {
            return Err(LedgerError::InvalidTransaction(format!(
                "price must be strictly positive, got {}",
                self.price
            )));
        }
        Ok(())
    }

    pub fn gross_amount(&self) -> Decimal {
        self.quantity * self.price
    }

    /// Promotes this event to a committed transaction once the store has
    /// assigned the sequence number.
    pub fn into_transaction(self, sequence_number: i64) -> Transaction {
        Transaction {
            id: self.id,
            account_id: self.account_id,
            symbol: self.symbol,
            side: self.side,
            quantity: self.quantity,
            price: self.price,
            timestamp: self.timestamp,
            sequence_number,
            created_at: Utc::now(),
        }
    }
}

/// Running cash balance for an account, materialized from the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub account_id: String,
    pub cash: Decimal,
    pub updated_at: DateTime<Utc>,
}

/// Record of a committed trade keyed by the client's idempotency key.
///
/// A retried submission with the same key and fingerprint returns the
/// stored result instead of double-applying the trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdempotencyRecord {
    pub key: String,
    pub account_id: String,
    /// SHA-256 over the normalized trade payload.
    pub fingerprint: String,
    pub transaction_id: String,
    /// The original `TradeConfirmation`, serialized as JSON.
    pub result: String,
    pub created_at: DateTime<Utc>,
}
