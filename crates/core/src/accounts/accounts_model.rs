use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_INITIAL_CASH;

/// A trading account holding cash and instrument positions.
///
/// Identity verification is external: callers supply an authenticated
/// account id. The engine only needs the starting cash from which the
/// running balance is derived.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub currency: String,
    /// Cash the account opened with. The running balance is always
    /// `initial_cash` minus buy costs plus sell proceeds.
    pub initial_cash: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub id: Option<String>,
    pub name: String,
    pub currency: String,
    pub initial_cash: Option<Decimal>,
}

impl NewAccount {
    /// Starting cash, falling back to the default seed amount.
    pub fn initial_cash_or_default(&self) -> Decimal {
        self.initial_cash.unwrap_or_else(|| {
            Decimal::from_str_radix(DEFAULT_INITIAL_CASH, 10).unwrap_or(Decimal::ZERO)
        })
    }
}
