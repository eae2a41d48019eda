use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ledger::TradeSide;
use crate::positions::Position;

/// A proposed trade, as submitted by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRequest {
    pub account_id: String,
    pub symbol: String,
    pub side: TradeSide,
    pub quantity: Decimal,
    pub price: Decimal,
    /// Client-supplied key making retried submissions commit at most once.
    pub idempotency_key: Option<String>,
}

impl TradeRequest {
    /// Stable fingerprint of the trade's semantic content. Two requests
    /// with the same idempotency key must also share this fingerprint to be
    /// treated as retries of one logical trade.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.account_id.as_bytes());
        hasher.update(b"|");
        hasher.update(self.symbol.as_bytes());
        hasher.update(b"|");
        hasher.update(self.side.as_str().as_bytes());
        hasher.update(b"|");
        hasher.update(self.quantity.normalize().to_string().as_bytes());
        hasher.update(b"|");
        hasher.update(self.price.normalize().to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Result of a committed trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeConfirmation {
    pub transaction_id: String,
    pub new_balance: Decimal,
    pub new_position: Position,
    /// Present on sells: gain recognized against the cost basis at the
    /// time of the sale.
    pub realized_gain: Option<Decimal>,
}

/// Lifecycle of a trade request. A request either reaches `Committed` or
/// ends `Rejected`; no intermediate state is ever observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeState {
    Received,
    Validated,
    Committed,
    Rejected,
}

/// Tuning for the trade executor's per-account serialization.
#[derive(Debug, Clone)]
pub struct TradingConfig {
    /// How long one attempt waits for the account lock.
    pub lock_timeout: Duration,
    /// Lock attempts before the trade is rejected as busy.
    pub max_lock_retries: u32,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_millis(500),
            max_lock_retries: 3,
        }
    }
}
