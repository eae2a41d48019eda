use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A market quote supplied by the external quote provider. May be stale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub current_price: Decimal,
    pub previous_close: Decimal,
    pub as_of: DateTime<Utc>,
}

impl Quote {
    /// Price move since the previous close, per share.
    pub fn day_move(&self) -> Decimal {
        self.current_price - self.previous_close
    }
}

/// A quote plus its freshness at the time of the read. Stale figures are
/// flagged, not discarded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSnapshot {
    pub quote: Quote,
    pub is_stale: bool,
}

/// Tuning for quote lookups and staleness classification.
#[derive(Debug, Clone)]
pub struct MarketDataConfig {
    /// Upper bound on one provider lookup; past it the cached quote is used.
    pub quote_timeout: std::time::Duration,
    /// A quote older than this is flagged stale.
    pub staleness_threshold: Duration,
    /// When set, a stale or missing quote fails the read instead of being
    /// flagged.
    pub fail_on_stale: bool,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            quote_timeout: std::time::Duration::from_secs(5),
            staleness_threshold: Duration::minutes(15),
            fail_on_stale: false,
        }
    }
}
