use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Valuation of one held instrument against its latest quote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentValuation {
    pub symbol: String,
    pub quantity: Decimal,
    pub average_cost: Decimal,
    pub current_price: Decimal,
    /// `quantity * current_price`
    pub current_value: Decimal,
    /// `quantity * average_cost`
    pub investment_value: Decimal,
    pub unrealized_gain: Decimal,
    /// Percent of investment value; 0 when the investment value is 0.
    pub unrealized_gain_percent: Decimal,
    /// `(current_price - previous_close) * quantity`
    pub day_change: Decimal,
    /// True when the figures are built on a quote older than the staleness
    /// threshold, or on no quote at all.
    pub is_stale: bool,
    /// False when no quote was available and the position is valued at
    /// zero.
    pub has_quote: bool,
}

/// Full valuation of an account: per-instrument figures plus the
/// portfolio-level summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountValuation {
    pub account_id: String,
    pub as_of: DateTime<Utc>,
    pub positions: Vec<InstrumentValuation>,
    pub cash_balance: Decimal,
    /// Sum of current values of all holdings, excluding cash.
    pub investment_value: Decimal,
    /// Holdings plus cash.
    pub total_portfolio_value: Decimal,
    pub total_gain: Decimal,
    pub total_gain_percent: Decimal,
    pub day_gain: Decimal,
    pub day_gain_percent: Decimal,
    /// True when any per-instrument figure is stale.
    pub has_stale_quotes: bool,
}
