use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Current quantity and average cost basis for one instrument in one
/// account. Derived from the ordered transaction sequence, never
/// hand-edited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub account_id: String,
    pub symbol: String,
    pub quantity: Decimal,
    /// Quantity-weighted average purchase price. Changes only on buys.
    pub average_cost: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl Position {
    pub fn new(account_id: &str, symbol: &str, date: DateTime<Utc>) -> Self {
        Position {
            account_id: account_id.to_string(),
            symbol: symbol.to_string(),
            quantity: Decimal::ZERO,
            average_cost: Decimal::ZERO,
            updated_at: date,
        }
    }

    /// Total amount invested at cost: quantity times average cost.
    pub fn investment_value(&self) -> Decimal {
        self.quantity * self.average_cost
    }
}

/// Profit or loss recognized at the moment of a sell, based on the cost
/// basis at that time. Reported to the caller, never stored back into the
/// position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RealizedGain {
    pub symbol: String,
    pub quantity: Decimal,
    pub sell_price: Decimal,
    pub average_cost: Decimal,
    /// `(sell_price - average_cost) * quantity`
    pub amount: Decimal,
}
