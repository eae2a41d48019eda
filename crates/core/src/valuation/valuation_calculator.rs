use std::collections::HashMap;

use chrono::Utc;
use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::valuation_model::{AccountValuation, InstrumentValuation};
use crate::market_data::QuoteSnapshot;
use crate::positions::Position;

/// Values one position against its quote snapshot.
///
/// A position without a quote is valued at zero and flagged, so one
/// unpriced symbol never fails the whole valuation.
pub fn value_position(position: &Position, quote: Option<&QuoteSnapshot>) -> InstrumentValuation {
    let investment_value = position.investment_value();

    let (current_price, day_move, is_stale, has_quote) = match quote {
        Some(snapshot) => (
            snapshot.quote.current_price,
            snapshot.quote.day_move(),
            snapshot.is_stale,
            true,
        ),
        None => {
            warn!(
                "No quote for {}; valuing position in account {} at zero",
                position.symbol, position.account_id
            );
            (Decimal::ZERO, Decimal::ZERO, true, false)
        }
    };

    let current_value = position.quantity * current_price;
    let unrealized_gain = current_value - investment_value;
    let unrealized_gain_percent = if investment_value.is_zero() {
        Decimal::ZERO
    } else {
        unrealized_gain / investment_value * dec!(100)
    };

    InstrumentValuation {
        symbol: position.symbol.clone(),
        quantity: position.quantity,
        average_cost: position.average_cost,
        current_price,
        current_value,
        investment_value,
        unrealized_gain,
        unrealized_gain_percent,
        day_change: day_move * position.quantity,
        is_stale,
        has_quote,
    }
}

/// Combines position valuations and the cash balance into the account
/// summary the dashboard reports.
pub fn value_account(
    account_id: &str,
    positions: &[Position],
    quotes: &HashMap<String, QuoteSnapshot>,
    cash_balance: Decimal,
) -> AccountValuation {
    let instrument_valuations: Vec<InstrumentValuation> = positions
        .iter()
        .map(|p| value_position(p, quotes.get(&p.symbol)))
        .collect();

    let investment_value: Decimal = instrument_valuations
        .iter()
        .map(|v| v.current_value)
        .sum();
    let total_investment: Decimal = instrument_valuations
        .iter()
        .map(|v| v.investment_value)
        .sum();
    let total_gain: Decimal = instrument_valuations
        .iter()
        .map(|v| v.unrealized_gain)
        .sum();
    let day_gain: Decimal = instrument_valuations.iter().map(|v| v.day_change).sum();

    let total_gain_percent = if total_investment.is_zero() {
        Decimal::ZERO
    } else {
        total_gain / total_investment * dec!(100)
    };

    // Day gain relative to yesterday's market value of the same holdings.
    let previous_value = investment_value - day_gain;
    let day_gain_percent = if previous_value.is_zero() {
        Decimal::ZERO
    } else {
        day_gain / previous_value * dec!(100)
    };

    AccountValuation {
        account_id: account_id.to_string(),
        as_of: Utc::now(),
        has_stale_quotes: instrument_valuations.iter().any(|v| v.is_stale),
        positions: instrument_valuations,
        cash_balance,
        investment_value,
        total_portfolio_value: investment_value + cash_balance,
        total_gain,
        total_gain_percent,
        day_gain,
        day_gain_percent,
    }
}
