use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::debug;
use rust_decimal::Decimal;

use super::calculator_errors::CalculatorError;
use super::positions_model::{Position, RealizedGain};
use crate::ledger::{TradeSide, Transaction};

/// Applies one trade to a prior position, producing the next position and,
/// for sells, the realized gain.
///
/// Fold rules:
/// - buy of `q` at `p`: `avg' = (qty * avg + q * p) / (qty + q)`, `qty' = qty + q`
/// - sell of `q` at `p` (requires `q <= qty`): `qty' = qty - q`, average
///   cost unchanged; realized gain `(p - avg) * q` is reported, not stored.
///
/// This is both the incremental-update path used at commit time and the
/// step function of the full replay; the two must agree for every history.
pub fn apply_trade(
    prior: Option<&Position>,
    account_id: &str,
    symbol: &str,
    side: TradeSide,
    quantity: Decimal,
    price: Decimal,
    at: DateTime<Utc>,
) -> Result<(Position, Option<RealizedGain>), CalculatorError> {
    if quantity <= Decimal::ZERO || price <= Decimal::ZERO {
        return Err(CalculatorError::InvalidTransaction(format!(
            "quantity and price must be strictly positive (quantity {}, price {})",
            quantity, price
        )));
    }

    let mut position = prior
        .cloned()
        .unwrap_or_else(|| Position::new(account_id, symbol, at));

    match side {
        TradeSide::Buy => {
            let old_quantity = position.quantity;
            let new_quantity = old_quantity + quantity;
            // Weighted-average cost over the combined quantity. new_quantity
            // is strictly positive here, so the division is safe.
            position.average_cost = (old_quantity * position.average_cost + quantity * price)
                / new_quantity;
            position.quantity = new_quantity;
            position.updated_at = at;
            Ok((position, None))
        }
        TradeSide::Sell => {
            if quantity > position.quantity {
                return Err(CalculatorError::InsufficientShares {
                    symbol: symbol.to_string(),
                    requested: quantity,
                    held: position.quantity,
                });
            }
            let gain = RealizedGain {
                symbol: symbol.to_string(),
                quantity,
                sell_price: price,
                average_cost: position.average_cost,
                amount: (price - position.average_cost) * quantity,
            };
            position.quantity -= quantity;
            position.updated_at = at;
            Ok((position, Some(gain)))
        }
    }
}

/// Applies a committed transaction. Thin wrapper over [`apply_trade`] so
/// replay and incremental update share one step function.
pub fn apply_transaction(
    prior: Option<&Position>,
    transaction: &Transaction,
) -> Result<(Position, Option<RealizedGain>), CalculatorError> {
    apply_trade(
        prior,
        &transaction.account_id,
        &transaction.symbol,
        transaction.side,
        transaction.quantity,
        transaction.price,
        transaction.timestamp,
    )
}

/// Rebuilds all positions for one account from its full ordered transaction
/// sequence. The input must already be ordered by (timestamp,
/// sequence_number) ascending, as `replay` returns it.
pub fn replay_positions(
    transactions: &[Transaction],
) -> Result<HashMap<String, Position>, CalculatorError> {
    debug!("Replaying {} transactions", transactions.len());
    let mut positions: HashMap<String, Position> = HashMap::new();

    for transaction in transactions {
        let prior = positions.get(&transaction.symbol);
        let (next, _realized) = apply_transaction(prior, transaction)?;
        positions.insert(transaction.symbol.clone(), next);
    }

    Ok(positions)
}

/// Derives the cash balance from the full transaction history:
/// `initial_cash - sum(buy cost) + sum(sell proceeds)`.
pub fn replay_balance(initial_cash: Decimal, transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .fold(initial_cash, |cash, txn| match txn.side {
            TradeSide::Buy => cash - txn.gross_amount(),
            TradeSide::Sell => cash + txn.gross_amount(),
        })
}

/// Realized gains recognized over a transaction history, in sequence order.
pub fn replay_realized_gains(
    transactions: &[Transaction],
) -> Result<Vec<RealizedGain>, CalculatorError> {
    let mut positions: HashMap<String, Position> = HashMap::new();
    let mut gains = Vec::new();

    for transaction in transactions {
        let prior = positions.get(&transaction.symbol);
        let (next, realized) = apply_transaction(prior, transaction)?;
        positions.insert(transaction.symbol.clone(), next);
        if let Some(gain) = realized {
            gains.push(gain);
        }
    }

    Ok(gains)
}
