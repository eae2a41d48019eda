/// Decimal precision for intermediate valuation calculations.
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display figures (percentages, reported gains).
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Quantity threshold below which a position is considered closed.
pub const QUANTITY_THRESHOLD: &str = "0.00000001";

/// Cash seeded into a new account when the caller does not specify an amount.
pub const DEFAULT_INITIAL_CASH: &str = "100000";

use rust_decimal::Decimal;

/// Returns true if the quantity is large enough to be listed as a holding.
pub fn is_quantity_significant(quantity: &Decimal) -> bool {
    let threshold =
        Decimal::from_str_radix(QUANTITY_THRESHOLD, 10).unwrap_or_else(|_| Decimal::new(1, 8));
    quantity.abs() >= threshold
}
