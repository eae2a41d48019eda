use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Bucket for instruments whose reference data carries no sector.
pub const UNCATEGORIZED_SECTOR: &str = "Uncategorized";

/// Static reference data for a listed instrument, supplied by an external
/// catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentProfile {
    pub symbol: String,
    pub name: String,
    pub sector: Option<String>,
}

/// One slice of the sector breakdown for an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectorAllocation {
    pub sector: String,
    pub value: Decimal,
    /// Share of `total_portfolio_value`, cash included in the denominator.
    pub percentage: Decimal,
}
