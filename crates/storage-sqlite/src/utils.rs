//! Text encodings for decimals, timestamps and dates.
//!
//! Decimals and timestamps are stored as TEXT. Timestamps use a fixed-width
//! UTC format so text ordering is chronological and the ledger's
//! `(timestamp, sequence_number)` ordering works as a plain SQL ORDER BY.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;

use crate::errors::StorageError;
use stockfolio_core::errors::Result;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .map_err(|e| StorageError::Decode(format!("bad timestamp '{}': {}", text, e)))?;
    Ok(naive.and_utc())
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|e| StorageError::Decode(format!("bad date '{}': {}", text, e)).into())
}

pub fn format_decimal(value: &Decimal) -> String {
    value.to_string()
}

pub fn parse_decimal(text: &str) -> Result<Decimal> {
    Decimal::from_str(text)
        .map_err(|e| StorageError::Decode(format!("bad decimal '{}': {}", text, e)).into())
}
