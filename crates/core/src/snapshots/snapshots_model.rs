use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Point-in-time total value of an account. Written once per
/// (account, day) and never revised.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// `{account_id}_{yyyy-mm-dd}`, unique per account and day.
    pub id: String,
    pub account_id: String,
    pub snapshot_date: NaiveDate,
    pub total_value: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(account_id: &str, snapshot_date: NaiveDate, total_value: Decimal) -> Self {
        Self {
            id: Self::id_for(account_id, snapshot_date),
            account_id: account_id.to_string(),
            snapshot_date,
            total_value,
            created_at: Utc::now(),
        }
    }

    pub fn id_for(account_id: &str, snapshot_date: NaiveDate) -> String {
        format!("{}_{}", account_id, snapshot_date.format("%Y-%m-%d"))
    }
}

/// Lookback window for history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HistoryRange {
    Week,
    Month,
    Quarter,
    Year,
    All,
}

impl HistoryRange {
    /// Earliest date included in the range, or `None` for `All`.
    pub fn start_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        let days = match self {
            HistoryRange::Week => 7,
            HistoryRange::Month => 30,
            HistoryRange::Quarter => 90,
            HistoryRange::Year => 365,
            HistoryRange::All => return None,
        };
        Some(today - Duration::days(days))
    }
}

/// One point on a history chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub value: Decimal,
}

impl From<&Snapshot> for HistoryPoint {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            date: snapshot.snapshot_date,
            value: snapshot.total_value,
        }
    }
}
