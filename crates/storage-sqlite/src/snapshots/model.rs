//! Database model for valuation snapshots.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::{
    format_date, format_decimal, format_timestamp, parse_date, parse_decimal, parse_timestamp,
};
use stockfolio_core::snapshots::Snapshot;
use stockfolio_core::Result;

#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::snapshots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SnapshotDB {
    pub id: String,
    pub account_id: String,
    pub snapshot_date: String,
    pub total_value: String,
    pub created_at: String,
}

impl SnapshotDB {
    pub fn into_domain(self) -> Result<Snapshot> {
        Ok(Snapshot {
            id: self.id,
            account_id: self.account_id,
            snapshot_date: parse_date(&self.snapshot_date)?,
            total_value: parse_decimal(&self.total_value)?,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

impl From<&Snapshot> for SnapshotDB {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            id: snapshot.id.clone(),
            account_id: snapshot.account_id.clone(),
            snapshot_date: format_date(&snapshot.snapshot_date),
            total_value: format_decimal(&snapshot.total_value),
            created_at: format_timestamp(&snapshot.created_at),
        }
    }
}
