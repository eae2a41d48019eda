use async_trait::async_trait;
use chrono::NaiveDate;

use super::snapshots_model::Snapshot;
use crate::Result;

/// Contract for snapshot persistence.
///
/// `save` is first-write-wins: a snapshot already stored for the same
/// (account, day) is returned unchanged and the new value is discarded.
#[async_trait]
pub trait SnapshotRepositoryTrait: Send + Sync {
    async fn save(&self, snapshot: Snapshot) -> Result<Snapshot>;
    fn get_by_date_range(
        &self,
        account_id: &str,
        start: Option<NaiveDate>,
        end: NaiveDate,
    ) -> Result<Vec<Snapshot>>;
    fn get_latest(&self, account_id: &str) -> Result<Option<Snapshot>>;
}
