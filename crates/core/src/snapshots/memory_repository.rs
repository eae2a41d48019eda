use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;

use super::snapshots_model::Snapshot;
use super::snapshots_traits::SnapshotRepositoryTrait;
use crate::{Error, Result};

/// In-memory snapshot store, ordered by date per account.
#[derive(Default)]
pub struct MemorySnapshotRepository {
    snapshots: RwLock<HashMap<String, BTreeMap<NaiveDate, Snapshot>>>,
}

impl MemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotRepositoryTrait for MemorySnapshotRepository {
    async fn save(&self, snapshot: Snapshot) -> Result<Snapshot> {
        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|e| Error::Unexpected(e.to_string()))?;
        let by_date = snapshots.entry(snapshot.account_id.clone()).or_default();

        if let Some(existing) = by_date.get(&snapshot.snapshot_date) {
            debug!(
                "Snapshot {} already captured, keeping the stored value",
                existing.id
            );
            return Ok(existing.clone());
        }
        by_date.insert(snapshot.snapshot_date, snapshot.clone());
        Ok(snapshot)
    }

    fn get_by_date_range(
        &self,
        account_id: &str,
        start: Option<NaiveDate>,
        end: NaiveDate,
    ) -> Result<Vec<Snapshot>> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|e| Error::Unexpected(e.to_string()))?;
        Ok(snapshots
            .get(account_id)
            .map(|by_date| {
                by_date
                    .values()
                    .filter(|s| {
                        s.snapshot_date <= end
                            && start.map_or(true, |from| s.snapshot_date >= from)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get_latest(&self, account_id: &str) -> Result<Option<Snapshot>> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|e| Error::Unexpected(e.to_string()))?;
        Ok(snapshots
            .get(account_id)
            .and_then(|by_date| by_date.values().next_back().cloned()))
    }
}
