use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use log::debug;

use super::model::SnapshotDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::snapshots;
use crate::utils::format_date;
use stockfolio_core::snapshots::{Snapshot, SnapshotRepositoryTrait};
use stockfolio_core::Result;

/// Snapshot persistence over SQLite.
pub struct SqliteSnapshotRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SqliteSnapshotRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl SnapshotRepositoryTrait for SqliteSnapshotRepository {
    async fn save(&self, snapshot: Snapshot) -> Result<Snapshot> {
        let row = SnapshotDB::from(&snapshot);
        self.writer
            .exec(move |conn| {
                // Snapshots are written once and never revised, so a
                // conflicting insert is dropped and the stored row returned.
                let inserted = diesel::insert_into(snapshots::table)
                    .values(&row)
                    .on_conflict(snapshots::id)
                    .do_nothing()
                    .execute(conn)
                    .into_core()?;
                if inserted == 0 {
                    debug!("Snapshot {} already captured, keeping the stored value", row.id);
                }

                snapshots::table
                    .find(&row.id)
                    .select(SnapshotDB::as_select())
                    .first::<SnapshotDB>(conn)
                    .into_core()?
                    .into_domain()
            })
            .await
    }

    fn get_by_date_range(
        &self,
        account_id: &str,
        start: Option<NaiveDate>,
        end: NaiveDate,
    ) -> Result<Vec<Snapshot>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = snapshots::table
            .filter(snapshots::account_id.eq(account_id))
            .filter(snapshots::snapshot_date.le(format_date(&end)))
            .into_boxed();
        if let Some(from) = start {
            query = query.filter(snapshots::snapshot_date.ge(format_date(&from)));
        }

        query
            .order(snapshots::snapshot_date.asc())
            .select(SnapshotDB::as_select())
            .load::<SnapshotDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(SnapshotDB::into_domain)
            .collect()
    }

    fn get_latest(&self, account_id: &str) -> Result<Option<Snapshot>> {
        let mut conn = get_connection(&self.pool)?;
        snapshots::table
            .filter(snapshots::account_id.eq(account_id))
            .order(snapshots::snapshot_date.desc())
            .select(SnapshotDB::as_select())
            .first::<SnapshotDB>(&mut conn)
            .optional()
            .into_core()?
            .map(SnapshotDB::into_domain)
            .transpose()
    }
}
