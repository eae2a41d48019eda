use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::{error, info};

use super::snapshots_errors::SnapshotError;
use super::snapshots_model::{HistoryPoint, HistoryRange, Snapshot};
use super::snapshots_traits::SnapshotRepositoryTrait;
use crate::accounts::AccountRepositoryTrait;
use crate::valuation::ValuationServiceTrait;
use crate::Result;

/// Contract for snapshot capture and history reads.
#[async_trait]
pub trait SnapshotServiceTrait: Send + Sync {
    async fn capture_snapshot(&self, account_id: &str, date: NaiveDate) -> Result<Snapshot>;
    async fn capture_all(&self, date: NaiveDate) -> Result<Vec<Snapshot>>;
    async fn get_history(
        &self,
        account_id: &str,
        range: HistoryRange,
    ) -> Result<Vec<HistoryPoint>>;
}

/// Captures one valuation per account per day for the history charts.
///
/// Capture is a single consistent valuation read followed by one insert;
/// it never holds an account trade lock.
pub struct SnapshotService {
    valuation_service: Arc<dyn ValuationServiceTrait>,
    account_repository: Arc<dyn AccountRepositoryTrait>,
    snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
}

impl SnapshotService {
    pub fn new(
        valuation_service: Arc<dyn ValuationServiceTrait>,
        account_repository: Arc<dyn AccountRepositoryTrait>,
        snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
    ) -> Self {
        Self {
            valuation_service,
            account_repository,
            snapshot_repository,
        }
    }
}

#[async_trait]
impl SnapshotServiceTrait for SnapshotService {
    async fn capture_snapshot(&self, account_id: &str, date: NaiveDate) -> Result<Snapshot> {
        let valuation = self.valuation_service.get_valuation(account_id).await?;
        let snapshot = Snapshot::new(account_id, date, valuation.total_portfolio_value);

        // First write wins: a re-capture for the same day returns the
        // stored snapshot untouched.
        let stored = self.snapshot_repository.save(snapshot).await?;
        info!(
            "Snapshot {} captured: total value {}",
            stored.id, stored.total_value
        );
        Ok(stored)
    }

    async fn capture_all(&self, date: NaiveDate) -> Result<Vec<Snapshot>> {
        let accounts = self.account_repository.list_active()?;
        let mut captured = Vec::with_capacity(accounts.len());

        for account in accounts {
            match self.capture_snapshot(&account.id, date).await {
                Ok(snapshot) => captured.push(snapshot),
                // One failing account must not block the rest of the run.
                Err(e) => error!("Snapshot capture failed for account {}: {}", account.id, e),
            }
        }
        Ok(captured)
    }

    async fn get_history(
        &self,
        account_id: &str,
        range: HistoryRange,
    ) -> Result<Vec<HistoryPoint>> {
        let today = Utc::now().date_naive();
        let start = range.start_date(today);
        let snapshots = self
            .snapshot_repository
            .get_by_date_range(account_id, start, today)?;

        if snapshots.len() < 2 {
            return Err(SnapshotError::InsufficientData {
                account_id: account_id.to_string(),
                found: snapshots.len(),
            }
            .into());
        }
        Ok(snapshots.iter().map(HistoryPoint::from).collect())
    }
}

/// Spawns the periodic capture loop. Runs until the returned handle is
/// aborted.
pub fn spawn_periodic_capture(
    service: Arc<dyn SnapshotServiceTrait>,
    every: std::time::Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let today = Utc::now().date_naive();
            if let Err(e) = service.capture_all(today).await {
                error!("Periodic snapshot run failed: {}", e);
            }
        }
    })
}
