use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error(
        "Insufficient history for account {account_id}: {found} snapshot(s) in the requested range, need at least 2"
    )]
    InsufficientData { account_id: String, found: usize },
}
