pub mod memory_repository;
pub mod snapshot_service;
pub mod snapshots_errors;
pub mod snapshots_model;
pub mod snapshots_traits;

pub use memory_repository::MemorySnapshotRepository;
pub use snapshot_service::{spawn_periodic_capture, SnapshotService, SnapshotServiceTrait};
pub use snapshots_errors::SnapshotError;
pub use snapshots_model::*;
pub use snapshots_traits::SnapshotRepositoryTrait;
