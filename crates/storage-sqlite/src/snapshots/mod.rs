pub mod model;
pub mod repository;

pub use model::SnapshotDB;
pub use repository::SqliteSnapshotRepository;
