pub mod model;
pub mod repository;

pub use model::AccountDB;
pub use repository::SqliteAccountRepository;
