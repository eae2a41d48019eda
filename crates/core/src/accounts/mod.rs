pub mod accounts_errors;
pub mod accounts_model;
pub mod accounts_traits;
pub mod memory_repository;

pub use accounts_errors::AccountError;
pub use accounts_model::*;
pub use accounts_traits::*;
pub use memory_repository::MemoryAccountRepository;
