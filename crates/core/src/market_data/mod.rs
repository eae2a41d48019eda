pub mod market_data_errors;
pub mod market_data_model;
pub mod market_data_service;
pub mod market_data_traits;
pub mod memory_repository;

pub use market_data_errors::MarketDataError;
pub use market_data_model::*;
pub use market_data_service::MarketDataService;
pub use market_data_traits::*;
pub use memory_repository::MemoryQuoteRepository;
