use std::collections::HashMap;

use async_trait::async_trait;

use super::market_data_model::{Quote, QuoteSnapshot};
use crate::Result;

/// External market-data collaborator: symbol -> latest quote.
#[async_trait]
pub trait QuoteProviderTrait: Send + Sync {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote>;
}

/// Cache of the last quote seen per symbol. Lookups fall back to it when
/// the provider is slow or unavailable.
#[async_trait]
pub trait QuoteRepositoryTrait: Send + Sync {
    fn get_latest(&self, symbol: &str) -> Result<Option<Quote>>;
    async fn save(&self, quote: &Quote) -> Result<()>;
}

/// Contract for quote reads as the valuation engine consumes them.
#[async_trait]
pub trait MarketDataServiceTrait: Send + Sync {
    async fn get_quote(&self, symbol: &str) -> Result<Option<QuoteSnapshot>>;
    async fn get_quotes(&self, symbols: &[String]) -> Result<HashMap<String, QuoteSnapshot>>;
}
