use async_trait::async_trait;
use dashmap::DashMap;

use super::market_data_model::Quote;
use super::market_data_traits::QuoteRepositoryTrait;
use crate::Result;

/// In-memory latest-quote cache.
#[derive(Default)]
pub struct MemoryQuoteRepository {
    quotes: DashMap<String, Quote>,
}

impl MemoryQuoteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuoteRepositoryTrait for MemoryQuoteRepository {
    fn get_latest(&self, symbol: &str) -> Result<Option<Quote>> {
        Ok(self.quotes.get(symbol).map(|q| q.value().clone()))
    }

    async fn save(&self, quote: &Quote) -> Result<()> {
        self.quotes.insert(quote.symbol.clone(), quote.clone());
        Ok(())
    }
}
