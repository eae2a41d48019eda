use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use tokio::time::timeout;

use super::market_data_errors::MarketDataError;
use super::market_data_model::{MarketDataConfig, Quote, QuoteSnapshot};
use super::market_data_traits::{
    MarketDataServiceTrait, QuoteProviderTrait, QuoteRepositoryTrait,
};
use crate::Result;

/// Quote reads with bounded provider lookups.
///
/// A lookup that errors or exceeds the timeout falls back to the last
/// cached quote; a quote older than the staleness threshold is served with
/// a stale flag rather than failing the read (unless hard-fail is
/// configured).
pub struct MarketDataService {
    provider: Arc<dyn QuoteProviderTrait>,
    repository: Arc<dyn QuoteRepositoryTrait>,
    config: MarketDataConfig,
}

impl MarketDataService {
    pub fn new(
        provider: Arc<dyn QuoteProviderTrait>,
        repository: Arc<dyn QuoteRepositoryTrait>,
    ) -> Self {
        Self::with_config(provider, repository, MarketDataConfig::default())
    }

    pub fn with_config(
        provider: Arc<dyn QuoteProviderTrait>,
        repository: Arc<dyn QuoteRepositoryTrait>,
        config: MarketDataConfig,
    ) -> Self {
        Self {
            provider,
            repository,
            config,
        }
    }

    fn is_stale(&self, quote: &Quote) -> bool {
        Utc::now() - quote.as_of > self.config.staleness_threshold
    }

    fn snapshot(&self, quote: Quote, symbol: &str) -> Result<Option<QuoteSnapshot>> {
        let is_stale = self.is_stale(&quote);
        if is_stale && self.config.fail_on_stale {
            return Err(MarketDataError::StaleQuote(symbol.to_string()).into());
        }
        Ok(Some(QuoteSnapshot { quote, is_stale }))
    }
}

#[async_trait]
impl MarketDataServiceTrait for MarketDataService {
    async fn get_quote(&self, symbol: &str) -> Result<Option<QuoteSnapshot>> {
        match timeout(self.config.quote_timeout, self.provider.fetch_quote(symbol)).await {
            Ok(Ok(quote)) => {
                self.repository.save(&quote).await?;
                self.snapshot(quote, symbol)
            }
            Ok(Err(err)) => {
                warn!("Quote provider failed for {}: {}. Using cached quote.", symbol, err);
                self.cached_fallback(symbol, MarketDataError::QuoteNotFound(symbol.to_string()))
            }
            Err(_) => {
                warn!(
                    "Quote lookup for {} exceeded {:?}. Using cached quote.",
                    symbol, self.config.quote_timeout
                );
                self.cached_fallback(symbol, MarketDataError::Timeout(symbol.to_string()))
            }
        }
    }

    async fn get_quotes(&self, symbols: &[String]) -> Result<HashMap<String, QuoteSnapshot>> {
        let mut quotes = HashMap::with_capacity(symbols.len());
        for symbol in symbols {
            if let Some(snapshot) = self.get_quote(symbol).await? {
                quotes.insert(symbol.clone(), snapshot);
            }
        }
        Ok(quotes)
    }
}

impl MarketDataService {
    fn cached_fallback(&self, symbol: &str, miss: MarketDataError) -> Result<Option<QuoteSnapshot>> {
        match self.repository.get_latest(symbol)? {
            Some(quote) => self.snapshot(quote, symbol),
            None => {
                if self.config.fail_on_stale {
                    return Err(miss.into());
                }
                debug!("No cached quote for {}; valuation will treat it as unpriced", symbol);
                Ok(None)
            }
        }
    }
}
