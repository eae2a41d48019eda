use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("No quote available for symbol: {0}")]
    QuoteNotFound(String),

    #[error("Quote for {0} is stale")]
    StaleQuote(String),

    #[error("Quote provider failed: {0}")]
    Provider(String),

    #[error("Quote lookup for {0} timed out")]
    Timeout(String),
}
