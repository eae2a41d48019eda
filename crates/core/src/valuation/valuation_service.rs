use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::valuation_calculator::value_account;
use super::valuation_model::AccountValuation;
use crate::accounts::{AccountError, AccountRepositoryTrait};
use crate::ledger::LedgerRepositoryTrait;
use crate::market_data::MarketDataServiceTrait;
use crate::Result;

/// Contract for account valuation reads.
#[async_trait]
pub trait ValuationServiceTrait: Send + Sync {
    async fn get_valuation(&self, account_id: &str) -> Result<AccountValuation>;
}

/// Lock-free valuation over a consistent read of positions and balance.
///
/// Runs fully in parallel with pending trades: it observes either the pre-
/// or post-commit state of the account, never a torn one, and takes no
/// account lock.
pub struct ValuationService {
    ledger_repository: Arc<dyn LedgerRepositoryTrait>,
    account_repository: Arc<dyn AccountRepositoryTrait>,
    market_data_service: Arc<dyn MarketDataServiceTrait>,
}

impl ValuationService {
    pub fn new(
        ledger_repository: Arc<dyn LedgerRepositoryTrait>,
        account_repository: Arc<dyn AccountRepositoryTrait>,
        market_data_service: Arc<dyn MarketDataServiceTrait>,
    ) -> Self {
        Self {
            ledger_repository,
            account_repository,
            market_data_service,
        }
    }
}

#[async_trait]
impl ValuationServiceTrait for ValuationService {
    async fn get_valuation(&self, account_id: &str) -> Result<AccountValuation> {
        let account = self
            .account_repository
            .get(account_id)?
            .ok_or_else(|| AccountError::NotFound(account_id.to_string()))?;

        let positions = self.ledger_repository.get_positions(account_id)?;
        let cash = match self.ledger_repository.get_balance(account_id)? {
            Some(balance) => balance.cash,
            None => account.initial_cash,
        };

        let symbols: Vec<String> = positions.iter().map(|p| p.symbol.clone()).collect();
        let quotes = self.market_data_service.get_quotes(&symbols).await?;

        debug!(
            "Valuing account {}: {} positions, {} quotes",
            account_id,
            positions.len(),
            quotes.len()
        );
        Ok(value_account(account_id, &positions, &quotes, cash))
    }
}
