use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use log::{debug, info, warn};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::timeout;

use super::trading_errors::TradeError;
use super::trading_model::{TradeConfirmation, TradeRequest, TradeState, TradingConfig};
use crate::accounts::AccountRepositoryTrait;
use crate::ledger::{
    Balance, IdempotencyRecord, LedgerError, LedgerRepositoryTrait, NewTransaction, TradeSide,
};
use crate::positions::{apply_trade, CalculatorError};
use crate::Result;

/// Contract for trade submission.
#[async_trait]
pub trait TradeExecutorTrait: Send + Sync {
    async fn submit_trade(&self, request: TradeRequest) -> Result<TradeConfirmation>;
}

/// The only writer of the ledger.
///
/// Trades for one account are mutually exclusive: the funds/shares check
/// and the subsequent commit happen under an account-scoped lock, so two
/// concurrent sells cannot both validate against the same stale quantity.
/// Valuation and aggregation reads never take this lock.
pub struct TradeExecutor {
    ledger_repository: Arc<dyn LedgerRepositoryTrait>,
    account_repository: Arc<dyn AccountRepositoryTrait>,
    account_locks: DashMap<String, Arc<Mutex<()>>>,
    config: TradingConfig,
}

impl TradeExecutor {
    pub fn new(
        ledger_repository: Arc<dyn LedgerRepositoryTrait>,
        account_repository: Arc<dyn AccountRepositoryTrait>,
    ) -> Self {
        Self::with_config(ledger_repository, account_repository, TradingConfig::default())
    }

    pub fn with_config(
        ledger_repository: Arc<dyn LedgerRepositoryTrait>,
        account_repository: Arc<dyn AccountRepositoryTrait>,
        config: TradingConfig,
    ) -> Self {
        Self {
            ledger_repository,
            account_repository,
            account_locks: DashMap::new(),
            config,
        }
    }

    /// Acquires the account's exclusive trade lock, retrying a bounded
    /// number of times before reporting the account as busy.
    async fn acquire_account_lock(&self, account_id: &str) -> Result<OwnedMutexGuard<()>> {
        let lock = {
            let entry = self
                .account_locks
                .entry(account_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())));
            entry.value().clone()
        };

        let attempts = self.config.max_lock_retries.max(1);
        for attempt in 1..=attempts {
            match timeout(self.config.lock_timeout, lock.clone().lock_owned()).await {
                Ok(guard) => return Ok(guard),
                Err(_) => {
                    warn!(
                        "Trade lock contention on account {} (attempt {}/{})",
                        account_id, attempt, attempts
                    );
                }
            }
        }
        Err(TradeError::Busy(account_id.to_string()).into())
    }

    fn validate_request(request: &TradeRequest) -> Result<()> {
        if request.symbol.trim().is_empty() {
            return Err(TradeError::Validation("symbol is empty".to_string()).into());
        }
        if request.quantity <= rust_decimal::Decimal::ZERO {
            return Err(TradeError::Validation(format!(
                "quantity must be strictly positive, got {}",
                request.quantity
            ))
            .into());
        }
        if request.price <= rust_decimal::Decimal::ZERO {
            return Err(TradeError::Validation(format!(
                "price must be strictly positive, got {}",
                request.price
            ))
            .into());
        }
        Ok(())
    }

    /// Returns the stored result for a retried submission, or an error when
    /// the key was reused for a different trade.
    fn check_idempotency(&self, request: &TradeRequest) -> Result<Option<TradeConfirmation>> {
        let Some(key) = request.idempotency_key.as_deref() else {
            return Ok(None);
        };
        match self.ledger_repository.find_idempotent(key)? {
            Some(record) if record.fingerprint == request.fingerprint() => {
                info!(
                    "Trade retry with idempotency key '{}' on account {}: returning original result",
                    key, request.account_id
                );
                let confirmation: TradeConfirmation = serde_json::from_str(&record.result)?;
                Ok(Some(confirmation))
            }
            Some(_) => Err(TradeError::DuplicateKeyConflict(key.to_string()).into()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl TradeExecutorTrait for TradeExecutor {
    async fn submit_trade(&self, request: TradeRequest) -> Result<TradeConfirmation> {
        let account_id = request.account_id.clone();
        let result = self.execute(request).await;
        if let Err(err) = &result {
            debug!(
                "Trade {:?} on account {}: {}",
                TradeState::Rejected,
                account_id,
                err
            );
        }
        result
    }
}

impl TradeExecutor {
    async fn execute(&self, request: TradeRequest) -> Result<TradeConfirmation> {
        debug!(
            "Trade {:?}: {} {} x {} @ {} for account {}",
            TradeState::Received,
            request.side,
            request.quantity,
            request.symbol,
            request.price,
            request.account_id
        );

        // Malformed requests are rejected before any state access.
        Self::validate_request(&request)?;

        let _guard = self.acquire_account_lock(&request.account_id).await?;

        // Checked under the lock so a racing retry cannot commit twice.
        if let Some(original) = self.check_idempotency(&request)? {
            return Ok(original);
        }

        let account = self
            .account_repository
            .get(&request.account_id)?
            .ok_or_else(|| TradeError::AccountNotFound(request.account_id.clone()))?;

        let cash = match self.ledger_repository.get_balance(&request.account_id)? {
            Some(balance) => balance.cash,
            None => account.initial_cash,
        };
        let prior_position = self
            .ledger_repository
            .get_position(&request.account_id, &request.symbol)?;

        let gross = request.quantity * request.price;
        let new_cash = match request.side {
            TradeSide::Buy => {
                if gross > cash {
                    return Err(TradeError::InsufficientFunds {
                        required: gross,
                        available: cash,
                    }
                    .into());
                }
                cash - gross
            }
            TradeSide::Sell => cash + gross,
        };

        let now = Utc::now();
        let (new_position, realized) = apply_trade(
            prior_position.as_ref(),
            &request.account_id,
            &request.symbol,
            request.side,
            request.quantity,
            request.price,
            now,
        )
        .map_err(|e| match e {
            CalculatorError::InsufficientShares {
                symbol,
                requested,
                held,
            } => crate::Error::Trade(TradeError::InsufficientShares {
                symbol,
                requested,
                held,
            }),
            other => crate::Error::Calculation(other),
        })?;
        debug!("Trade {:?} for account {}", TradeState::Validated, request.account_id);

        let transaction = NewTransaction::new(
            &request.account_id,
            &request.symbol,
            request.side,
            request.quantity,
            request.price,
        );
        let confirmation = TradeConfirmation {
            transaction_id: transaction.id.clone(),
            new_balance: new_cash,
            new_position: new_position.clone(),
            realized_gain: realized.as_ref().map(|g| g.amount),
        };

        let idempotency = match request.idempotency_key.as_deref() {
            Some(key) => Some(IdempotencyRecord {
                key: key.to_string(),
                account_id: request.account_id.clone(),
                fingerprint: request.fingerprint(),
                transaction_id: transaction.id.clone(),
                result: serde_json::to_string(&confirmation)?,
                created_at: now,
            }),
            None => None,
        };
        let balance = Balance {
            account_id: request.account_id.clone(),
            cash: new_cash,
            updated_at: now,
        };

        // Ledger append, position and balance update as one unit of work;
        // a persistence failure here rolls everything back.
        let committed = self
            .ledger_repository
            .commit_trade(transaction, new_position, balance, idempotency)
            .await
            .map_err(|e| match e {
                crate::Error::Ledger(LedgerError::DuplicateIdempotencyKey(key)) => {
                    crate::Error::Trade(TradeError::DuplicateKeyConflict(key))
                }
                other => other,
            })?;

        info!(
            "Trade {:?}: txn {} seq {} on account {}",
            TradeState::Committed,
            committed.id,
            committed.sequence_number,
            committed.account_id
        );
        Ok(confirmation)
    }
}
