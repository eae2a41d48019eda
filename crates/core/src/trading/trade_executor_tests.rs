use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::Notify;

use super::trade_executor::{TradeExecutor, TradeExecutorTrait};
use super::trading_errors::TradeError;
use super::trading_model::{TradeRequest, TradingConfig};
use crate::accounts::{AccountRepositoryTrait, MemoryAccountRepository, NewAccount};
use crate::ledger::{
    Balance, IdempotencyRecord, LedgerRepositoryTrait, MemoryLedgerRepository, NewTransaction,
    TradeSide, Transaction,
};
use crate::positions::{replay_balance, replay_positions, Position};
use crate::Error;

const ACCOUNT: &str = "acct-1";

async fn setup() -> (Arc<MemoryLedgerRepository>, TradeExecutor) {
    let ledger = Arc::new(MemoryLedgerRepository::new());
    let accounts = Arc::new(MemoryAccountRepository::new());
    accounts
        .create(NewAccount {
            id: Some(ACCOUNT.to_string()),
            name: "Test Account".to_string(),
            currency: "INR".to_string(),
            initial_cash: Some(dec!(100000)),
        })
        .await
        .unwrap();
    let executor = TradeExecutor::new(ledger.clone(), accounts);
    (ledger, executor)
}

fn request(side: TradeSide, quantity: Decimal, price: Decimal) -> TradeRequest {
    TradeRequest {
        account_id: ACCOUNT.to_string(),
        symbol: "RELIANCE".to_string(),
        side,
        quantity,
        price,
        idempotency_key: None,
    }
}

/// Walks a full buy/buy/sell sequence plus both rejection cases, starting
/// from 100000 cash.
#[tokio::test]
async fn trade_scenario_end_to_end() {
    let (ledger, executor) = setup().await;

    // 1. Buy 10 @ 100
    let c1 = executor
        .submit_trade(request(TradeSide::Buy, dec!(10), dec!(100)))
        .await
        .unwrap();
    assert_eq!(c1.new_balance, dec!(99000));
    assert_eq!(c1.new_position.quantity, dec!(10));
    assert_eq!(c1.new_position.average_cost, dec!(100));
    assert!(c1.realized_gain.is_none());

    // 2. Buy 5 @ 110
    let c2 = executor
        .submit_trade(request(TradeSide::Buy, dec!(5), dec!(110)))
        .await
        .unwrap();
    assert_eq!(c2.new_balance, dec!(98450));
    assert_eq!(c2.new_position.quantity, dec!(15));
    assert_eq!(c2.new_position.average_cost.round_dp(2), dec!(103.33));

    // 3. Sell 8 @ 120
    let c3 = executor
        .submit_trade(request(TradeSide::Sell, dec!(8), dec!(120)))
        .await
        .unwrap();
    assert_eq!(c3.new_balance, dec!(99410));
    assert_eq!(c3.new_position.quantity, dec!(7));
    assert_eq!(c3.new_position.average_cost, c2.new_position.average_cost);
    let realized = c3.realized_gain.unwrap();
    assert_eq!(realized, (dec!(120) - dec!(1550) / dec!(15)) * dec!(8));

    // 4. Sell 10 when only 7 are held
    let err = executor
        .submit_trade(request(TradeSide::Sell, dec!(10), dec!(120)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Trade(TradeError::InsufficientShares { .. })
    ));

    // 5. Buy costing more than the 99410 balance
    let err = executor
        .submit_trade(request(TradeSide::Buy, dec!(1000), dec!(100)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Trade(TradeError::InsufficientFunds { .. })
    ));

    // Rejections left the account exactly as step 3 committed it.
    let position = ledger.get_position(ACCOUNT, "RELIANCE").unwrap().unwrap();
    assert_eq!(position, c3.new_position);
    assert_eq!(ledger.get_balance(ACCOUNT).unwrap().unwrap().cash, dec!(99410));
    assert_eq!(ledger.replay(ACCOUNT).unwrap().len(), 3);
}

#[tokio::test]
async fn malformed_requests_are_rejected_before_state_access() {
    let (ledger, executor) = setup().await;

    for bad in [
        request(TradeSide::Buy, dec!(0), dec!(100)),
        request(TradeSide::Buy, dec!(-1), dec!(100)),
        request(TradeSide::Sell, dec!(5), dec!(0)),
        TradeRequest {
            symbol: "  ".to_string(),
            ..request(TradeSide::Buy, dec!(1), dec!(1))
        },
    ] {
        let err = executor.submit_trade(bad).await.unwrap_err();
        assert!(matches!(err, Error::Trade(TradeError::Validation(_))));
    }
    assert!(ledger.replay(ACCOUNT).unwrap().is_empty());
}

#[tokio::test]
async fn unknown_account_is_rejected() {
    let (_ledger, executor) = setup().await;
    let mut req = request(TradeSide::Buy, dec!(1), dec!(10));
    req.account_id = "no-such-account".to_string();

    let err = executor.submit_trade(req).await.unwrap_err();
    assert!(matches!(err, Error::Trade(TradeError::AccountNotFound(_))));
}

#[tokio::test]
async fn retried_submission_with_same_key_commits_once() {
    let (ledger, executor) = setup().await;
    let mut req = request(TradeSide::Buy, dec!(10), dec!(100));
    req.idempotency_key = Some("order-42".to_string());

    let first = executor.submit_trade(req.clone()).await.unwrap();
    let second = executor.submit_trade(req).await.unwrap();

    assert_eq!(first.transaction_id, second.transaction_id);
    assert_eq!(first.new_balance, second.new_balance);
    assert_eq!(ledger.replay(ACCOUNT).unwrap().len(), 1);
    assert_eq!(ledger.get_balance(ACCOUNT).unwrap().unwrap().cash, dec!(99000));
}

#[tokio::test]
async fn same_key_with_different_payload_is_rejected() {
    let (ledger, executor) = setup().await;
    let mut req = request(TradeSide::Buy, dec!(10), dec!(100));
    req.idempotency_key = Some("order-42".to_string());
    executor.submit_trade(req.clone()).await.unwrap();

    req.quantity = dec!(20);
    let err = executor.submit_trade(req).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Trade(TradeError::DuplicateKeyConflict(_))
    ));
    assert_eq!(ledger.replay(ACCOUNT).unwrap().len(), 1);
}

/// Replaying the full ledger must reproduce the materialized position and
/// balance exactly (no hidden state).
#[tokio::test]
async fn replay_reproduces_materialized_state() {
    let (ledger, executor) = setup().await;

    for (side, quantity, price) in [
        (TradeSide::Buy, dec!(10), dec!(100)),
        (TradeSide::Buy, dec!(5), dec!(110)),
        (TradeSide::Sell, dec!(8), dec!(120)),
        (TradeSide::Buy, dec!(2), dec!(97.25)),
    ] {
        executor
            .submit_trade(request(side, quantity, price))
            .await
            .unwrap();
    }

    let history = ledger.replay(ACCOUNT).unwrap();
    let replayed = replay_positions(&history).unwrap();
    let materialized = ledger.get_position(ACCOUNT, "RELIANCE").unwrap().unwrap();

    assert_eq!(replayed["RELIANCE"].quantity, materialized.quantity);
    assert_eq!(replayed["RELIANCE"].average_cost, materialized.average_cost);
    assert_eq!(
        replay_balance(dec!(100000), &history),
        ledger.get_balance(ACCOUNT).unwrap().unwrap().cash
    );
}

/// N concurrent sells that would individually pass validation must not
/// jointly oversell: the final state has to be reachable by some serial
/// ordering.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_trades_serialize_per_account() {
    let (ledger, executor) = setup().await;
    let executor = Arc::new(executor);

    executor
        .submit_trade(request(TradeSide::Buy, dec!(10), dec!(100)))
        .await
        .unwrap();

    // Ten concurrent sells of 2 shares against 10 held: at most five can
    // commit, the rest must be rejected for insufficient shares.
    let mut handles = Vec::new();
    for _ in 0..10 {
        let executor = executor.clone();
        handles.push(tokio::spawn(async move {
            executor
                .submit_trade(request(TradeSide::Sell, dec!(2), dec!(150)))
                .await
        }));
    }

    let mut committed = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => committed += 1,
            Err(Error::Trade(TradeError::InsufficientShares { .. })) => rejected += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(committed, 5);
    assert_eq!(rejected, 5);

    let position = ledger.get_position(ACCOUNT, "RELIANCE").unwrap().unwrap();
    assert_eq!(position.quantity, Decimal::ZERO);

    // 100000 - 1000 + 5 * 300
    assert_eq!(ledger.get_balance(ACCOUNT).unwrap().unwrap().cash, dec!(100500));

    // And the ledger still replays to the same state.
    let history = ledger.replay(ACCOUNT).unwrap();
    assert_eq!(replay_balance(dec!(100000), &history), dec!(100500));
}

async fn seeded_accounts() -> Arc<MemoryAccountRepository> {
    let accounts = Arc::new(MemoryAccountRepository::new());
    accounts
        .create(NewAccount {
            id: Some(ACCOUNT.to_string()),
            name: "Test Account".to_string(),
            currency: "INR".to_string(),
            initial_cash: Some(dec!(100000)),
        })
        .await
        .unwrap();
    accounts
}

/// Ledger wrapper whose commit parks on a gate. Signals `entered` once the
/// committing task is inside `commit_trade` (and therefore holding the
/// executor's account lock), then waits for `release`.
struct GatedLedger {
    inner: MemoryLedgerRepository,
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl LedgerRepositoryTrait for GatedLedger {
    fn replay(&self, account_id: &str) -> crate::Result<Vec<Transaction>> {
        self.inner.replay(account_id)
    }

    fn get_transaction(&self, transaction_id: &str) -> crate::Result<Option<Transaction>> {
        self.inner.get_transaction(transaction_id)
    }

    fn get_positions(&self, account_id: &str) -> crate::Result<Vec<Position>> {
        self.inner.get_positions(account_id)
    }

    fn get_position(&self, account_id: &str, symbol: &str) -> crate::Result<Option<Position>> {
        self.inner.get_position(account_id, symbol)
    }

    fn get_balance(&self, account_id: &str) -> crate::Result<Option<Balance>> {
        self.inner.get_balance(account_id)
    }

    fn find_idempotent(&self, key: &str) -> crate::Result<Option<IdempotencyRecord>> {
        self.inner.find_idempotent(key)
    }

    async fn commit_trade(
        &self,
        transaction: NewTransaction,
        position: Position,
        balance: Balance,
        idempotency: Option<IdempotencyRecord>,
    ) -> crate::Result<Transaction> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner
            .commit_trade(transaction, position, balance, idempotency)
            .await
    }
}

/// While one trade holds the account lock through its commit, a second
/// submission must exhaust its bounded lock retries and come back as Busy
/// without touching the ledger.
#[tokio::test]
async fn contended_account_lock_reports_busy_after_bounded_retries() {
    let ledger = Arc::new(GatedLedger {
        inner: MemoryLedgerRepository::new(),
        entered: Notify::new(),
        release: Notify::new(),
    });
    let executor = Arc::new(TradeExecutor::with_config(
        ledger.clone(),
        seeded_accounts().await,
        TradingConfig {
            lock_timeout: Duration::from_millis(10),
            max_lock_retries: 2,
        },
    ));

    let holder = {
        let executor = executor.clone();
        tokio::spawn(async move {
            executor
                .submit_trade(request(TradeSide::Buy, dec!(10), dec!(100)))
                .await
        })
    };
    ledger.entered.notified().await;

    let err = executor
        .submit_trade(request(TradeSide::Buy, dec!(1), dec!(50)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Trade(TradeError::Busy(ref id)) if id == ACCOUNT));

    // Let the first trade finish; it is the only one that reached the ledger.
    ledger.release.notify_one();
    holder.await.unwrap().unwrap();
    assert_eq!(ledger.replay(ACCOUNT).unwrap().len(), 1);
    assert_eq!(ledger.get_balance(ACCOUNT).unwrap().unwrap().cash, dec!(99000));
}

/// Ledger wrapper that never reports stored idempotency records, forcing a
/// retried key past the executor's pre-check and into the commit path.
struct BlindLedger {
    inner: MemoryLedgerRepository,
}

#[async_trait]
impl LedgerRepositoryTrait for BlindLedger {
    fn replay(&self, account_id: &str) -> crate::Result<Vec<Transaction>> {
        self.inner.replay(account_id)
    }

    fn get_transaction(&self, transaction_id: &str) -> crate::Result<Option<Transaction>> {
        self.inner.get_transaction(transaction_id)
    }

    fn get_positions(&self, account_id: &str) -> crate::Result<Vec<Position>> {
        self.inner.get_positions(account_id)
    }

    fn get_position(&self, account_id: &str, symbol: &str) -> crate::Result<Option<Position>> {
        self.inner.get_position(account_id, symbol)
    }

    fn get_balance(&self, account_id: &str) -> crate::Result<Option<Balance>> {
        self.inner.get_balance(account_id)
    }

    fn find_idempotent(&self, _key: &str) -> crate::Result<Option<IdempotencyRecord>> {
        Ok(None)
    }

    async fn commit_trade(
        &self,
        transaction: NewTransaction,
        position: Position,
        balance: Balance,
        idempotency: Option<IdempotencyRecord>,
    ) -> crate::Result<Transaction> {
        self.inner
            .commit_trade(transaction, position, balance, idempotency)
            .await
    }
}

/// A key that slips past the pre-commit check (for example in a race between
/// two submissions) is still rejected by the ledger at commit time, and the
/// executor reports it as a duplicate-key conflict.
#[tokio::test]
async fn key_conflict_detected_at_commit_is_reported_as_duplicate() {
    let ledger = Arc::new(BlindLedger {
        inner: MemoryLedgerRepository::new(),
    });
    let executor = TradeExecutor::new(ledger.clone(), seeded_accounts().await);

    let mut req = request(TradeSide::Buy, dec!(10), dec!(100));
    req.idempotency_key = Some("order-42".to_string());
    executor.submit_trade(req.clone()).await.unwrap();

    let err = executor.submit_trade(req).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Trade(TradeError::DuplicateKeyConflict(ref key)) if key == "order-42"
    ));
    assert_eq!(ledger.replay(ACCOUNT).unwrap().len(), 1);
    assert_eq!(ledger.get_balance(ACCOUNT).unwrap().unwrap().cash, dec!(99000));
}
