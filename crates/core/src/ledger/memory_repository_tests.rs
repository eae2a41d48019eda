use chrono::Utc;
use rust_decimal_macros::dec;

use super::ledger_errors::LedgerError;
use super::ledger_model::{Balance, IdempotencyRecord, NewTransaction, TradeSide};
use super::ledger_traits::LedgerRepositoryTrait;
use super::memory_repository::MemoryLedgerRepository;
use crate::positions::Position;
use crate::Error;

fn position(account_id: &str, symbol: &str, quantity: rust_decimal::Decimal) -> Position {
    Position {
        account_id: account_id.to_string(),
        symbol: symbol.to_string(),
        quantity,
        average_cost: dec!(100),
        updated_at: Utc::now(),
    }
}

fn balance(account_id: &str, cash: rust_decimal::Decimal) -> Balance {
    Balance {
        account_id: account_id.to_string(),
        cash,
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn commit_assigns_increasing_sequence_numbers() {
    let repo = MemoryLedgerRepository::new();

    for i in 1..=3 {
        let txn = NewTransaction::new("acct-1", "TCS", TradeSide::Buy, dec!(1), dec!(100));
        let committed = repo
            .commit_trade(
                txn,
                position("acct-1", "TCS", rust_decimal::Decimal::from(i)),
                balance("acct-1", dec!(100000) - dec!(100) * rust_decimal::Decimal::from(i)),
                None,
            )
            .await
            .unwrap();
        assert_eq!(committed.sequence_number, i);
    }
}

#[tokio::test]
async fn committed_trade_is_immediately_visible_to_replay() {
    let repo = MemoryLedgerRepository::new();
    let txn = NewTransaction::new("acct-1", "TCS", TradeSide::Buy, dec!(2), dec!(50));
    let id = txn.id.clone();

    repo.commit_trade(
        txn,
        position("acct-1", "TCS", dec!(2)),
        balance("acct-1", dec!(99900)),
        None,
    )
    .await
    .unwrap();

    let replayed = repo.replay("acct-1").unwrap();
    assert_eq!(replayed.len(), 1);
    assert_eq!(replayed[0].id, id);
    assert_eq!(repo.get_transaction(&id).unwrap().unwrap().id, id);
}

#[tokio::test]
async fn replay_orders_by_timestamp_then_sequence() {
    let repo = MemoryLedgerRepository::new();
    let shared_ts = Utc::now();

    // Same timestamp on purpose: the sequence number must break the tie.
    for qty in [dec!(1), dec!(2), dec!(3)] {
        let mut txn = NewTransaction::new("acct-1", "INFY", TradeSide::Buy, qty, dec!(10));
        txn.timestamp = shared_ts;
        repo.commit_trade(
            txn,
            position("acct-1", "INFY", qty),
            balance("acct-1", dec!(99000)),
            None,
        )
        .await
        .unwrap();
    }

    let replayed = repo.replay("acct-1").unwrap();
    let sequences: Vec<i64> = replayed.iter().map(|t| t.sequence_number).collect();
    assert_eq!(sequences, vec![1, 2, 3]);
    let quantities: Vec<_> = replayed.iter().map(|t| t.quantity).collect();
    assert_eq!(quantities, vec![dec!(1), dec!(2), dec!(3)]);
}

#[tokio::test]
async fn commit_rejects_non_positive_quantity_or_price() {
    let repo = MemoryLedgerRepository::new();

    let zero_qty = NewTransaction::new("acct-1", "TCS", TradeSide::Buy, dec!(0), dec!(100));
    assert!(repo
        .commit_trade(
            zero_qty,
            position("acct-1", "TCS", dec!(0)),
            balance("acct-1", dec!(100000)),
            None,
        )
        .await
        .is_err());

    let negative_price =
        NewTransaction::new("acct-1", "TCS", TradeSide::Sell, dec!(1), dec!(-5));
    assert!(repo
        .commit_trade(
            negative_price,
            position("acct-1", "TCS", dec!(1)),
            balance("acct-1", dec!(100000)),
            None,
        )
        .await
        .is_err());

    assert!(repo.replay("acct-1").unwrap().is_empty());
}

#[tokio::test]
async fn commit_rejects_an_already_committed_idempotency_key() {
    let repo = MemoryLedgerRepository::new();
    let record = |txn: &NewTransaction| IdempotencyRecord {
        key: "client-key-7".to_string(),
        account_id: txn.account_id.clone(),
        fingerprint: "fp-first".to_string(),
        transaction_id: txn.id.clone(),
        result: "{}".to_string(),
        created_at: Utc::now(),
    };

    let first = NewTransaction::new("acct-1", "TCS", TradeSide::Buy, dec!(1), dec!(100));
    let first_id = first.id.clone();
    let first_record = record(&first);
    repo.commit_trade(
        first,
        position("acct-1", "TCS", dec!(1)),
        balance("acct-1", dec!(99900)),
        Some(first_record),
    )
    .await
    .unwrap();

    let second = NewTransaction::new("acct-2", "TCS", TradeSide::Buy, dec!(1), dec!(100));
    let second_record = record(&second);
    let err = repo
        .commit_trade(
            second,
            position("acct-2", "TCS", dec!(1)),
            balance("acct-2", dec!(99900)),
            Some(second_record),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Ledger(LedgerError::DuplicateIdempotencyKey(ref key)) if key == "client-key-7"
    ));

    // The rejected commit must not have touched any account state, and the
    // stored record still points at the first transaction.
    assert!(repo.replay("acct-2").unwrap().is_empty());
    let stored = repo.find_idempotent("client-key-7").unwrap().unwrap();
    assert_eq!(stored.transaction_id, first_id);
}

#[tokio::test]
async fn zero_quantity_positions_are_not_listed_but_remain_loadable() {
    let repo = MemoryLedgerRepository::new();
    let txn = NewTransaction::new("acct-1", "TCS", TradeSide::Sell, dec!(1), dec!(100));

    repo.commit_trade(
        txn,
        position("acct-1", "TCS", dec!(0)),
        balance("acct-1", dec!(100100)),
        None,
    )
    .await
    .unwrap();

    assert!(repo.get_positions("acct-1").unwrap().is_empty());
    let stored = repo.get_position("acct-1", "TCS").unwrap().unwrap();
    assert_eq!(stored.quantity, dec!(0));
    assert_eq!(stored.average_cost, dec!(100));
}
