use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::allocation_model::{InstrumentProfile, UNCATEGORIZED_SECTOR};
use super::allocation_service::{AllocationService, AllocationServiceTrait};
use super::memory_reference::MemoryInstrumentReference;
use crate::valuation::{AccountValuation, InstrumentValuation, ValuationServiceTrait};
use crate::Result;

fn valued(symbol: &str, current_value: Decimal) -> InstrumentValuation {
    InstrumentValuation {
        symbol: symbol.to_string(),
        quantity: dec!(1),
        average_cost: current_value,
        current_price: current_value,
        current_value,
        investment_value: current_value,
        unrealized_gain: Decimal::ZERO,
        unrealized_gain_percent: Decimal::ZERO,
        day_change: Decimal::ZERO,
        is_stale: false,
        has_quote: true,
    }
}

/// Valuation double serving a canned account read.
struct FixedValuation(AccountValuation);

#[async_trait]
impl ValuationServiceTrait for FixedValuation {
    async fn get_valuation(&self, _account_id: &str) -> Result<AccountValuation> {
        Ok(self.0.clone())
    }
}

fn account_valuation(positions: Vec<InstrumentValuation>, cash: Decimal) -> AccountValuation {
    let investment_value: Decimal = positions.iter().map(|p| p.current_value).sum();
    AccountValuation {
        account_id: "acct-1".to_string(),
        as_of: Utc::now(),
        has_stale_quotes: false,
        positions,
        cash_balance: cash,
        investment_value,
        total_portfolio_value: investment_value + cash,
        total_gain: Decimal::ZERO,
        total_gain_percent: Decimal::ZERO,
        day_gain: Decimal::ZERO,
        day_gain_percent: Decimal::ZERO,
    }
}

fn reference() -> MemoryInstrumentReference {
    MemoryInstrumentReference::with_profiles(vec![
        InstrumentProfile {
            symbol: "RELIANCE".to_string(),
            name: "Reliance Industries".to_string(),
            sector: Some("Energy".to_string()),
        },
        InstrumentProfile {
            symbol: "ONGC".to_string(),
            name: "Oil and Natural Gas Corp".to_string(),
            sector: Some("Energy".to_string()),
        },
        InstrumentProfile {
            symbol: "TCS".to_string(),
            name: "Tata Consultancy Services".to_string(),
            sector: Some("Technology".to_string()),
        },
        InstrumentProfile {
            symbol: "NOSECTOR".to_string(),
            name: "No Sector Ltd".to_string(),
            sector: None,
        },
    ])
}

#[tokio::test]
async fn groups_by_sector_sorted_descending() {
    let positions = vec![
        valued("RELIANCE", dec!(1200)),
        valued("ONGC", dec!(300)),
        valued("TCS", dec!(2500)),
    ];
    let service = AllocationService::new(
        Arc::new(FixedValuation(account_valuation(positions, dec!(1000)))),
        Arc::new(reference()),
    );

    let allocations = service.get_sector_allocation("acct-1").await.unwrap();

    assert_eq!(allocations.len(), 2);
    assert_eq!(allocations[0].sector, "Technology");
    assert_eq!(allocations[0].value, dec!(2500));
    assert_eq!(allocations[1].sector, "Energy");
    assert_eq!(allocations[1].value, dec!(1500));
    // Denominator is the whole portfolio, cash included.
    assert_eq!(allocations[0].percentage, dec!(2500) / dec!(5000) * dec!(100));
    assert_eq!(allocations[1].percentage, dec!(30));
}

#[tokio::test]
async fn unknown_instruments_fall_into_uncategorized() {
    let positions = vec![valued("MYSTERY", dec!(400)), valued("NOSECTOR", dec!(600))];
    let service = AllocationService::new(
        Arc::new(FixedValuation(account_valuation(positions, dec!(0)))),
        Arc::new(reference()),
    );

    let allocations = service.get_sector_allocation("acct-1").await.unwrap();

    assert_eq!(allocations.len(), 1);
    assert_eq!(allocations[0].sector, UNCATEGORIZED_SECTOR);
    assert_eq!(allocations[0].value, dec!(1000));
    assert_eq!(allocations[0].percentage, dec!(100));
}

#[tokio::test]
async fn zero_value_sectors_are_omitted() {
    let positions = vec![valued("RELIANCE", dec!(1000)), valued("TCS", dec!(0))];
    let service = AllocationService::new(
        Arc::new(FixedValuation(account_valuation(positions, dec!(0)))),
        Arc::new(reference()),
    );

    let allocations = service.get_sector_allocation("acct-1").await.unwrap();

    assert_eq!(allocations.len(), 1);
    assert_eq!(allocations[0].sector, "Energy");
}

#[tokio::test]
async fn cash_only_account_has_no_sectors() {
    let service = AllocationService::new(
        Arc::new(FixedValuation(account_valuation(vec![], dec!(100000)))),
        Arc::new(reference()),
    );

    let allocations = service.get_sector_allocation("acct-1").await.unwrap();
    assert!(allocations.is_empty());
}
