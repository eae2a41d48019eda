use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::allocation_model::{SectorAllocation, UNCATEGORIZED_SECTOR};
use super::allocation_traits::InstrumentReferenceTrait;
use crate::valuation::ValuationServiceTrait;
use crate::Result;

/// Contract for sector breakdown reads.
#[async_trait]
pub trait AllocationServiceTrait: Send + Sync {
    async fn get_sector_allocation(&self, account_id: &str) -> Result<Vec<SectorAllocation>>;
}

/// Groups valued positions by instrument sector.
pub struct AllocationService {
    valuation_service: Arc<dyn ValuationServiceTrait>,
    instrument_reference: Arc<dyn InstrumentReferenceTrait>,
}

impl AllocationService {
    pub fn new(
        valuation_service: Arc<dyn ValuationServiceTrait>,
        instrument_reference: Arc<dyn InstrumentReferenceTrait>,
    ) -> Self {
        Self {
            valuation_service,
            instrument_reference,
        }
    }
}

#[async_trait]
impl AllocationServiceTrait for AllocationService {
    async fn get_sector_allocation(&self, account_id: &str) -> Result<Vec<SectorAllocation>> {
        let valuation = self.valuation_service.get_valuation(account_id).await?;

        let symbols: Vec<String> = valuation
            .positions
            .iter()
            .map(|p| p.symbol.clone())
            .collect();
        let profiles = self.instrument_reference.get_profiles(&symbols).await?;

        let mut sector_values: HashMap<String, Decimal> = HashMap::new();
        for position in &valuation.positions {
            let sector = profiles
                .get(&position.symbol)
                .and_then(|p| p.sector.clone())
                .unwrap_or_else(|| UNCATEGORIZED_SECTOR.to_string());
            *sector_values.entry(sector).or_insert(Decimal::ZERO) += position.current_value;
        }

        let total = valuation.total_portfolio_value;
        let mut allocations: Vec<SectorAllocation> = sector_values
            .into_iter()
            .filter(|(_, value)| !value.is_zero())
            .map(|(sector, value)| SectorAllocation {
                sector,
                percentage: if total.is_zero() {
                    Decimal::ZERO
                } else {
                    value / total * dec!(100)
                },
                value,
            })
            .collect();

        // Descending by share, with the sector name breaking ties so the
        // ordering is stable across reads.
        allocations.sort_by(|a, b| {
            b.percentage
                .cmp(&a.percentage)
                .then_with(|| a.sector.cmp(&b.sector))
        });

        debug!(
            "Sector allocation for {}: {} sectors over total {}",
            account_id,
            allocations.len(),
            total
        );
        Ok(allocations)
    }
}
