use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;

use super::allocation_model::InstrumentProfile;
use super::allocation_traits::InstrumentReferenceTrait;
use crate::Result;

/// In-memory instrument catalog, loaded up front.
#[derive(Default)]
pub struct MemoryInstrumentReference {
    profiles: DashMap<String, InstrumentProfile>,
}

impl MemoryInstrumentReference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: Vec<InstrumentProfile>) -> Self {
        let reference = Self::default();
        for profile in profiles {
            reference.insert(profile);
        }
        reference
    }

    pub fn insert(&self, profile: InstrumentProfile) {
        self.profiles.insert(profile.symbol.clone(), profile);
    }
}

#[async_trait]
impl InstrumentReferenceTrait for MemoryInstrumentReference {
    async fn get_profile(&self, symbol: &str) -> Result<Option<InstrumentProfile>> {
        Ok(self.profiles.get(symbol).map(|p| p.value().clone()))
    }

    async fn get_profiles(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<String, InstrumentProfile>> {
        Ok(symbols
            .iter()
            .filter_map(|s| self.profiles.get(s).map(|p| (s.clone(), p.value().clone())))
            .collect())
    }
}
