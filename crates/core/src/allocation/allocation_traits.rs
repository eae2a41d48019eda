use std::collections::HashMap;

use async_trait::async_trait;

use super::allocation_model::InstrumentProfile;
use crate::Result;

/// External instrument catalog: symbol -> name and sector.
#[async_trait]
pub trait InstrumentReferenceTrait: Send + Sync {
    async fn get_profile(&self, symbol: &str) -> Result<Option<InstrumentProfile>>;
    async fn get_profiles(&self, symbols: &[String])
        -> Result<HashMap<String, InstrumentProfile>>;
}
