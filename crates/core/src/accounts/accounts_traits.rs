use async_trait::async_trait;

use super::accounts_model::{Account, NewAccount};
use crate::Result;

/// Contract for account repository operations.
#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    async fn create(&self, new_account: NewAccount) -> Result<Account>;
    fn get(&self, account_id: &str) -> Result<Option<Account>>;
    fn list_active(&self) -> Result<Vec<Account>>;
}
