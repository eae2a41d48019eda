use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::accounts_errors::AccountError;
use super::accounts_model::{Account, NewAccount};
use super::accounts_traits::AccountRepositoryTrait;
use crate::Result;

/// In-memory account store. Swappable with the durable SQLite
/// implementation behind the same trait.
#[derive(Default)]
pub struct MemoryAccountRepository {
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepositoryTrait for MemoryAccountRepository {
    async fn create(&self, new_account: NewAccount) -> Result<Account> {
        if new_account.name.trim().is_empty() {
            return Err(AccountError::InvalidData("account name is empty".to_string()).into());
        }
        let initial_cash = new_account.initial_cash_or_default();
        if initial_cash.is_sign_negative() {
            return Err(
                AccountError::InvalidData("initial cash cannot be negative".to_string()).into(),
            );
        }

        let account = Account {
            id: new_account
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: new_account.name,
            currency: new_account.currency,
            initial_cash,
            is_active: true,
            created_at: Utc::now(),
        };

        let mut accounts = self
            .accounts
            .write()
            .map_err(|e| crate::Error::Unexpected(e.to_string()))?;
        if accounts.contains_key(&account.id) {
            return Err(AccountError::AlreadyExists(account.id).into());
        }
        accounts.insert(account.id.clone(), account.clone());
        Ok(account)
    }

    fn get(&self, account_id: &str) -> Result<Option<Account>> {
        let accounts = self
            .accounts
            .read()
            .map_err(|e| crate::Error::Unexpected(e.to_string()))?;
        Ok(accounts.get(account_id).cloned())
    }

    fn list_active(&self) -> Result<Vec<Account>> {
        let accounts = self
            .accounts
            .read()
            .map_err(|e| crate::Error::Unexpected(e.to_string()))?;
        let mut active: Vec<Account> = accounts
            .values()
            .filter(|a| a.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(active)
    }
}
