//! Database model for accounts.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::{format_decimal, format_timestamp, parse_decimal, parse_timestamp};
use stockfolio_core::accounts::{Account, NewAccount};
use stockfolio_core::Result;

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Serialize,
    Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub id: String,
    pub name: String,
    pub currency: String,
    pub initial_cash: String,
    pub is_active: bool,
    pub created_at: String,
}

impl AccountDB {
    pub fn into_domain(self) -> Result<Account> {
        Ok(Account {
            id: self.id,
            name: self.name,
            currency: self.currency,
            initial_cash: parse_decimal(&self.initial_cash)?,
            is_active: self.is_active,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

impl From<&Account> for AccountDB {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            name: account.name.clone(),
            currency: account.currency.clone(),
            initial_cash: format_decimal(&account.initial_cash),
            is_active: account.is_active,
            created_at: format_timestamp(&account.created_at),
        }
    }
}

impl From<NewAccount> for AccountDB {
    fn from(domain: NewAccount) -> Self {
        let initial_cash = domain.initial_cash_or_default();
        Self {
            id: domain
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: domain.name,
            currency: domain.currency,
            initial_cash: format_decimal(&initial_cash),
            is_active: true,
            created_at: format_timestamp(&chrono::Utc::now()),
        }
    }
}
