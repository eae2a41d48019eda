use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use super::model::AccountDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::accounts;
use stockfolio_core::accounts::{Account, AccountError, AccountRepositoryTrait, NewAccount};
use stockfolio_core::errors::{DatabaseError, Error, Result};

/// Account persistence over SQLite.
pub struct SqliteAccountRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SqliteAccountRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AccountRepositoryTrait for SqliteAccountRepository {
    async fn create(&self, new_account: NewAccount) -> Result<Account> {
        let account_db: AccountDB = new_account.into();
        let created = self
            .writer
            .exec(move |conn| {
                diesel::insert_into(accounts::table)
                    .values(&account_db)
                    .execute(conn)
                    .into_core()?;
                Ok(account_db)
            })
            .await
            .map_err(|e| match e {
                Error::Database(DatabaseError::UniqueViolation(_)) => {
                    Error::Account(AccountError::AlreadyExists("account id taken".to_string()))
                }
                other => other,
            })?;
        created.into_domain()
    }

    fn get(&self, account_id: &str) -> Result<Option<Account>> {
        let mut conn = get_connection(&self.pool)?;
        accounts::table
            .find(account_id)
            .select(AccountDB::as_select())
            .first::<AccountDB>(&mut conn)
            .optional()
            .into_core()?
            .map(AccountDB::into_domain)
            .transpose()
    }

    fn list_active(&self) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)?;
        accounts::table
            .filter(accounts::is_active.eq(true))
            .order(accounts::id.asc())
            .select(AccountDB::as_select())
            .load::<AccountDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(AccountDB::into_domain)
            .collect()
    }
}
