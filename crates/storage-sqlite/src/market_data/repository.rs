use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use super::model::QuoteDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::quotes;
use stockfolio_core::market_data::{Quote, QuoteRepositoryTrait};
use stockfolio_core::Result;

/// Durable latest-quote cache over SQLite. One row per symbol, replaced on
/// every successful provider fetch.
pub struct SqliteQuoteRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SqliteQuoteRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl QuoteRepositoryTrait for SqliteQuoteRepository {
    fn get_latest(&self, symbol: &str) -> Result<Option<Quote>> {
        let mut conn = get_connection(&self.pool)?;
        quotes::table
            .find(symbol)
            .select(QuoteDB::as_select())
            .first::<QuoteDB>(&mut conn)
            .optional()
            .into_core()?
            .map(QuoteDB::into_domain)
            .transpose()
    }

    async fn save(&self, quote: &Quote) -> Result<()> {
        let row = QuoteDB::from(quote);
        self.writer
            .exec(move |conn| {
                diesel::replace_into(quotes::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }
}
