//! Database model for the latest-quote cache.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::{format_decimal, format_timestamp, parse_decimal, parse_timestamp};
use stockfolio_core::market_data::Quote;
use stockfolio_core::Result;

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Serialize,
    Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::quotes)]
#[diesel(primary_key(symbol))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuoteDB {
    pub symbol: String,
    pub current_price: String,
    pub previous_close: String,
    pub as_of: String,
}

impl QuoteDB {
    pub fn into_domain(self) -> Result<Quote> {
        Ok(Quote {
            symbol: self.symbol,
            current_price: parse_decimal(&self.current_price)?,
            previous_close: parse_decimal(&self.previous_close)?,
            as_of: parse_timestamp(&self.as_of)?,
        })
    }
}

impl From<&Quote> for QuoteDB {
    fn from(quote: &Quote) -> Self {
        Self {
            symbol: quote.symbol.clone(),
            current_price: format_decimal(&quote.current_price),
            previous_close: format_decimal(&quote.previous_close),
            as_of: format_timestamp(&quote.as_of),
        }
    }
}
