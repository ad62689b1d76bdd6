//! Daily quote cache

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::{format_datetime, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::Quote;

/// Category stored with every generated quote
pub const QUOTE_CATEGORY: &str = "financial_wisdom";

const QUOTE_COLUMNS: &str = "id, text, category, generated_at, expires_at, is_active";

impl Database {
    /// Newest active quote that has not expired as of `now`
    pub fn get_active_quote(&self, now: DateTime<Utc>) -> Result<Option<Quote>> {
        let conn = self.conn()?;
        let quote = conn
            .query_row(
                &format!(
                    "SELECT {} FROM quotes WHERE is_active = 1 AND expires_at > ?
                     ORDER BY generated_at DESC, id DESC LIMIT 1",
                    QUOTE_COLUMNS
                ),
                params![format_datetime(now)],
                |row| Self::row_to_quote(row),
            )
            .optional()?;
        Ok(quote)
    }

    /// Deactivate every active quote and store `text` as the new active one
    pub fn replace_active_quote(
        &self,
        text: &str,
        generated_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<Quote> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute("UPDATE quotes SET is_active = 0 WHERE is_active = 1", [])?;
        tx.execute(
            "INSERT INTO quotes (text, category, generated_at, expires_at, is_active)
             VALUES (?, ?, ?, ?, 1)",
            params![
                text,
                QUOTE_CATEGORY,
                format_datetime(generated_at),
                format_datetime(expires_at),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        drop(conn);

        self.get_quote(id)?
            .ok_or_else(|| Error::NotFound(format!("Quote {}", id)))
    }

    /// Get a quote by ID
    pub fn get_quote(&self, id: i64) -> Result<Option<Quote>> {
        let conn = self.conn()?;
        let quote = conn
            .query_row(
                &format!("SELECT {} FROM quotes WHERE id = ?", QUOTE_COLUMNS),
                params![id],
                |row| Self::row_to_quote(row),
            )
            .optional()?;
        Ok(quote)
    }

    /// Count quotes currently flagged active (expired or not)
    pub fn count_active_quotes(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM quotes WHERE is_active = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn row_to_quote(row: &rusqlite::Row) -> rusqlite::Result<Quote> {
        let generated_at_str: String = row.get(3)?;
        let expires_at_str: String = row.get(4)?;
        let is_active: i64 = row.get(5)?;
        Ok(Quote {
            id: row.get(0)?,
            text: row.get(1)?,
            category: row.get(2)?,
            generated_at: parse_datetime(&generated_at_str),
            expires_at: parse_datetime(&expires_at_str),
            is_active: is_active != 0,
        })
    }
}
