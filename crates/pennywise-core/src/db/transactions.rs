//! Transaction operations

use chrono::{NaiveDate, Utc};
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::transaction_filter::TransactionFilter;
use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{
    NewTransaction, Transaction, TransactionQuery, TransactionUpdate, MAX_LIST_LIMIT,
};
use crate::summary::{compute_summary, AggregateResult, DateWindow};

const TRANSACTION_COLUMNS: &str = "t.id, t.user_id, t.kind, t.category, t.amount, t.description, \
     t.date, t.notes, t.created_at, t.updated_at";

impl Database {
    /// Validate and record a transaction for a user
    ///
    /// The date defaults to today (UTC) when not given.
    pub fn create_transaction(&self, user_id: i64, tx: &NewTransaction) -> Result<Transaction> {
        let tx = tx.clone().validated()?;
        let conn = self.conn()?;
        let date = tx.date.unwrap_or_else(|| Utc::now().date_naive());

        conn.execute(
            r#"
            INSERT INTO transactions (user_id, kind, category, amount, description, date, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                tx.kind.as_str(),
                tx.category.as_str(),
                tx.amount,
                tx.description,
                date.to_string(),
                tx.notes,
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        debug!(user_id, id, "Created transaction");
        self.get_transaction(id)?
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))
    }

    /// Get a transaction by ID regardless of owner
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions t WHERE t.id = ?",
            TRANSACTION_COLUMNS
        ))?;

        let transaction = stmt
            .query_row(params![id], |row| Self::row_to_transaction(row))
            .optional()?;

        Ok(transaction)
    }

    /// Get a transaction that must belong to `user_id`
    ///
    /// Absent rows are `NotFound`; rows owned by someone else are `Forbidden`.
    pub fn get_owned_transaction(&self, user_id: i64, id: i64) -> Result<Transaction> {
        let tx = self
            .get_transaction(id)?
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))?;

        if tx.user_id != user_id {
            return Err(Error::Forbidden(format!(
                "transaction {} belongs to another user",
                id
            )));
        }
        Ok(tx)
    }

    /// List a user's transactions, newest first
    ///
    /// The limit is clamped to `[1, MAX_LIST_LIMIT]`.
    pub fn list_transactions(&self, user_id: i64, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let limit = clamp_limit(query.limit);

        let filter = TransactionFilter::new(user_id)
            .kind(query.kind)
            .category(query.category)
            .start_date(query.start_date)
            .end_date(query.end_date)
            .build();

        let sql = format!(
            "SELECT {} FROM transactions t {} {} LIMIT ?",
            TRANSACTION_COLUMNS, filter.where_clause, filter.order_clause
        );

        let mut params = filter.into_params();
        params.push(Box::new(limit));
        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let transactions = stmt
            .query_map(params_refs.as_slice(), |row| Self::row_to_transaction(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Count a user's transactions matching the filters (ignores the limit)
    pub fn count_transactions(&self, user_id: i64, query: &TransactionQuery) -> Result<i64> {
        let conn = self.conn()?;
        let filter = TransactionFilter::new(user_id)
            .kind(query.kind)
            .category(query.category)
            .start_date(query.start_date)
            .end_date(query.end_date)
            .build();

        let count = conn.query_row(
            &filter.build_count_query(),
            filter.params_refs().as_slice(),
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Apply a partial update to a transaction owned by `user_id`
    pub fn update_transaction(
        &self,
        user_id: i64,
        id: i64,
        update: &TransactionUpdate,
    ) -> Result<Transaction> {
        let existing = self.get_owned_transaction(user_id, id)?;
        let merged = update.apply_to(&existing)?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE transactions
            SET kind = ?, category = ?, amount = ?, description = ?, date = ?, notes = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ? AND user_id = ?
            "#,
            params![
                merged.kind.as_str(),
                merged.category.as_str(),
                merged.amount,
                merged.description,
                merged.date.to_string(),
                merged.notes,
                id,
                user_id,
            ],
        )?;
        drop(conn);

        debug!(user_id, id, "Updated transaction");
        self.get_transaction(id)?
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))
    }

    /// Delete a transaction owned by `user_id`
    pub fn delete_transaction(&self, user_id: i64, id: i64) -> Result<()> {
        self.get_owned_transaction(user_id, id)?;

        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM transactions WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;

        debug!(user_id, id, "Deleted transaction");
        Ok(())
    }

    /// All of a user's transactions within a window, oldest first
    pub fn transactions_in_window(&self, user_id: i64, window: &DateWindow) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let filter = TransactionFilter::new(user_id)
            .start_date(window.start)
            .end_date(window.end)
            .ascending(true)
            .build();

        let sql = format!(
            "SELECT {} FROM transactions t {} {}",
            TRANSACTION_COLUMNS, filter.where_clause, filter.order_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let transactions = stmt
            .query_map(filter.params_refs().as_slice(), |row| {
                Self::row_to_transaction(row)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Aggregate a user's transactions within an optional inclusive window
    pub fn compute_summary(&self, user_id: i64, window: &DateWindow) -> Result<AggregateResult> {
        let transactions = self.transactions_in_window(user_id, window)?;
        Ok(compute_summary(&transactions))
    }

    /// Number of the user's newest transactions, capped at `limit`
    ///
    /// Independent of any date window; zero means the user has no history.
    pub fn recent_transaction_count(&self, user_id: i64, limit: usize) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            r#"
            SELECT COUNT(*) FROM (
                SELECT id FROM transactions WHERE user_id = ?
                ORDER BY date DESC, id DESC LIMIT ?
            )
            "#,
            params![user_id, limit as i64],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as usize)
    }

    pub(crate) fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let kind_str: String = row.get(2)?;
        let category_str: String = row.get(3)?;
        let date_str: String = row.get(6)?;
        let created_at_str: String = row.get(8)?;
        let updated_at_str: String = row.get(9)?;

        Ok(Transaction {
            id: row.get(0)?,
            user_id: row.get(1)?,
            kind: kind_str.parse().map_err(|e: String| invalid_column(2, e))?,
            category: category_str.parse().map_err(|e: String| invalid_column(3, e))?,
            amount: row.get(4)?,
            description: row.get(5)?,
            date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                .map_err(|e| invalid_column(6, e.to_string()))?,
            notes: row.get(7)?,
            created_at: parse_datetime(&created_at_str),
            updated_at: parse_datetime(&updated_at_str),
        })
    }
}

/// Clamp a requested page size to `[1, MAX_LIST_LIMIT]`
pub fn clamp_limit(limit: i64) -> i64 {
    limit.clamp(1, MAX_LIST_LIMIT)
}

fn invalid_column(index: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        index,
        rusqlite::types::Type::Text,
        Box::new(Error::InvalidData(message)),
    )
}
