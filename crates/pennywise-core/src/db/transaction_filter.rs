//! Transaction filter builder for constructing dynamic SQL queries
//!
//! Every query is scoped to one owner; the remaining filters are optional.

use chrono::NaiveDate;

use crate::models::{Category, TransactionKind};

/// Builder for constructing transaction query filters
pub struct TransactionFilter {
    pub user_id: i64,
    pub kind: Option<TransactionKind>,
    pub category: Option<Category>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Oldest first (for aggregation) instead of newest first (for listing)
    pub ascending: bool,
}

/// Result of building a filter - contains SQL components and parameters
pub struct FilterResult {
    /// WHERE clause including "WHERE" keyword
    pub where_clause: String,
    /// ORDER BY clause including "ORDER BY" keyword
    pub order_clause: String,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl TransactionFilter {
    /// Create a filter for one user's transactions
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            kind: None,
            category: None,
            start_date: None,
            end_date: None,
            ascending: false,
        }
    }

    pub fn kind(mut self, kind: Option<TransactionKind>) -> Self {
        self.kind = kind;
        self
    }

    pub fn category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    /// Inclusive lower bound
    pub fn start_date(mut self, date: Option<NaiveDate>) -> Self {
        self.start_date = date;
        self
    }

    /// Inclusive upper bound
    pub fn end_date(mut self, date: Option<NaiveDate>) -> Self {
        self.end_date = date;
        self
    }

    pub fn ascending(mut self, value: bool) -> Self {
        self.ascending = value;
        self
    }

    /// Build the filter components
    pub fn build(self) -> FilterResult {
        let mut conditions = vec!["t.user_id = ?".to_string()];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(self.user_id)];

        if let Some(kind) = self.kind {
            conditions.push("t.kind = ?".to_string());
            params.push(Box::new(kind.as_str()));
        }

        if let Some(category) = self.category {
            conditions.push("t.category = ?".to_string());
            params.push(Box::new(category.as_str()));
        }

        // Dates are stored as YYYY-MM-DD so string comparison orders correctly
        if let Some(start) = self.start_date {
            conditions.push("t.date >= ?".to_string());
            params.push(Box::new(start.to_string()));
        }

        if let Some(end) = self.end_date {
            conditions.push("t.date <= ?".to_string());
            params.push(Box::new(end.to_string()));
        }

        let order_clause = if self.ascending {
            "ORDER BY t.date ASC, t.id ASC".to_string()
        } else {
            "ORDER BY t.date DESC, t.id DESC".to_string()
        };

        FilterResult {
            where_clause: format!("WHERE {}", conditions.join(" AND ")),
            order_clause,
            params,
        }
    }
}

impl FilterResult {
    /// Build a COUNT query
    pub fn build_count_query(&self) -> String {
        format!("SELECT COUNT(*) FROM transactions t {}", self.where_clause)
    }

    /// Get parameter references for query execution
    pub fn params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }

    /// Take the parameter vector to append pagination params
    pub fn into_params(self) -> Vec<Box<dyn rusqlite::ToSql>> {
        self.params
    }
}
