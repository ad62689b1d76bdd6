//! AI backend request and response types
//!
//! These types are backend-agnostic and used across all AI implementations.

use serde::{Deserialize, Serialize};

use crate::summary::{AggregateResult, CategoryTotal};

/// Number of expense categories sent to the completion service
pub const SNAPSHOT_TOP_CATEGORIES: usize = 5;

/// The numbers a backend sees when asked to analyze a user's finances
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSnapshot {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub savings_rate: f64,
    /// Largest expense categories first
    pub top_expense_categories: Vec<CategoryTotal>,
    /// Recent transactions the analysis is based on
    pub transaction_count: usize,
}

impl FinancialSnapshot {
    pub fn from_aggregate(aggregate: &AggregateResult, transaction_count: usize) -> Self {
        Self {
            total_income: aggregate.total_income,
            total_expenses: aggregate.total_expenses,
            balance: aggregate.balance,
            savings_rate: aggregate.savings_rate,
            top_expense_categories: aggregate
                .top_categories(SNAPSHOT_TOP_CATEGORIES)
                .to_vec(),
            transaction_count,
        }
    }

    /// One line per category, e.g. `- groceries: $1200.00 (3 transactions)`
    pub fn category_lines(&self) -> String {
        self.top_expense_categories
            .iter()
            .map(|c| format!("- {}: ${:.2} ({} transactions)", c.category, c.total, c.count))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Structured analysis returned by a completion service
///
/// All three keys are required in a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIAnalysis {
    pub analysis: String,
    pub recommendations: Vec<String>,
    pub insights: Vec<String>,
}
