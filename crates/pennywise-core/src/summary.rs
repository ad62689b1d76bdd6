//! Transaction aggregation
//!
//! Turns a user's transactions (already narrowed to a date window by the
//! database layer) into totals, a savings rate, and a per-category expense
//! breakdown. Pure computation; callers decide which rows go in.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Category, Transaction, TransactionKind};

/// Summed expenses for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
    pub count: u32,
}

/// Totals for a user's transactions within an optional date window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub total_income: f64,
    pub total_expenses: f64,
    /// `total_income - total_expenses`
    pub balance: f64,
    /// Percentage of income kept, rounded to 2 decimals; 0 without income
    pub savings_rate: f64,
    /// Sorted by total descending
    pub expenses_by_category: Vec<CategoryTotal>,
}

impl AggregateResult {
    /// The `n` largest expense categories
    pub fn top_categories(&self, n: usize) -> &[CategoryTotal] {
        let end = n.min(self.expenses_by_category.len());
        &self.expenses_by_category[..end]
    }

    /// The single largest expense category, if any expenses exist
    pub fn top_category(&self) -> Option<&CategoryTotal> {
        self.expenses_by_category.first()
    }
}

/// Optional inclusive date bounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(Error::Validation(format!(
                    "start_date {} is after end_date {}",
                    s, e
                )));
            }
        }
        Ok(Self { start, end })
    }

    /// Build a window from raw query parameters
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let start = start.filter(|s| !s.trim().is_empty()).map(parse_date).transpose()?;
        let end = end.filter(|s| !s.trim().is_empty()).map(parse_date).transpose()?;
        Self::new(start, end)
    }

    pub fn all_time() -> Self {
        Self::default()
    }
}

/// Parse a date given as `YYYY-MM-DD` or an RFC 3339 timestamp (date part kept)
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.date_naive()))
        .map_err(|_| Error::Validation(format!("Invalid date: {}", s)))
}

/// Aggregate transactions into totals and a category breakdown
///
/// Amounts are summed in whole cents so totals don't drift. Categories with
/// equal totals keep the order in which they were first seen, so callers
/// should pass rows ordered by date then id.
pub fn compute_summary<'a, I>(transactions: I) -> AggregateResult
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut income_cents: i128 = 0;
    let mut expense_cents: i128 = 0;
    // (category, cents, count) in first-encounter order
    let mut groups: Vec<(Category, i128, u32)> = Vec::new();

    for tx in transactions {
        let cents = to_cents(tx.amount);
        match tx.kind {
            TransactionKind::Income => income_cents += cents,
            TransactionKind::Expense => {
                expense_cents += cents;
                match groups.iter_mut().find(|(c, _, _)| *c == tx.category) {
                    Some(group) => {
                        group.1 += cents;
                        group.2 += 1;
                    }
                    None => groups.push((tx.category, cents, 1)),
                }
            }
        }
    }

    groups.sort_by(|a, b| b.1.cmp(&a.1));

    let total_income = from_cents(income_cents);
    let total_expenses = from_cents(expense_cents);
    let balance = total_income - total_expenses;

    AggregateResult {
        total_income,
        total_expenses,
        balance,
        savings_rate: savings_rate(total_income, balance),
        expenses_by_category: groups
            .into_iter()
            .map(|(category, cents, count)| CategoryTotal {
                category,
                total: from_cents(cents),
                count,
            })
            .collect(),
    }
}

/// `balance / income * 100` rounded to 2 decimals, or 0 when there is no income
pub fn savings_rate(total_income: f64, balance: f64) -> f64 {
    if total_income == 0.0 {
        return 0.0;
    }
    round2(balance / total_income * 100.0)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn to_cents(amount: f64) -> i128 {
    (amount * 100.0).round() as i128
}

fn from_cents(cents: i128) -> f64 {
    cents as f64 / 100.0
}
