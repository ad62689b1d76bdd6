//! Domain models for Pennywise

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum description length (characters)
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Maximum notes length (characters)
pub const MAX_NOTES_LEN: usize = 500;

/// Smallest accepted transaction amount
pub const MIN_AMOUNT: f64 = 0.01;

/// Largest accepted transaction amount
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transaction category
///
/// The first six variants are income categories, the rest are expense
/// categories. A transaction's category must match its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    // Income
    Salary,
    Freelance,
    Business,
    Investment,
    Gift,
    OtherIncome,
    // Expense
    Groceries,
    Rent,
    Utilities,
    Transportation,
    Healthcare,
    Entertainment,
    Dining,
    Shopping,
    Education,
    Insurance,
    DebtPayment,
    Savings,
    OtherExpense,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Salary => "salary",
            Self::Freelance => "freelance",
            Self::Business => "business",
            Self::Investment => "investment",
            Self::Gift => "gift",
            Self::OtherIncome => "other_income",
            Self::Groceries => "groceries",
            Self::Rent => "rent",
            Self::Utilities => "utilities",
            Self::Transportation => "transportation",
            Self::Healthcare => "healthcare",
            Self::Entertainment => "entertainment",
            Self::Dining => "dining",
            Self::Shopping => "shopping",
            Self::Education => "education",
            Self::Insurance => "insurance",
            Self::DebtPayment => "debt_payment",
            Self::Savings => "savings",
            Self::OtherExpense => "other_expense",
        }
    }

    /// The kind of transaction this category belongs to
    pub fn kind(&self) -> TransactionKind {
        match self {
            Self::Salary
            | Self::Freelance
            | Self::Business
            | Self::Investment
            | Self::Gift
            | Self::OtherIncome => TransactionKind::Income,
            _ => TransactionKind::Expense,
        }
    }

    /// All categories valid for the given kind
    pub fn for_kind(kind: TransactionKind) -> Vec<Category> {
        Self::all()
            .iter()
            .copied()
            .filter(|c| c.kind() == kind)
            .collect()
    }

    pub fn all() -> &'static [Category] {
        &[
            Self::Salary,
            Self::Freelance,
            Self::Business,
            Self::Investment,
            Self::Gift,
            Self::OtherIncome,
            Self::Groceries,
            Self::Rent,
            Self::Utilities,
            Self::Transportation,
            Self::Healthcare,
            Self::Entertainment,
            Self::Dining,
            Self::Shopping,
            Self::Education,
            Self::Insurance,
            Self::DebtPayment,
            Self::Savings,
            Self::OtherExpense,
        ]
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded income or expense event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    pub kind: TransactionKind,
    pub category: Category,
    /// Always positive; the kind carries the direction
    pub amount: f64,
    pub description: String,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A new transaction to be recorded (before DB insertion)
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    #[serde(alias = "type")]
    pub kind: TransactionKind,
    pub category: Category,
    pub amount: f64,
    pub description: String,
    /// Defaults to today when omitted
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewTransaction {
    /// Trim text fields and check every constraint
    ///
    /// All violations are reported together, joined with ", ".
    pub fn validated(mut self) -> Result<Self> {
        self.description = self.description.trim().to_string();
        self.notes = normalize_notes(self.notes);
        validate_fields(
            self.kind,
            self.category,
            self.amount,
            &self.description,
            self.notes.as_deref(),
        )?;
        Ok(self)
    }
}

/// Partial update for an existing transaction
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionUpdate {
    #[serde(default, alias = "type")]
    pub kind: Option<TransactionKind>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// An empty string clears the notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl TransactionUpdate {
    /// Merge the update onto an existing transaction and re-validate the result
    pub fn apply_to(&self, existing: &Transaction) -> Result<Transaction> {
        let mut tx = existing.clone();
        if let Some(kind) = self.kind {
            tx.kind = kind;
        }
        if let Some(category) = self.category {
            tx.category = category;
        }
        if let Some(amount) = self.amount {
            tx.amount = amount;
        }
        if let Some(ref description) = self.description {
            tx.description = description.trim().to_string();
        }
        if let Some(date) = self.date {
            tx.date = date;
        }
        if self.notes.is_some() {
            tx.notes = normalize_notes(self.notes.clone());
        }

        validate_fields(
            tx.kind,
            tx.category,
            tx.amount,
            &tx.description,
            tx.notes.as_deref(),
        )?;
        Ok(tx)
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.category.is_none()
            && self.amount.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.notes.is_none()
    }
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

fn validate_fields(
    kind: TransactionKind,
    category: Category,
    amount: f64,
    description: &str,
    notes: Option<&str>,
) -> Result<()> {
    let mut violations = Vec::new();

    if !amount.is_finite() || amount < MIN_AMOUNT {
        violations.push("Amount must be greater than 0".to_string());
    } else if amount > MAX_AMOUNT {
        violations.push(format!("Amount cannot exceed {:.0}", MAX_AMOUNT));
    }

    if category.kind() != kind {
        violations.push(format!(
            "Category {} is not valid for {} transactions",
            category, kind
        ));
    }

    if description.is_empty() {
        violations.push("Description is required".to_string());
    } else if description.chars().count() > MAX_DESCRIPTION_LEN {
        violations.push(format!(
            "Description cannot exceed {} characters",
            MAX_DESCRIPTION_LEN
        ));
    }

    if notes.is_some_and(|n| n.chars().count() > MAX_NOTES_LEN) {
        violations.push(format!("Notes cannot exceed {} characters", MAX_NOTES_LEN));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(violations.join(", ")))
    }
}

/// Default page size when listing transactions
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Largest page a caller may request
pub const MAX_LIST_LIMIT: i64 = 1000;

/// Filters for listing transactions
#[derive(Debug, Clone)]
pub struct TransactionQuery {
    pub kind: Option<TransactionKind>,
    pub category: Option<Category>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Clamped to `[1, MAX_LIST_LIMIT]` when the query runs
    pub limit: i64,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            kind: None,
            category: None,
            start_date: None,
            end_date: None,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

/// How a user signed up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    #[default]
    Local,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
        }
    }
}

impl std::str::FromStr for AuthProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown auth provider: {}", s)),
        }
    }
}

/// A registered user (never carries the password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub auth_provider: AuthProvider,
    pub created_at: DateTime<Utc>,
}

/// Registration request
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Minimum password length at registration
pub const MIN_PASSWORD_LEN: usize = 6;

impl NewUser {
    /// Trim the name, lower-case the email, and check every constraint
    pub fn validated(mut self) -> Result<Self> {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();

        let mut violations = Vec::new();
        if self.name.is_empty() {
            violations.push("Name is required".to_string());
        }
        if !crate::auth::is_valid_email(&self.email) {
            violations.push("Please provide a valid email".to_string());
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            violations.push(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            ));
        }

        if violations.is_empty() {
            Ok(self)
        } else {
            Err(Error::Validation(violations.join(", ")))
        }
    }
}

/// A cached daily quote with an explicit expiry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: i64,
    pub text: String,
    pub category: String,
    pub generated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Quote {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at > now
    }
}
