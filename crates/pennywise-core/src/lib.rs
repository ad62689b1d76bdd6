//! Pennywise Core Library
//!
//! Shared functionality for the Pennywise personal finance tracker:
//! - Database access and migrations
//! - Transaction validation and aggregation
//! - AI-generated insights with a rule-based fallback
//! - Daily financial quote cache
//! - Password hashing and credential checks
//! - Prompt library for customizable AI prompts

pub mod ai;
pub mod auth;
pub mod db;
pub mod error;
pub mod insights;
pub mod models;
pub mod prompts;
pub mod quotes;
pub mod summary;

/// Test utilities including a mock chat-completions server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    AIAnalysis, AIBackend, AIClient, FinancialSnapshot, MockBackend, OpenAICompatibleBackend,
};
pub use db::Database;
pub use error::{Error, Result};
pub use insights::{
    AnalysisReport, FinancialSummary, InsightGenerator, InsightResult, InsightSource,
    RECENT_TRANSACTION_LIMIT,
};
pub use models::{
    AuthProvider, Category, NewTransaction, NewUser, Quote, Transaction, TransactionKind,
    TransactionQuery, TransactionUpdate, User,
};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use quotes::QuoteService;
pub use summary::{AggregateResult, CategoryTotal, DateWindow};
