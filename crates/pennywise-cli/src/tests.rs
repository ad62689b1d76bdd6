//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use pennywise_core::ai::AIClient;
use pennywise_core::db::Database;
use pennywise_core::insights::{InsightGenerator, InsightSource};
use pennywise_core::models::{Category, TransactionKind, TransactionQuery};

use crate::commands::{self, truncate};

const EMAIL: &str = "casey@example.com";

fn setup_test_db() -> Database {
    let db = Database::in_memory().unwrap();
    commands::cmd_users_add(&db, "Casey", EMAIL, "secret123").unwrap();
    db
}

fn user_id(db: &Database) -> i64 {
    db.get_user_by_email(EMAIL).unwrap().unwrap().id
}

fn seed_transactions(db: &Database) {
    commands::cmd_transactions_add(db, EMAIL, "income", "salary", 3000.0, "Paycheck", Some("2024-01-01"), None)
        .unwrap();
    commands::cmd_transactions_add(db, EMAIL, "expense", "groceries", 1200.0, "Groceries", Some("2024-01-05"), None)
        .unwrap();
    commands::cmd_transactions_add(db, EMAIL, "expense", "rent", 800.0, "Rent", Some("2024-01-02"), Some("January".to_string()))
        .unwrap();
}

// ========== User Command Tests ==========

#[test]
fn test_cmd_users_add_and_list() {
    let db = setup_test_db();
    let users = db.list_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "Casey");

    assert!(commands::cmd_users_list(&db).is_ok());
}

#[test]
fn test_cmd_users_add_duplicate_fails() {
    let db = setup_test_db();
    let result = commands::cmd_users_add(&db, "Casey Again", "CASEY@example.com", "secret123");
    assert!(result.is_err());
    assert_eq!(db.list_users().unwrap().len(), 1);
}

#[test]
fn test_cmd_users_add_rejects_short_password() {
    let db = Database::in_memory().unwrap();
    let result = commands::cmd_users_add(&db, "Short", "short@example.com", "123");
    let err = result.unwrap_err().to_string();
    assert!(err.contains("Password must be at least 6 characters"));
}

#[test]
fn test_cmd_users_list_empty() {
    let db = Database::in_memory().unwrap();
    assert!(commands::cmd_users_list(&db).is_ok());
}

// ========== Transaction Command Tests ==========

#[test]
fn test_cmd_transactions_add() {
    let db = setup_test_db();
    seed_transactions(&db);

    let uid = user_id(&db);
    let all = db.list_transactions(uid, &TransactionQuery::default()).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].category, Category::Groceries);
    assert_eq!(all[0].kind, TransactionKind::Expense);
    assert_eq!(all[1].notes.as_deref(), Some("January"));
}

#[test]
fn test_cmd_transactions_add_rejects_bad_input() {
    let db = setup_test_db();

    assert!(commands::cmd_transactions_add(&db, EMAIL, "transfer", "salary", 1.0, "x", None, None).is_err());
    assert!(commands::cmd_transactions_add(&db, EMAIL, "income", "fuel", 1.0, "x", None, None).is_err());
    assert!(commands::cmd_transactions_add(&db, EMAIL, "income", "rent", 1.0, "x", None, None).is_err());
    assert!(commands::cmd_transactions_add(&db, EMAIL, "income", "salary", 1.0, "x", Some("01/02/2024"), None).is_err());
    assert!(commands::cmd_transactions_add(&db, "nobody@example.com", "income", "salary", 1.0, "x", None, None).is_err());

    let uid = user_id(&db);
    assert_eq!(db.count_transactions(uid, &TransactionQuery::default()).unwrap(), 0);
}

#[test]
fn test_cmd_transactions_list() {
    let db = setup_test_db();
    assert!(commands::cmd_transactions_list(&db, EMAIL, 20).is_ok());

    seed_transactions(&db);
    assert!(commands::cmd_transactions_list(&db, EMAIL, 2).is_ok());
}

#[test]
fn test_cmd_transactions_list_unknown_user() {
    let db = setup_test_db();
    let err = commands::cmd_transactions_list(&db, "ghost@example.com", 20).unwrap_err();
    assert!(err.to_string().contains("No user with email ghost@example.com"));
}

// ========== Report Command Tests ==========

#[test]
fn test_cmd_summary() {
    let db = setup_test_db();
    seed_transactions(&db);

    assert!(commands::cmd_summary(&db, EMAIL, None, None).is_ok());
    assert!(commands::cmd_summary(&db, EMAIL, Some("2024-01-01"), Some("2024-01-31")).is_ok());
}

#[test]
fn test_cmd_summary_empty() {
    let db = setup_test_db();
    assert!(commands::cmd_summary(&db, EMAIL, None, None).is_ok());
}

#[test]
fn test_cmd_summary_invalid_range() {
    let db = setup_test_db();
    assert!(commands::cmd_summary(&db, EMAIL, Some("2024-02-01"), Some("2024-01-01")).is_err());
    assert!(commands::cmd_summary(&db, EMAIL, Some("last week"), None).is_err());
}

#[tokio::test]
async fn test_cmd_insights_with_mock_backend() {
    let db = setup_test_db();
    seed_transactions(&db);

    let generator = InsightGenerator::new(Some(AIClient::mock()));
    let result = commands::cmd_insights(&db, &generator, EMAIL, None, None, false).await;
    assert!(result.is_ok());

    let result = commands::cmd_insights(&db, &generator, EMAIL, None, None, true).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cmd_insights_without_backend() {
    let db = setup_test_db();
    let generator = InsightGenerator::default();

    // No history: onboarding
    assert!(commands::cmd_insights(&db, &generator, EMAIL, None, None, false)
        .await
        .is_ok());

    seed_transactions(&db);
    assert!(commands::cmd_insights(&db, &generator, EMAIL, Some("2024-01-01"), None, false)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_insight_generator_factory() {
    let db = setup_test_db();
    seed_transactions(&db);
    let uid = user_id(&db);
    let summary = db
        .compute_summary(uid, &pennywise_core::summary::DateWindow::default())
        .unwrap();

    let with_ai = commands::insight_generator(Some(AIClient::mock()));
    let report = with_ai.generate_report(&summary, 3).await;
    assert_eq!(report.result.source, InsightSource::Ai);

    let without_ai = commands::insight_generator(None);
    let report = without_ai.generate_report(&summary, 3).await;
    assert_eq!(report.result.source, InsightSource::Fallback);

    assert!(commands::cmd_insights(&db, &without_ai, EMAIL, None, None, true)
        .await
        .is_ok());
}

// ========== Quote Command Tests ==========

#[tokio::test]
async fn test_cmd_quote() {
    let db = Database::in_memory().unwrap();

    assert!(commands::cmd_quote(&db, Some(AIClient::mock()), false).await.is_ok());
    let first = db.get_active_quote(chrono::Utc::now()).unwrap().unwrap();

    assert!(commands::cmd_quote(&db, Some(AIClient::mock()), false).await.is_ok());
    let same = db.get_active_quote(chrono::Utc::now()).unwrap().unwrap();
    assert_eq!(first.id, same.id);

    assert!(commands::cmd_quote(&db, None, true).await.is_ok());
    let refreshed = db.get_active_quote(chrono::Utc::now()).unwrap().unwrap();
    assert_ne!(first.id, refreshed.id);
    assert_eq!(db.count_active_quotes().unwrap(), 1);
}

// ========== Prompt Command Tests ==========

#[test]
fn test_cmd_prompts_list() {
    assert!(commands::cmd_prompts_list().is_ok());
}

#[test]
fn test_cmd_prompts_show() {
    assert!(commands::cmd_prompts_show("analyze_finances").is_ok());
    assert!(commands::cmd_prompts_show("daily_quote").is_ok());
    assert!(commands::cmd_prompts_show("classify_merchant").is_err());
}

// ========== Helper Function Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a long string that exceeds", 10), "a long ..."); // 7 chars + "..."
    assert_eq!(truncate("exact", 5), "exact");
    assert_eq!(truncate("toolong", 6), "too...");
    assert_eq!(truncate("café au lait", 7), "café...");
}

#[test]
fn test_cmd_init() {
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test.db");

    let result = commands::cmd_init(&db_path, true);
    assert!(result.is_ok());

    // Verify database was created with the schema
    assert!(db_path.exists());
    let db = Database::new_unencrypted(db_path.to_str().unwrap()).unwrap();
    assert!(db.list_users().unwrap().is_empty());
}

#[test]
fn test_open_db_then_resolve_user() {
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let db_path = dir.path().join("resolve.db");
    let db = commands::open_db(&db_path, true).unwrap();
    commands::cmd_users_add(&db, "Robin", "robin@example.com", "secret123").unwrap();

    let user = commands::resolve_user(&db, " Robin@Example.com").unwrap();
    assert_eq!(user.name, "Robin");
    assert!(commands::resolve_user(&db, "other@example.com").is_err());
}
