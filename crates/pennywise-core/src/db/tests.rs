//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::DateWindow;
    use chrono::{Duration, NaiveDate, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn user(db: &Database, email: &str) -> i64 {
        db.create_user("Test User", email, "$argon2id$stub").unwrap().id
    }

    fn tx(kind: TransactionKind, category: Category, amount: f64, on: NaiveDate) -> NewTransaction {
        NewTransaction {
            kind,
            category,
            amount,
            description: format!("{} {}", category, amount),
            date: Some(on),
            notes: None,
        }
    }

    fn expense(category: Category, amount: f64, on: NaiveDate) -> NewTransaction {
        tx(TransactionKind::Expense, category, amount, on)
    }

    fn income(amount: f64, on: NaiveDate) -> NewTransaction {
        tx(TransactionKind::Income, Category::Salary, amount, on)
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        assert!(db.list_users().unwrap().is_empty());
        assert_eq!(db.count_active_quotes().unwrap(), 0);
    }

    #[test]
    fn test_schema_exists() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('transactions') WHERE name IN ('id', 'user_id', 'kind', 'category', 'amount', 'description', 'date', 'notes', 'created_at', 'updated_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(result, 10, "transactions table should have 10 expected columns");

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('quotes') WHERE name IN ('id', 'text', 'category', 'generated_at', 'expires_at', 'is_active')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(result, 6, "quotes table should have 6 expected columns");
    }

    #[test]
    fn test_user_crud() {
        let db = Database::in_memory().unwrap();
        let created = db
            .create_user("Ada", "ada@example.com", "$argon2id$stub")
            .unwrap();
        assert_eq!(created.name, "Ada");
        assert_eq!(created.auth_provider, AuthProvider::Local);

        let by_email = db.get_user_by_email("ADA@example.com").unwrap().unwrap();
        assert_eq!(by_email.id, created.id);

        let (user, hash) = db.get_user_credentials("ada@example.com").unwrap().unwrap();
        assert_eq!(user.id, created.id);
        assert_eq!(hash, "$argon2id$stub");

        assert!(db.get_user(created.id + 100).unwrap().is_none());
        assert!(matches!(
            db.create_user("Ada Again", "ada@example.com", "x"),
            Err(Error::Conflict(_))
        ));
    }

    #[test]
    fn test_transaction_crud() {
        let db = Database::in_memory().unwrap();
        let uid = user(&db, "crud@example.com");

        let created = db
            .create_transaction(
                uid,
                &NewTransaction {
                    kind: TransactionKind::Expense,
                    category: Category::Dining,
                    amount: 42.5,
                    description: "  Dinner  ".to_string(),
                    date: Some(date(2024, 3, 10)),
                    notes: Some("birthday".to_string()),
                },
            )
            .unwrap();
        assert_eq!(created.user_id, uid);
        assert_eq!(created.description, "Dinner");
        assert_eq!(created.date, date(2024, 3, 10));
        assert_eq!(created.notes.as_deref(), Some("birthday"));

        let fetched = db.get_owned_transaction(uid, created.id).unwrap();
        assert_eq!(fetched, created);

        let updated = db
            .update_transaction(
                uid,
                created.id,
                &TransactionUpdate {
                    amount: Some(50.0),
                    notes: Some(String::new()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.amount, 50.0);
        assert_eq!(updated.description, "Dinner");
        assert!(updated.notes.is_none());

        db.delete_transaction(uid, created.id).unwrap();
        assert!(db.get_transaction(created.id).unwrap().is_none());
        assert!(matches!(
            db.delete_transaction(uid, created.id),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_create_defaults_date_to_today() {
        let db = Database::in_memory().unwrap();
        let uid = user(&db, "today@example.com");
        let mut new_tx = income(10.0, date(2024, 1, 1));
        new_tx.date = None;

        let created = db.create_transaction(uid, &new_tx).unwrap();
        let today = Utc::now().date_naive();
        assert!(created.date == today || created.date == today - Duration::days(1));
    }

    #[test]
    fn test_create_rejects_invalid_transaction() {
        let db = Database::in_memory().unwrap();
        let uid = user(&db, "invalid@example.com");

        let err = db
            .create_transaction(uid, &tx(TransactionKind::Income, Category::Rent, 0.0, date(2024, 1, 1)))
            .unwrap_err();
        match err {
            Error::Validation(msg) => {
                assert!(msg.contains("Amount must be greater than 0"));
                assert!(msg.contains("Category rent is not valid for income transactions"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(
            db.count_transactions(uid, &TransactionQuery::default()).unwrap(),
            0
        );
    }

    #[test]
    fn test_update_rejects_category_kind_mismatch() {
        let db = Database::in_memory().unwrap();
        let uid = user(&db, "mismatch@example.com");
        let created = db
            .create_transaction(uid, &expense(Category::Rent, 900.0, date(2024, 2, 1)))
            .unwrap();

        let result = db.update_transaction(
            uid,
            created.id,
            &TransactionUpdate {
                kind: Some(TransactionKind::Income),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(db.get_transaction(created.id).unwrap().unwrap().kind, TransactionKind::Expense);
    }

    #[test]
    fn test_ownership_is_enforced() {
        let db = Database::in_memory().unwrap();
        let owner = user(&db, "owner@example.com");
        let intruder = user(&db, "intruder@example.com");
        let created = db
            .create_transaction(owner, &expense(Category::Groceries, 20.0, date(2024, 1, 5)))
            .unwrap();

        assert!(matches!(
            db.get_owned_transaction(intruder, created.id),
            Err(Error::Forbidden(_))
        ));
        assert!(matches!(
            db.update_transaction(intruder, created.id, &TransactionUpdate::default()),
            Err(Error::Forbidden(_))
        ));
        assert!(matches!(
            db.delete_transaction(intruder, created.id),
            Err(Error::Forbidden(_))
        ));
        assert!(matches!(
            db.get_owned_transaction(owner, created.id + 999),
            Err(Error::NotFound(_))
        ));

        assert!(db.get_transaction(created.id).unwrap().is_some());
        assert!(db
            .list_transactions(intruder, &TransactionQuery::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_list_filters_and_order() {
        let db = Database::in_memory().unwrap();
        let uid = user(&db, "list@example.com");

        db.create_transaction(uid, &income(3000.0, date(2024, 1, 1))).unwrap();
        db.create_transaction(uid, &expense(Category::Rent, 1000.0, date(2024, 1, 3))).unwrap();
        db.create_transaction(uid, &expense(Category::Groceries, 80.0, date(2024, 1, 10))).unwrap();
        db.create_transaction(uid, &expense(Category::Groceries, 40.0, date(2024, 2, 1))).unwrap();

        let all = db.list_transactions(uid, &TransactionQuery::default()).unwrap();
        let dates: Vec<_> = all.iter().map(|t| t.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 2, 1), date(2024, 1, 10), date(2024, 1, 3), date(2024, 1, 1)]
        );

        let expenses = TransactionQuery {
            kind: Some(TransactionKind::Expense),
            ..Default::default()
        };
        assert_eq!(db.list_transactions(uid, &expenses).unwrap().len(), 3);

        let groceries = TransactionQuery {
            category: Some(Category::Groceries),
            ..Default::default()
        };
        assert_eq!(db.count_transactions(uid, &groceries).unwrap(), 2);

        let january = TransactionQuery {
            start_date: Some(date(2024, 1, 3)),
            end_date: Some(date(2024, 1, 10)),
            ..Default::default()
        };
        let in_january = db.list_transactions(uid, &january).unwrap();
        assert_eq!(in_january.len(), 2, "window bounds are inclusive");

        let limited = TransactionQuery {
            limit: 1,
            ..Default::default()
        };
        let page = db.list_transactions(uid, &limited).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].date, date(2024, 2, 1));
        assert_eq!(db.count_transactions(uid, &limited).unwrap(), 4);
    }

    #[test]
    fn test_list_limit_is_clamped() {
        let db = Database::in_memory().unwrap();
        let uid = user(&db, "clamp@example.com");
        db.create_transaction(uid, &income(1.0, date(2024, 1, 1))).unwrap();
        db.create_transaction(uid, &income(2.0, date(2024, 1, 2))).unwrap();

        let zero = TransactionQuery {
            limit: 0,
            ..Default::default()
        };
        assert_eq!(db.list_transactions(uid, &zero).unwrap().len(), 1);

        assert_eq!(transactions::clamp_limit(-5), 1);
        assert_eq!(transactions::clamp_limit(50), 50);
        assert_eq!(transactions::clamp_limit(5000), MAX_LIST_LIMIT);
    }

    #[test]
    fn test_compute_summary_window_is_inclusive() {
        let db = Database::in_memory().unwrap();
        let uid = user(&db, "summary@example.com");
        let other = user(&db, "other@example.com");

        db.create_transaction(uid, &income(5000.0, date(2024, 1, 1))).unwrap();
        db.create_transaction(uid, &expense(Category::Rent, 1500.0, date(2024, 1, 31))).unwrap();
        db.create_transaction(uid, &expense(Category::Groceries, 300.0, date(2024, 2, 1))).unwrap();
        db.create_transaction(other, &income(99999.0, date(2024, 1, 15))).unwrap();

        let window = DateWindow::new(Some(date(2024, 1, 1)), Some(date(2024, 1, 31))).unwrap();
        let summary = db.compute_summary(uid, &window).unwrap();
        assert_eq!(summary.total_income, 5000.0);
        assert_eq!(summary.total_expenses, 1500.0);
        assert_eq!(summary.balance, 3500.0);
        assert_eq!(summary.savings_rate, 70.0);
        assert_eq!(summary.expenses_by_category.len(), 1);
        assert_eq!(summary.expenses_by_category[0].category, Category::Rent);

        let all_time = db.compute_summary(uid, &DateWindow::all_time()).unwrap();
        assert_eq!(all_time.total_expenses, 1800.0);
        assert_eq!(all_time.expenses_by_category[0].category, Category::Rent);
        assert_eq!(all_time.expenses_by_category[1].category, Category::Groceries);
    }

    #[test]
    fn test_compute_summary_without_transactions() {
        let db = Database::in_memory().unwrap();
        let uid = user(&db, "empty@example.com");
        let summary = db.compute_summary(uid, &DateWindow::all_time()).unwrap();
        assert_eq!(summary.total_income, 0.0);
        assert_eq!(summary.total_expenses, 0.0);
        assert_eq!(summary.balance, 0.0);
        assert_eq!(summary.savings_rate, 0.0);
        assert!(summary.expenses_by_category.is_empty());
    }

    #[test]
    fn test_recent_transaction_count_is_capped() {
        let db = Database::in_memory().unwrap();
        let uid = user(&db, "recent@example.com");
        assert_eq!(db.recent_transaction_count(uid, 20).unwrap(), 0);

        for day in 1..=25 {
            db.create_transaction(uid, &expense(Category::Dining, 5.0, date(2024, 1, day)))
                .unwrap();
        }
        assert_eq!(db.recent_transaction_count(uid, 20).unwrap(), 20);
        assert_eq!(db.recent_transaction_count(uid, 30).unwrap(), 25);
    }

    #[test]
    fn test_quote_replacement_keeps_one_active() {
        let db = Database::in_memory().unwrap();
        let now = Utc::now();
        assert!(db.get_active_quote(now).unwrap().is_none());

        let first = db
            .replace_active_quote("Spend less than you earn.", now, now + Duration::hours(24))
            .unwrap();
        assert_eq!(first.category, quotes::QUOTE_CATEGORY);
        assert_eq!(db.get_active_quote(now).unwrap().unwrap().id, first.id);

        let second = db
            .replace_active_quote("Pay yourself first.", now, now + Duration::hours(24))
            .unwrap();
        assert_eq!(db.count_active_quotes().unwrap(), 1);
        assert_eq!(db.get_active_quote(now).unwrap().unwrap().id, second.id);
        assert!(!db.get_quote(first.id).unwrap().unwrap().is_active);
    }

    #[test]
    fn test_expired_quote_is_not_served() {
        let db = Database::in_memory().unwrap();
        let generated = Utc::now() - Duration::hours(30);
        db.replace_active_quote("Old news.", generated, generated + Duration::hours(24))
            .unwrap();
        assert!(db.get_active_quote(Utc::now()).unwrap().is_none());
        assert_eq!(db.count_active_quotes().unwrap(), 1);
    }
}
