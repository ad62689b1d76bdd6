//! Transaction command implementations

use anyhow::{anyhow, Result};
use pennywise_core::db::Database;
use pennywise_core::models::{Category, NewTransaction, TransactionKind, TransactionQuery};
use pennywise_core::summary::parse_date;

use super::{resolve_user, truncate};

pub fn cmd_transactions_list(db: &Database, email: &str, limit: i64) -> Result<()> {
    let user = resolve_user(db, email)?;
    let query = TransactionQuery {
        limit,
        ..Default::default()
    };
    let transactions = db.list_transactions(user.id, &query)?;

    if transactions.is_empty() {
        println!("No transactions found. Record one with:");
        println!(
            "  pennywise transactions add --user {} --kind expense --category groceries --amount 42.50 --description \"Weekly shop\"",
            user.email
        );
        return Ok(());
    }

    let total = db.count_transactions(user.id, &TransactionQuery::default())?;

    println!();
    println!(
        "📝 Recent Transactions for {} ({} of {})",
        user.email,
        transactions.len(),
        total
    );
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        let amount_str = match tx.kind {
            TransactionKind::Expense => format!("\x1b[31m-${:.2}\x1b[0m", tx.amount), // Red for expenses
            TransactionKind::Income => format!("\x1b[32m+${:.2}\x1b[0m", tx.amount), // Green for income
        };

        println!(
            "   [{}] {} │ {:>12} │ {:<14} │ {}",
            tx.id,
            tx.date,
            amount_str,
            tx.category,
            truncate(&tx.description, 40)
        );
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_transactions_add(
    db: &Database,
    email: &str,
    kind: &str,
    category: &str,
    amount: f64,
    description: &str,
    date: Option<&str>,
    notes: Option<String>,
) -> Result<()> {
    let user = resolve_user(db, email)?;

    let kind: TransactionKind = kind.parse().map_err(|e: String| anyhow!(e))?;
    let category: Category = category.parse().map_err(|e: String| {
        let valid: Vec<&str> = Category::for_kind(kind).iter().map(|c| c.as_str()).collect();
        anyhow!("{} (valid for {}: {})", e, kind, valid.join(", "))
    })?;
    let date = date.map(parse_date).transpose()?;

    let tx = db.create_transaction(
        user.id,
        &NewTransaction {
            kind,
            category,
            amount,
            description: description.to_string(),
            date,
            notes,
        },
    )?;

    println!(
        "✅ Recorded {} {} of ${:.2} on {} (id {})",
        tx.category, tx.kind, tx.amount, tx.date, tx.id
    );
    Ok(())
}
