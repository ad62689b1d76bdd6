//! Report command implementations

use anyhow::{Context, Result};
use pennywise_core::ai::{AIBackend, AIClient};
use pennywise_core::db::Database;
use pennywise_core::insights::{InsightGenerator, RECENT_TRANSACTION_LIMIT};
use pennywise_core::summary::DateWindow;
use tracing::debug;

use super::resolve_user;

fn describe_window(window: &DateWindow) -> String {
    match (window.start, window.end) {
        (None, None) => "all time".to_string(),
        (Some(s), None) => format!("{} onward", s),
        (None, Some(e)) => format!("through {}", e),
        (Some(s), Some(e)) => format!("{} to {}", s, e),
    }
}

/// Build an insight generator from `AI_BACKEND` / `OPENAI_*`
pub fn insight_generator_from_env() -> InsightGenerator {
    insight_generator(AIClient::from_env())
}

/// Wrap a backend in a generator and note the choice on stderr
pub fn insight_generator(ai: Option<AIClient>) -> InsightGenerator {
    match ai {
        Some(ref client) => eprintln!("   🤖 AI backend: {} ({})", client.host(), client.model()),
        None => eprintln!("   💡 Tip: Set OPENAI_API_KEY for AI-written insights"),
    }
    InsightGenerator::new(ai)
}

pub fn cmd_summary(db: &Database, email: &str, from: Option<&str>, to: Option<&str>) -> Result<()> {
    let user = resolve_user(db, email)?;
    let window = DateWindow::parse(from, to).context("Invalid date range")?;
    let summary = db.compute_summary(user.id, &window)?;

    println!();
    println!("📊 Financial Summary for {}", user.email);
    println!("   Period: {}", describe_window(&window));
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Income:        ${:>12.2}", summary.total_income);
    println!("   Expenses:      ${:>12.2}", summary.total_expenses);
    println!("   Balance:       ${:>12.2}", summary.balance);
    println!("   Savings rate:  {:>12.2}%", summary.savings_rate);

    if summary.expenses_by_category.is_empty() {
        println!();
        println!("   No expenses in this period.");
        return Ok(());
    }

    println!();
    println!("   Spending by category:");
    for cat in &summary.expenses_by_category {
        let pct = if summary.total_expenses > 0.0 {
            cat.total / summary.total_expenses * 100.0
        } else {
            0.0
        };
        println!(
            "   {:<16} ${:>10.2}  {:>5.1}%  ({} transactions)",
            cat.category.as_str(),
            cat.total,
            pct,
            cat.count
        );
    }

    Ok(())
}

pub async fn cmd_insights(
    db: &Database,
    generator: &InsightGenerator,
    email: &str,
    from: Option<&str>,
    to: Option<&str>,
    json: bool,
) -> Result<()> {
    let user = resolve_user(db, email)?;
    let window = DateWindow::parse(from, to).context("Invalid date range")?;
    let summary = db.compute_summary(user.id, &window)?;
    let recent = db.recent_transaction_count(user.id, RECENT_TRANSACTION_LIMIT)?;

    let report = generator.generate_report(&summary, recent).await;
    debug!(
        "Insights for user {} from {} ({} recent transactions)",
        user.id, report.result.source, recent
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!("💡 Financial Insights for {} ({})", user.email, report.result.source);
    println!("   Period: {}", describe_window(&window));
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {}", report.result.analysis);

    if !report.result.recommendations.is_empty() {
        println!();
        println!("   Recommendations:");
        for rec in &report.result.recommendations {
            println!("   • {}", rec);
        }
    }

    if !report.result.insights.is_empty() {
        println!();
        println!("   Insights:");
        for insight in &report.result.insights {
            println!("   • {}", insight);
        }
    }

    Ok(())
}
