//! Daily quote command implementation

use anyhow::Result;
use pennywise_core::ai::AIClient;
use pennywise_core::db::Database;
use pennywise_core::quotes::QuoteService;

pub async fn cmd_quote(db: &Database, ai: Option<AIClient>, refresh: bool) -> Result<()> {
    let service = QuoteService::new(db.clone(), ai);
    let quote = if refresh {
        service.refresh().await?
    } else {
        service.daily_quote().await?
    };

    println!();
    println!("💬 \"{}\"", quote.text);
    println!(
        "   Valid until {}",
        quote.expires_at.format("%Y-%m-%d %H:%M UTC")
    );

    Ok(())
}
