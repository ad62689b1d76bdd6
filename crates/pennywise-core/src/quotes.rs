//! Daily financial quote
//!
//! One quote is active at a time and expires 24 hours after it was generated.
//! Reads regenerate lazily once the active quote has expired.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use tracing::{info, warn};

use crate::ai::{AIBackend, AIClient};
use crate::db::Database;
use crate::error::Result;
use crate::models::Quote;

/// Hours a generated quote stays active
pub const QUOTE_TTL_HOURS: i64 = 24;

/// Quotes used when no completion service is available
pub const FALLBACK_QUOTES: [&str; 7] = [
    "Every dollar saved today is a step toward financial freedom tomorrow.",
    "A budget is telling your money where to go instead of wondering where it went.",
    "Wealth is not about having a lot of money; it's about having a lot of options.",
    "The habit of saving is itself an education; it fosters every virtue, teaches self-denial.",
    "Don't save what is left after spending; spend what is left after saving.",
    "Financial freedom is available to those who learn about it and work for it.",
    "The best time to plant a tree was 20 years ago. The second best time is now. Same goes for saving.",
];

/// Fallback quote for a calendar day (same day, same quote)
pub fn fallback_quote(date: NaiveDate) -> &'static str {
    FALLBACK_QUOTES[date.ordinal0() as usize % FALLBACK_QUOTES.len()]
}

/// Serves the active quote and regenerates it when stale
#[derive(Clone)]
pub struct QuoteService {
    db: Database,
    ai: Option<AIClient>,
}

impl QuoteService {
    pub fn new(db: Database, ai: Option<AIClient>) -> Self {
        Self { db, ai }
    }

    /// The active quote, generating a new one if none is fresh
    pub async fn daily_quote(&self) -> Result<Quote> {
        self.daily_quote_at(Utc::now()).await
    }

    pub async fn daily_quote_at(&self, now: DateTime<Utc>) -> Result<Quote> {
        if let Some(quote) = self.db.get_active_quote(now)?.filter(|q| q.is_fresh(now)) {
            return Ok(quote);
        }
        self.refresh_at(now).await
    }

    /// Replace the active quote unconditionally
    pub async fn refresh(&self) -> Result<Quote> {
        self.refresh_at(Utc::now()).await
    }

    pub async fn refresh_at(&self, now: DateTime<Utc>) -> Result<Quote> {
        let text = self.generate_text(now).await;
        let quote =
            self.db
                .replace_active_quote(&text, now, now + Duration::hours(QUOTE_TTL_HOURS))?;
        info!(quote_id = quote.id, "Stored new daily quote");
        Ok(quote)
    }

    async fn generate_text(&self, now: DateTime<Utc>) -> String {
        if let Some(ref client) = self.ai {
            match client.generate_quote().await {
                Ok(text) => return text,
                Err(e) => {
                    warn!(error = %e, host = %client.host(), "Quote generation failed, using fallback")
                }
            }
        }
        fallback_quote(now.date_naive()).to_string()
    }
}
