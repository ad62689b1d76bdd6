//! Daily quote handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{AppError, AppState};
use pennywise_core::models::Quote;

#[derive(Serialize)]
pub struct QuoteResponse {
    pub text: String,
    pub generated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<Quote> for QuoteResponse {
    fn from(quote: Quote) -> Self {
        Self {
            text: quote.text,
            generated_at: quote.generated_at,
            expires_at: quote.expires_at,
        }
    }
}

/// GET /api/quotes/daily (public)
pub async fn get_daily_quote(
    State(state): State<Arc<AppState>>,
) -> Result<Json<QuoteResponse>, AppError> {
    Ok(Json(state.quotes.daily_quote().await?.into()))
}

/// POST /api/quotes/refresh
pub async fn refresh_quote(
    State(state): State<Arc<AppState>>,
) -> Result<Json<QuoteResponse>, AppError> {
    Ok(Json(state.quotes.refresh().await?.into()))
}
