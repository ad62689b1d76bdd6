//! AI analysis handler

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};

use super::transactions::WindowParams;
use crate::auth::AuthUser;
use crate::{AppError, AppState};
use pennywise_core::insights::{AnalysisReport, RECENT_TRANSACTION_LIMIT};

/// GET /api/transactions/analysis
///
/// Never fails because of the completion service; those failures produce the
/// rule-based result instead.
pub async fn get_analysis(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<WindowParams>,
) -> Result<Json<AnalysisReport>, AppError> {
    let window = params.window()?;
    let aggregate = state.db.compute_summary(auth.id, &window)?;
    let recent = state
        .db
        .recent_transaction_count(auth.id, RECENT_TRANSACTION_LIMIT)?;

    let report = state.insights.generate_report(&aggregate, recent).await;
    tracing::info!(
        user_id = auth.id,
        source = %report.result.source,
        "Generated financial analysis"
    );
    Ok(Json(report))
}
