//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::{json_body, AppError, AppState, SuccessResponse};
use pennywise_core::models::{
    Category, NewTransaction, Transaction, TransactionKind, TransactionQuery, TransactionUpdate,
    DEFAULT_LIST_LIMIT,
};
use pennywise_core::summary::{parse_date, AggregateResult, DateWindow};

/// Query parameters for listing transactions
///
/// Kept as strings so bad values produce a 400 with a readable message.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(alias = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<i64>,
}

impl ListParams {
    fn into_query(self) -> Result<TransactionQuery, AppError> {
        let kind = self
            .kind
            .as_deref()
            .map(str::parse::<TransactionKind>)
            .transpose()
            .map_err(|e| AppError::bad_request(&e))?;
        let category = self
            .category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()
            .map_err(|e| AppError::bad_request(&e))?;
        let start_date = self.start_date.as_deref().map(parse_date).transpose()?;
        let end_date = self.end_date.as_deref().map(parse_date).transpose()?;

        Ok(TransactionQuery {
            kind,
            category,
            start_date,
            end_date,
            limit: self.limit.unwrap_or(DEFAULT_LIST_LIMIT),
        })
    }
}

/// Optional inclusive window for summary and analysis
#[derive(Debug, Default, Deserialize)]
pub struct WindowParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl WindowParams {
    pub fn window(&self) -> Result<DateWindow, AppError> {
        Ok(DateWindow::parse(
            self.start_date.as_deref(),
            self.end_date.as_deref(),
        )?)
    }
}

#[derive(Serialize)]
pub struct TransactionListResponse {
    pub count: usize,
    pub data: Vec<Transaction>,
}

/// GET /api/transactions - List the caller's transactions, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ListParams>,
) -> Result<Json<TransactionListResponse>, AppError> {
    let query = params.into_query()?;
    let data = state.db.list_transactions(auth.id, &query)?;
    Ok(Json(TransactionListResponse {
        count: data.len(),
        data,
    }))
}

/// POST /api/transactions
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<NewTransaction>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let body = json_body(payload)?;
    let tx = state.db.create_transaction(auth.id, &body)?;
    Ok((StatusCode::CREATED, Json(tx)))
}

/// GET /api/transactions/:id
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Transaction>, AppError> {
    Ok(Json(state.db.get_owned_transaction(auth.id, id)?))
}

/// PUT /api/transactions/:id - Partial update, re-validated after merging
pub async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    payload: Result<Json<TransactionUpdate>, JsonRejection>,
) -> Result<Json<Transaction>, AppError> {
    let body = json_body(payload)?;
    Ok(Json(state.db.update_transaction(auth.id, id, &body)?))
}

/// DELETE /api/transactions/:id
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_transaction(auth.id, id)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/transactions/summary
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<WindowParams>,
) -> Result<Json<AggregateResult>, AppError> {
    let window = params.window()?;
    Ok(Json(state.db.compute_summary(auth.id, &window)?))
}
