//! Registration, login, and current-user handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{issue_token, AuthUser};
use crate::{json_body, AppError, AppState, SuccessResponse};
use pennywise_core::auth::{authenticate, register_user};
use pennywise_core::models::{NewUser, User};

/// Token plus the user it was issued for
#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn token_response(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let token = issue_token(
        &state.config.jwt_secret,
        user.id,
        &user.email,
        state.config.token_ttl_hours,
    )?;
    Ok(AuthResponse { token, user })
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let body = json_body(payload)?;
    let user = register_user(&state.db, body)?;
    Ok((StatusCode::CREATED, Json(token_response(&state, user)?)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let body = json_body(payload)?;
    let user = authenticate(&state.db, &body.email, &body.password)?;
    info!(user_id = user.id, "User logged in");
    Ok(Json(token_response(&state, user)?))
}

/// GET /api/auth/me
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<User>, AppError> {
    let user = state
        .db
        .get_user(auth.id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(user))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; the client discards its copy.
pub async fn logout(Extension(auth): Extension<AuthUser>) -> Json<SuccessResponse> {
    info!(user_id = auth.id, "User logged out");
    Json(SuccessResponse { success: true })
}
