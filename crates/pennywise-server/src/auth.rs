//! Bearer token authentication
//!
//! Tokens are stateless HS256 JWTs carrying the user id. Logging out is a
//! client-side discard.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::AppState;

/// Token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// The caller resolved by [`auth_middleware`], available as a request extension
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
}

/// Sign a token for a user
pub fn issue_token(
    secret: &str,
    user_id: i64,
    email: &str,
    ttl_hours: i64,
) -> jsonwebtoken::errors::Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Check signature and expiry
pub fn verify_token(secret: &str, token: &str) -> jsonwebtoken::errors::Result<Claims> {
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

/// Authentication middleware - resolves the bearer token to a user
///
/// The token's user must still exist; deleted users are rejected even with an
/// unexpired token.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());

    let Some(token) = token else {
        warn!(path = %path, "Unauthorized request - no bearer token");
        return unauthorized("Authentication required");
    };

    let claims = match verify_token(&state.config.jwt_secret, &token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!(path = %path, error = %e, "Unauthorized request - invalid token");
            return unauthorized("Invalid or expired token");
        }
    };

    match state.db.get_user(claims.sub) {
        Ok(Some(user)) => {
            debug!(user_id = user.id, path = %path, "Authenticated via bearer token");
            request.extensions_mut().insert(AuthUser {
                id: user.id,
                email: user.email,
            });
            next.run(request).await
        }
        Ok(None) => {
            warn!(user_id = claims.sub, path = %path, "Token for unknown user");
            unauthorized("Invalid or expired token")
        }
        Err(e) => crate::AppError::from(e).into_response(),
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}
