//! Pennywise Web Server
//!
//! Axum-based REST API for the Pennywise personal finance tracker.
//!
//! Security features:
//! - Bearer token authentication on every route that touches user data
//! - Restrictive CORS policy
//! - Input validation (list limits, date windows, transaction constraints)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use pennywise_core::ai::{AIBackend, AIClient};
use pennywise_core::db::Database;
use pennywise_core::insights::InsightGenerator;
use pennywise_core::quotes::QuoteService;

pub mod auth;
mod handlers;

/// Environment variable holding the token signing secret
pub const JWT_SECRET_ENV: &str = "PENNYWISE_JWT_SECRET";

/// Environment variable overriding the token lifetime in hours
pub const TOKEN_TTL_ENV: &str = "PENNYWISE_TOKEN_TTL_HOURS";

/// Environment variable listing allowed CORS origins (comma-separated)
pub const ALLOWED_ORIGINS_ENV: &str = "PENNYWISE_ALLOWED_ORIGINS";

/// Default token lifetime (one week)
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 168;

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// HS256 secret used to sign and verify bearer tokens
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn new(jwt_secret: &str) -> Self {
        Self {
            jwt_secret: jwt_secret.to_string(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            allowed_origins: vec![],
        }
    }

    /// Read configuration from `PENNYWISE_*` environment variables
    ///
    /// The signing secret is required.
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = std::env::var(JWT_SECRET_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("{} must be set to sign authentication tokens", JWT_SECRET_ENV)
            })?;

        let token_ttl_hours = match std::env::var(TOKEN_TTL_ENV) {
            Ok(value) => value.trim().parse::<i64>().map_err(|_| {
                anyhow::anyhow!("{} must be a whole number of hours", TOKEN_TTL_ENV)
            })?,
            Err(_) => DEFAULT_TOKEN_TTL_HOURS,
        };

        let allowed_origins = std::env::var(ALLOWED_ORIGINS_ENV)
            .map(|s| parse_origins(&s))
            .unwrap_or_default();

        Ok(Self {
            jwt_secret,
            token_ttl_hours,
            allowed_origins,
        })
    }
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    pub insights: InsightGenerator,
    pub quotes: QuoteService,
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// GET /api/health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Create the application router with the AI backend taken from the environment
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let ai = AIClient::from_env();
    if let Some(ref client) = ai {
        info!(
            "AI backend configured: {} (model: {})",
            client.host(),
            client.model()
        );
    } else {
        info!("ℹ️  AI backend not configured (set OPENAI_API_KEY to enable AI features)");
    }
    create_router_with_ai(db, static_dir, config, ai)
}

/// Create the application router with an explicit AI backend (for testing)
pub fn create_router_with_ai(
    db: Database,
    static_dir: Option<&str>,
    config: ServerConfig,
    ai: Option<AIClient>,
) -> Router {
    let state = Arc::new(AppState {
        insights: InsightGenerator::new(ai.clone()),
        quotes: QuoteService::new(db.clone(), ai),
        db,
        config: config.clone(),
    });

    let protected_routes = Router::new()
        // Auth
        .route("/auth/me", get(handlers::get_me))
        .route("/auth/logout", post(handlers::logout))
        // Transactions
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route("/transactions/summary", get(handlers::get_summary))
        .route("/transactions/analysis", get(handlers::get_analysis))
        .route(
            "/transactions/:id",
            get(handlers::get_transaction)
                .put(handlers::update_transaction)
                .delete(handlers::delete_transaction),
        )
        // Quotes
        .route("/quotes/refresh", post(handlers::refresh_quote))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/quotes/daily", get(handlers::get_daily_quote));

    let api_routes = protected_routes.merge(public_routes);

    // Build CORS layer
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods.clone())
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; connect-src 'self'; frame-ancestors 'none'"
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server with configuration read from the environment
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    serve_with_config(db, host, port, static_dir, ServerConfig::from_env()?).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if config.allowed_origins.is_empty() {
        info!("CORS limited to same-origin requests");
    } else {
        info!(origins = ?config.allowed_origins, "CORS origins allowed");
    }

    check_ai_connection().await;

    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log AI backend connection status
async fn check_ai_connection() {
    match AIClient::from_env() {
        Some(client) => {
            if client.health_check().await {
                info!(
                    "✅ AI backend connected: {} (model: {})",
                    client.host(),
                    client.model()
                );
            } else {
                warn!(
                    "⚠️  AI backend configured but not responding: {} (insights will use fallback rules)",
                    client.host()
                );
            }
        }
        None => {
            info!("ℹ️  AI backend not configured (insights will use fallback rules)");
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    fn with_status(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, msg)
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self::with_status(StatusCode::UNAUTHORIZED, msg)
    }

    pub fn forbidden(msg: &str) -> Self {
        Self::with_status(StatusCode::FORBIDDEN, msg)
    }

    pub fn not_found(msg: &str) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, msg)
    }

    pub fn conflict(msg: &str) -> Self {
        Self::with_status(StatusCode::CONFLICT, msg)
    }

    pub fn internal(msg: &str) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Unreadable or mistyped JSON bodies are client errors
    pub fn from_json_rejection(rejection: JsonRejection) -> Self {
        Self::bad_request(&rejection.body_text())
    }
}

/// Unwrap a JSON body, answering 400 when it doesn't deserialize
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(AppError::from_json_rejection)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        use pennywise_core::Error as CoreError;

        let err = err.into();
        // Client-facing core errors keep their message; the rest are sanitized
        match err.downcast_ref::<CoreError>() {
            Some(CoreError::Validation(msg)) => Self::bad_request(msg),
            Some(CoreError::NotFound(what)) => Self::not_found(&format!("{} not found", what)),
            Some(CoreError::Forbidden(_)) => {
                Self::forbidden("Not authorized to access this transaction")
            }
            Some(CoreError::Conflict(_)) => Self::conflict("User already exists"),
            Some(CoreError::Unauthorized(msg)) => Self::unauthorized(msg),
            _ => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                // Return generic message to client
                message: "An internal error occurred".to_string(),
                // Keep full error for logging
                internal: Some(err),
            },
        }
    }
}
