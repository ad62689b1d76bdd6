//! Pluggable AI backend abstraction
//!
//! This module provides a backend-agnostic interface for the two completion
//! tasks Pennywise uses: narrative financial analysis and the daily quote.
//! Callers treat every backend as unreliable and fall back to rule-based
//! output on any error.
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all AI operations
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (openai, mock). Default: openai
//! - `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `OPENAI_MODEL`, `AI_TIMEOUT_SECS`:
//!   see [`OpenAICompatibleBackend::from_env`]

mod mock;
mod openai_compatible;
pub mod parsing;
pub mod types;

pub use mock::{MockBackend, MOCK_QUOTE};
pub use openai_compatible::OpenAICompatibleBackend;
pub use types::*;

use async_trait::async_trait;

use crate::error::Result;

/// Trait defining the interface for all AI backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Produce a narrative analysis with recommendations and insights
    async fn analyze_finances(&self, snapshot: &FinancialSnapshot) -> Result<AIAnalysis>;

    /// Produce a short motivational finance quote
    async fn generate_quote(&self) -> Result<String>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// OpenAI chat-completions API or a compatible server
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use:
    /// - `openai` (default): see [`OpenAICompatibleBackend::from_env`]
    /// - `mock`: Creates a mock backend for testing
    ///
    /// Returns None if the selected backend is not configured.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "openai".to_string());

        match backend.to_lowercase().as_str() {
            "openai" | "openai_compatible" => {
                OpenAICompatibleBackend::from_env().map(AIClient::OpenAICompatible)
            }
            "mock" => Some(AIClient::Mock(MockBackend::new())),
            "none" | "off" => None,
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to openai");
                OpenAICompatibleBackend::from_env().map(AIClient::OpenAICompatible)
            }
        }
    }

    /// Create an OpenAI-compatible backend directly
    pub fn openai(base_url: &str, model: &str, api_key: Option<&str>) -> Self {
        let backend = match api_key {
            Some(key) => OpenAICompatibleBackend::with_api_key(base_url, model, key),
            None => OpenAICompatibleBackend::new(base_url, model),
        };
        AIClient::OpenAICompatible(backend)
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Create a mock backend whose calls always fail
    pub fn failing_mock() -> Self {
        AIClient::Mock(MockBackend::failing())
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn analyze_finances(&self, snapshot: &FinancialSnapshot) -> Result<AIAnalysis> {
        match self {
            AIClient::OpenAICompatible(b) => b.analyze_finances(snapshot).await,
            AIClient::Mock(b) => b.analyze_finances(snapshot).await,
        }
    }

    async fn generate_quote(&self) -> Result<String> {
        match self {
            AIClient::OpenAICompatible(b) => b.generate_quote().await,
            AIClient::Mock(b) => b.generate_quote().await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}
