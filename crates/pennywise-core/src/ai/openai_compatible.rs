//! OpenAI-compatible backend implementation
//!
//! Works with the hosted OpenAI API and any server that implements the
//! `/v1/chat/completions` endpoint (vLLM, LocalAI, llama-server, ...).
//!
//! # Configuration
//!
//! Environment variables:
//! - `OPENAI_API_KEY`: Bearer key (required unless `OPENAI_BASE_URL` is set)
//! - `OPENAI_BASE_URL`: Server URL (default: https://api.openai.com)
//! - `OPENAI_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `AI_TIMEOUT_SECS`: Per-request timeout (default: 30)

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::prompts::{PromptId, PromptLibrary};

use super::parsing::{parse_analysis, parse_quote};
use super::types::{AIAnalysis, FinancialSnapshot};
use super::AIBackend;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// OpenAI-compatible backend
///
/// # Example
///
/// ```rust,ignore
/// // Hosted OpenAI
/// export OPENAI_API_KEY="sk-..."
///
/// // Local vLLM
/// export OPENAI_BASE_URL="http://192.168.1.100:8000"
/// export OPENAI_MODEL="meta-llama/Llama-3.2-3B-Instruct"
/// ```
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl OpenAICompatibleBackend {
    /// Create a new OpenAI-compatible backend
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
        }
    }

    /// Create with an API key
    pub fn with_api_key(base_url: &str, model: &str, api_key: &str) -> Self {
        let mut backend = Self::new(base_url, model);
        backend.api_key = Some(api_key.to_string());
        backend
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a specific prompt library (e.g. embedded-only in tests)
    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = Arc::new(RwLock::new(prompts));
        self
    }

    /// Create from environment variables
    ///
    /// Returns None when neither `OPENAI_API_KEY` nor `OPENAI_BASE_URL` is
    /// set, since requests to the hosted API would fail without a key.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let base_url = std::env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|u| !u.trim().is_empty());

        if api_key.is_none() && base_url.is_none() {
            return None;
        }

        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let timeout_secs = std::env::var("AI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|&s| s > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let mut backend = Self::new(base_url.as_deref().unwrap_or(DEFAULT_BASE_URL), &model)
            .with_timeout(Duration::from_secs(timeout_secs));
        backend.api_key = api_key;
        Some(backend)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Render a prompt into chat messages plus its sampling settings
    fn render_prompt(
        &self,
        id: PromptId,
        vars: &HashMap<&str, &str>,
    ) -> Result<(Vec<ChatMessage>, Option<f32>, Option<u32>)> {
        let mut prompts = self
            .prompts
            .write()
            .map_err(|_| Error::InvalidData("Failed to acquire prompt library lock".into()))?;
        let template = prompts.get(id)?;

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = template.system_section() {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: template.render_user(vars),
        });

        Ok((
            messages,
            template.metadata.temperature,
            template.metadata.max_tokens,
        ))
    }

    /// Make a chat completion request
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature,
            max_tokens,
            stream: false,
        };

        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .timeout(self.timeout)
            .json(&request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "OpenAI API error {}: {}",
                status, body
            )));
        }

        let chat_response: ChatCompletionResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::Upstream("No response from OpenAI API".into()))
    }
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

/// Chat message
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl AIBackend for OpenAICompatibleBackend {
    async fn analyze_finances(&self, snapshot: &FinancialSnapshot) -> Result<AIAnalysis> {
        let total_income = format!("{:.2}", snapshot.total_income);
        let total_expenses = format!("{:.2}", snapshot.total_expenses);
        let balance = format!("{:.2}", snapshot.balance);
        let savings_rate = format!("{:.2}", snapshot.savings_rate);
        let transaction_count = snapshot.transaction_count.to_string();
        let top_categories = snapshot.category_lines();

        let (messages, temperature, max_tokens) = {
            let mut vars = HashMap::new();
            vars.insert("total_income", total_income.as_str());
            vars.insert("total_expenses", total_expenses.as_str());
            vars.insert("balance", balance.as_str());
            vars.insert("savings_rate", savings_rate.as_str());
            vars.insert("transaction_count", transaction_count.as_str());
            vars.insert("top_categories", top_categories.as_str());
            self.render_prompt(PromptId::AnalyzeFinances, &vars)?
        };

        let response = self
            .chat_completion(messages, temperature, max_tokens)
            .await?;
        debug!("OpenAI-compatible analysis response: {}", response);

        parse_analysis(&response)
    }

    async fn generate_quote(&self) -> Result<String> {
        let (messages, temperature, max_tokens) =
            self.render_prompt(PromptId::DailyQuote, &HashMap::new())?;

        let response = self
            .chat_completion(messages, temperature, max_tokens)
            .await?;
        debug!("OpenAI-compatible quote response: {}", response);

        parse_quote(&response)
    }

    async fn health_check(&self) -> bool {
        let mut req_builder = self
            .http_client
            .get(format!("{}/v1/models", self.base_url))
            .timeout(self.timeout);
        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        match req_builder.send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
