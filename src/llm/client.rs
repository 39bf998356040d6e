//! Text completion clients.
//!
//! The generator talks to the model through `CompletionClient`: one prompt in,
//! one raw completion out, or an error. Every failure (transport, auth, rate
//! limit, timeout, malformed body) surfaces as `GeneratorError::LlmError`.
//! No retries are attempted here.

use crate::config::GeneratorConfig;
use crate::otel::{llm_span, record_llm_metrics};
use crate::types::{GeneratorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::{Duration, Instant};
use tracing::Instrument;

const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    Anthropic,
    OpenAI,
}

impl LlmProvider {
    /// Infer provider from a model name ("claude-*" → Anthropic, otherwise OpenAI).
    pub fn from_model(model: &str) -> Self {
        if model.starts_with("claude") || model.starts_with("anthropic") {
            Self::Anthropic
        } else {
            Self::OpenAI
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAI => "openai",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenAI => "OPENAI_API_KEY",
        }
    }
}

/// Single completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Prompt-in, text-out model boundary.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Return the raw completion text for `request`.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Provider label for logs and spans.
    fn provider_name(&self) -> &str;
}

/// OpenAI API response.
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    #[serde(default)]
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    completion_tokens: u64,
}

/// Anthropic API response.
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
    #[serde(default)]
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    output_tokens: u64,
}

/// HTTP client for the Anthropic Messages and OpenAI Chat Completions APIs.
pub struct HttpCompletionClient {
    api_key: String,
    provider: LlmProvider,
    client: Client,
}

impl HttpCompletionClient {
    /// Create a client for `provider`.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::LlmError` if the HTTP client cannot be built
    pub fn new(api_key: String, provider: LlmProvider, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeneratorError::LlmError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            provider,
            client,
        })
    }

    /// Create a client from generator configuration.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::ConfigError` if no API key is configured
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        Self::new(api_key, config.provider(), Duration::from_secs(config.timeout_secs))
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    async fn post(&self, url: &str, builder: reqwest::RequestBuilder) -> Result<String> {
        let label = self.provider.as_str();
        let response = builder
            .send()
            .await
            .map_err(|e| GeneratorError::LlmError(format!("{} API error: {}", label, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GeneratorError::LlmError(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            tracing::warn!(provider = label, url, status = %status, "Completion request rejected");
            return Err(GeneratorError::LlmError(format!(
                "{} API error {}: {}",
                label, status, body
            )));
        }

        Ok(body)
    }

    async fn call_anthropic(&self, request: &CompletionRequest) -> Result<String> {
        let builder = self
            .client
            .post(ANTHROPIC_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&json!({
                "model": request.model,
                "max_tokens": request.max_tokens,
                "temperature": request.temperature,
                "messages": [
                    {"role": "user", "content": request.prompt}
                ]
            }));

        let body = self.post(ANTHROPIC_URL, builder).await?;
        let parsed: AnthropicResponse = serde_json::from_str(&body).map_err(|e| {
            GeneratorError::LlmError(format!("Failed to parse anthropic response: {}", e))
        })?;

        if let Some(usage) = &parsed.usage {
            record_llm_metrics(Some(usage.output_tokens));
        }

        parsed
            .content
            .into_iter()
            .find_map(|c| c.text)
            .ok_or_else(|| GeneratorError::LlmError("No response from anthropic".to_string()))
    }

    async fn call_openai(&self, request: &CompletionRequest) -> Result<String> {
        let builder = self
            .client
            .post(OPENAI_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&json!({
                "model": request.model,
                "max_tokens": request.max_tokens,
                "temperature": request.temperature,
                "messages": [
                    {"role": "user", "content": request.prompt}
                ]
            }));

        let body = self.post(OPENAI_URL, builder).await?;
        let parsed: OpenAIResponse = serde_json::from_str(&body).map_err(|e| {
            GeneratorError::LlmError(format!("Failed to parse openai response: {}", e))
        })?;

        if let Some(usage) = &parsed.usage {
            record_llm_metrics(Some(usage.completion_tokens));
        }

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| GeneratorError::LlmError("No response from openai".to_string()))
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let span = llm_span(
            self.provider.as_str(),
            &request.model,
            request.temperature,
            request.max_tokens,
        );

        async {
            let started = Instant::now();
            let result = match self.provider {
                LlmProvider::Anthropic => self.call_anthropic(request).await,
                LlmProvider::OpenAI => self.call_openai(request).await,
            };
            tracing::debug!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                ok = result.is_ok(),
                "Completion finished"
            );
            result
        }
        .instrument(span)
        .await
    }

    fn provider_name(&self) -> &str {
        self.provider.as_str()
    }
}
