//! Generator configuration.
//!
//! Model identity, sampling temperature and output length are fixed for the
//! lifetime of a generator. Values come from defaults, a YAML file, or the
//! environment.

use crate::llm::client::LlmProvider;
use crate::types::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default model used when none is configured.
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Default maximum completion length (tokens).
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Default HTTP timeout for a completion call (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default location of the schema metadata document.
pub const DEFAULT_SCHEMA_PATH: &str = "data/schemas/schema_analysis.json";

/// Configuration for a `QueryGenerator`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Model identifier (e.g., "claude-3-5-sonnet-20241022", "gpt-4o").
    pub model: String,

    /// Maximum completion length in tokens.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,

    /// Timeout applied to each completion request.
    pub timeout_secs: u64,

    /// Path to the schema metadata JSON document.
    pub schema_path: PathBuf,

    /// API key for the configured provider. Never written back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            schema_path: PathBuf::from(DEFAULT_SCHEMA_PATH),
            api_key: None,
        }
    }
}

impl GeneratorConfig {
    /// Build configuration from environment variables.
    ///
    /// Recognised variables:
    /// - `SQL_RAG_MODEL`, `SQL_RAG_MAX_TOKENS`, `SQL_RAG_TEMPERATURE`,
    ///   `SQL_RAG_TIMEOUT_SECS`, `SQL_RAG_SCHEMA_PATH`
    /// - `ANTHROPIC_API_KEY` or `OPENAI_API_KEY`, picked by model provider
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::ConfigError` if a numeric variable does not parse
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Load configuration from a YAML (or JSON) file, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::IoError` if the file cannot be read and
    /// `GeneratorError::YamlError` if it is malformed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: GeneratorConfig = serde_yaml::from_str(&content)?;
        config.with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(model) = std::env::var("SQL_RAG_MODEL") {
            self.model = model;
        }
        if let Some(max_tokens) = env_parse::<u32>("SQL_RAG_MAX_TOKENS")? {
            self.max_tokens = max_tokens;
        }
        if let Some(temperature) = env_parse::<f32>("SQL_RAG_TEMPERATURE")? {
            self.temperature = temperature;
        }
        if let Some(timeout) = env_parse::<u64>("SQL_RAG_TIMEOUT_SECS")? {
            self.timeout_secs = timeout;
        }
        if let Ok(path) = std::env::var("SQL_RAG_SCHEMA_PATH") {
            self.schema_path = PathBuf::from(path);
        }
        if self.api_key.is_none() {
            self.api_key = std::env::var(self.provider().api_key_var()).ok();
        }
        Ok(self)
    }

    /// Provider implied by the model name.
    pub fn provider(&self) -> LlmProvider {
        LlmProvider::from_model(&self.model)
    }

    /// API key, or an error naming the variable that should hold it.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::ConfigError` if no key is configured
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(GeneratorError::ConfigError(format!(
                "{} environment variable not set",
                self.provider().api_key_var()
            ))),
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| GeneratorError::ConfigError(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(None),
    }
}
