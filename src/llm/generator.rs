//! Question-to-SQL generation pipeline.

use crate::config::GeneratorConfig;
use crate::llm::client::{CompletionClient, CompletionRequest, HttpCompletionClient};
use crate::llm::context::build_context;
use crate::llm::dialect::Dialect;
use crate::llm::parser::{parse_response, Confidence, ParsedResponse};
use crate::llm::prompt::build_prompt;
use crate::llm::selector::select_tables;
use crate::llm::validate::looks_like_sql;
use crate::otel::{generation_span, record_generation_outcome};
use crate::schema::{DomainProfile, SchemaCatalog};
use crate::types::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Error message for blank questions.
pub const EMPTY_QUESTION: &str = "Question must not be empty";

/// Successful generation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuery {
    /// SQL text, or the extraction sentinel
    pub sql_query: String,

    pub explanation: String,

    pub confidence: Confidence,

    /// Whether `sql_query` starts like a SQL statement
    pub looks_like_sql: bool,
}

/// Outcome of a generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerationOutcome {
    Generated(GeneratedQuery),
    Failed { error: String },
}

/// Uniform result record returned by `QueryGenerator::generate`.
///
/// Serialises as
/// `{"success": true, "sql_query", "explanation", "confidence", "looks_like_sql", "relevant_tables", "dialect"}`
/// or `{"success": false, "error", "relevant_tables", "dialect"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    success: bool,

    #[serde(flatten)]
    outcome: GenerationOutcome,

    /// Tables chosen by the selector, available on failure too
    pub relevant_tables: Vec<String>,

    pub dialect: Dialect,
}

impl GenerationResult {
    pub fn generated(parsed: ParsedResponse, relevant_tables: Vec<String>, dialect: Dialect) -> Self {
        let looks = parsed.sql_extracted() && looks_like_sql(&parsed.sql);
        Self {
            success: true,
            outcome: GenerationOutcome::Generated(GeneratedQuery {
                sql_query: parsed.sql,
                explanation: parsed.explanation,
                confidence: parsed.confidence,
                looks_like_sql: looks,
            }),
            relevant_tables,
            dialect,
        }
    }

    pub fn failed(error: impl Into<String>, relevant_tables: Vec<String>, dialect: Dialect) -> Self {
        Self {
            success: false,
            outcome: GenerationOutcome::Failed { error: error.into() },
            relevant_tables,
            dialect,
        }
    }

    /// True when the model was reached and its reply parsed.
    pub fn success(&self) -> bool {
        self.success
    }

    pub fn outcome(&self) -> &GenerationOutcome {
        &self.outcome
    }

    pub fn query(&self) -> Option<&GeneratedQuery> {
        match &self.outcome {
            GenerationOutcome::Generated(query) => Some(query),
            GenerationOutcome::Failed { .. } => None,
        }
    }

    pub fn sql(&self) -> Option<&str> {
        self.query().map(|q| q.sql_query.as_str())
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            GenerationOutcome::Failed { error } => Some(error),
            GenerationOutcome::Generated(_) => None,
        }
    }
}

/// Orchestrates table selection, context, prompt, completion and parsing.
///
/// Cheap to clone; catalog, profile and client are shared. Concurrent
/// `generate` calls are independent.
#[derive(Clone)]
pub struct QueryGenerator {
    catalog: Arc<SchemaCatalog>,
    profile: Arc<DomainProfile>,
    client: Arc<dyn CompletionClient>,
    config: GeneratorConfig,
}

impl QueryGenerator {
    /// Create a generator from its parts.
    pub fn new(
        catalog: SchemaCatalog,
        profile: DomainProfile,
        client: Arc<dyn CompletionClient>,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            profile: Arc::new(profile),
            client,
            config,
        }
    }

    /// Create a banking generator from configuration.
    ///
    /// Loads the catalog from `config.schema_path`, attaches the banking table
    /// descriptions and builds an HTTP completion client.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::CatalogError` if the catalog cannot be loaded
    /// and `GeneratorError::ConfigError` if no API key is configured
    pub fn from_config(config: GeneratorConfig) -> Result<Self> {
        let profile = DomainProfile::banking();
        let catalog = SchemaCatalog::load(&config.schema_path)?
            .with_descriptions(profile.descriptions.iter().cloned());
        let client = HttpCompletionClient::from_config(&config)?;

        tracing::info!(
            model = %config.model,
            provider = client.provider_name(),
            tables = catalog.len(),
            "Query generator ready"
        );

        Ok(Self::new(catalog, profile, Arc::new(client), config))
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    pub fn profile(&self) -> &DomainProfile {
        &self.profile
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Relevant tables for `question`.
    pub fn select_tables(&self, question: &str) -> Vec<String> {
        select_tables(&self.profile, question)
    }

    /// Schema context for `tables`.
    pub fn build_context(&self, tables: &[String]) -> String {
        build_context(&self.catalog, &self.profile, tables)
    }

    /// Full prompt for `question`, as `generate` would send it.
    pub fn build_prompt(&self, question: &str, dialect: &Dialect) -> String {
        let tables = self.select_tables(question);
        let context = self.build_context(&tables);
        build_prompt(question, &context, dialect)
    }

    /// Translate a question into SQL.
    ///
    /// # Arguments
    ///
    /// * `question` - Natural language question
    /// * `dialect` - Target dialect (prompt text only)
    ///
    /// # Returns
    ///
    /// Success result with SQL, explanation and confidence, or a failure
    /// result carrying the error message. Relevant tables and dialect are
    /// always set. An unextractable reply is a success whose SQL is the
    /// sentinel.
    pub async fn generate(&self, question: &str, dialect: &Dialect) -> GenerationResult {
        let request_id = Uuid::new_v4().to_string();
        let span = generation_span(dialect.as_str(), &request_id, question.chars().count());

        async {
            let tables = self.select_tables(question);

            if question.trim().is_empty() {
                tracing::warn!("Rejected empty question");
                record_generation_outcome(&tables, false, None, None);
                return GenerationResult::failed(EMPTY_QUESTION, tables, dialect.clone());
            }

            let context = self.build_context(&tables);
            let prompt = build_prompt(question, &context, dialect);
            tracing::debug!(tables = ?tables, prompt_len = prompt.len(), "Prompt composed");

            let request = CompletionRequest {
                prompt,
                model: self.config.model.clone(),
                max_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
            };

            let started = Instant::now();
            match self.client.complete(&request).await {
                Ok(raw) => {
                    let parsed = parse_response(&raw);
                    if !parsed.sql_extracted() {
                        tracing::warn!(reply_len = raw.len(), "No SQL block found in model reply");
                    }
                    record_generation_outcome(
                        &tables,
                        true,
                        Some(parsed.confidence.as_str()),
                        Some(parsed.sql_extracted()),
                    );
                    tracing::info!(
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        confidence = %parsed.confidence,
                        "SQL generated"
                    );
                    GenerationResult::generated(parsed, tables, dialect.clone())
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Completion failed"
                    );
                    record_generation_outcome(&tables, false, None, None);
                    GenerationResult::failed(e.to_string(), tables, dialect.clone())
                }
            }
        }
        .instrument(span)
        .await
    }
}
