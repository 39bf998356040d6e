//! SQL RAG - natural language to SQL over a banking schema catalog.
//!
//! A question flows through table selection, schema context rendering,
//! prompt composition, one completion call and response parsing:
//!
//! ```rust,ignore
//! use sql_rag::{Dialect, GeneratorConfig, QueryGenerator};
//!
//! let generator = QueryGenerator::from_config(GeneratorConfig::from_env()?)?;
//! let result = generator
//!     .generate("Show me the top 5 customers by account balance", &Dialect::PostgreSql)
//!     .await;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! ```

pub mod config;
pub mod export;
pub mod llm;
pub mod otel;
pub mod schema;
pub mod types;

pub use config::GeneratorConfig;
pub use llm::{
    CompletionClient, CompletionRequest, Confidence, Dialect, GenerationResult, QueryGenerator,
};
pub use schema::{DomainProfile, SchemaCatalog};
pub use types::{GeneratorError, Result};
