//! LLM-powered natural language to SQL generation.

pub mod client;
pub mod context;
pub mod dialect;
pub mod generator;
pub mod parser;
pub mod prompt;
pub mod selector;
pub mod validate;

pub use client::{CompletionClient, CompletionRequest, HttpCompletionClient, LlmProvider};
pub use context::build_context;
pub use dialect::{Dialect, DialectInfo};
pub use generator::{GeneratedQuery, GenerationOutcome, GenerationResult, QueryGenerator};
pub use parser::{parse_response, Confidence, ParsedResponse, SQL_SENTINEL};
pub use prompt::build_prompt;
pub use selector::select_tables;
pub use validate::{looks_like_sql, validate_sql, SqlCheck};
