//! Tracing instrumentation for SQL generation.
//!
//! Span names and attributes follow the OpenTelemetry GenAI semantic
//! conventions where they apply:
//! - https://opentelemetry.io/docs/specs/semconv/gen-ai/gen-ai-spans/
//!
//! **Spans**
//! - `sql.generate`: one per `QueryGenerator::generate` call (INTERNAL)
//! - `gen_ai.chat`: one per completion request (CLIENT)
//!
//! Outcome attributes are declared empty when the span is created and filled
//! in once known.
//!
//! # Example
//!
//! ```rust,ignore
//! use sql_rag::otel::{init_tracing, LogFormat};
//!
//! init_tracing(LogFormat::Json)?;
//! ```

#[cfg(test)]
pub(crate) mod capture;
pub mod spans;
pub mod subscriber;

pub use spans::{generation_span, llm_span, record_generation_outcome, record_llm_metrics};
pub use subscriber::{init_tracing, LogFormat};
