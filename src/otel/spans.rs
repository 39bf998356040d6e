//! Span helpers for generation and completion calls.

use tracing::field::Empty;
use tracing::{span, Level, Span};

/// Create the span covering one question-to-SQL generation.
///
/// # Arguments
///
/// * `dialect` - Target dialect id
/// * `request_id` - Per-call id for log correlation
/// * `question_len` - Question length in characters
///
/// # Example
///
/// ```rust,ignore
/// let span = generation_span("postgresql", &request_id, question.len());
/// async { /* ... */ }.instrument(span).await;
/// ```
pub fn generation_span(dialect: &str, request_id: &str, question_len: usize) -> Span {
    span!(
        Level::INFO,
        "sql.generate",
        otel.name = %format!("generate {}", dialect),
        otel.kind = "internal",
        sql.dialect = dialect,
        request.id = request_id,
        question.length = question_len,
        sql.tables = Empty,
        sql.success = Empty,
        sql.confidence = Empty,
        sql.extracted = Empty,
    )
}

/// Create a completion request span with GenAI request attributes.
///
/// # Arguments
///
/// * `provider` - Provider id (`gen_ai.system`)
/// * `model` - Requested model
/// * `temperature` - Sampling temperature
/// * `max_tokens` - Output limit
pub fn llm_span(provider: &str, model: &str, temperature: f32, max_tokens: u32) -> Span {
    span!(
        Level::INFO,
        "gen_ai.chat",
        otel.name = %format!("chat {}", model),
        otel.kind = "client",
        gen_ai.operation.name = "chat",
        gen_ai.system = provider,
        gen_ai.request.model = model,
        gen_ai.request.temperature = temperature as f64,
        gen_ai.request.max_tokens = max_tokens as u64,
        gen_ai.usage.output_tokens = Empty,
    )
}

/// Record the outcome of a generation on the current span.
///
/// `confidence` and `sql_extracted` are only recorded for successful calls.
pub fn record_generation_outcome(
    tables: &[String],
    success: bool,
    confidence: Option<&str>,
    sql_extracted: Option<bool>,
) {
    let span = Span::current();
    span.record("sql.tables", tables.join(",").as_str());
    span.record("sql.success", success);
    if let Some(confidence) = confidence {
        span.record("sql.confidence", confidence);
    }
    if let Some(extracted) = sql_extracted {
        span.record("sql.extracted", extracted);
    }
}

/// Record token usage reported by the provider on the current span.
pub fn record_llm_metrics(output_tokens: Option<u64>) {
    if let Some(tokens) = output_tokens {
        Span::current().record("gen_ai.usage.output_tokens", tokens);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::otel::capture::FieldCapture;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn test_generation_span_creation() {
        tracing::subscriber::with_default(tracing_subscriber::registry(), || {
            let span = generation_span("postgresql", "req-1", 42);
            let meta = span.metadata().unwrap();
            assert_eq!(meta.name(), "sql.generate");
            assert!(meta.fields().field("sql.tables").is_some());
            assert!(meta.fields().field("sql.extracted").is_some());
        });
    }

    #[test]
    fn test_llm_span_creation() {
        tracing::subscriber::with_default(tracing_subscriber::registry(), || {
            let span = llm_span("anthropic", "claude-3-5-sonnet-20241022", 0.1, 2000);
            let meta = span.metadata().unwrap();
            assert_eq!(meta.name(), "gen_ai.chat");
            assert!(meta.fields().field("gen_ai.usage.output_tokens").is_some());
        });
    }

    #[test]
    fn test_outcome_recorded_on_current_span() {
        let capture = FieldCapture::new("sql.generate");
        let subscriber = tracing_subscriber::registry().with(capture.clone());

        tracing::subscriber::with_default(subscriber, || {
            let span = generation_span("mysql", "req-2", 10);
            let _entered = span.enter();
            record_generation_outcome(
                &["accounts".to_string(), "customers".to_string()],
                true,
                Some("high"),
                Some(true),
            );
        });

        assert_eq!(capture.get("sql.dialect").as_deref(), Some("mysql"));
        assert_eq!(capture.get("request.id").as_deref(), Some("req-2"));
        assert_eq!(capture.get("sql.tables").as_deref(), Some("accounts,customers"));
        assert_eq!(capture.get("sql.success").as_deref(), Some("true"));
        assert_eq!(capture.get("sql.confidence").as_deref(), Some("high"));
        assert_eq!(capture.get("sql.extracted").as_deref(), Some("true"));
    }

    #[test]
    fn test_output_tokens_recorded() {
        let capture = FieldCapture::new("gen_ai.chat");
        let subscriber = tracing_subscriber::registry().with(capture.clone());

        tracing::subscriber::with_default(subscriber, || {
            let span = llm_span("openai", "gpt-4o", 0.1, 512);
            let _entered = span.enter();
            record_llm_metrics(Some(37));
        });

        assert_eq!(capture.get("gen_ai.system").as_deref(), Some("openai"));
        assert_eq!(capture.get("gen_ai.usage.output_tokens").as_deref(), Some("37"));
    }

    #[test]
    fn test_record_without_span_is_noop() {
        record_generation_outcome(&["accounts".to_string()], true, Some("high"), Some(true));
        record_llm_metrics(Some(12));
    }
}
