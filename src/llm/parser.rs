//! Model response parsing.
//!
//! Three independent extraction rules run over the raw reply:
//!
//! - **SQL**: a ```` ```sql ```` fenced block, else any fenced block, else a sentinel
//! - **Explanation**: text after `EXPLANATION:` up to the next `CONFIDENCE:`
//! - **Confidence**: first of high/medium/low found after `CONFIDENCE:`
//!
//! Parsing never fails. Missing pieces become sentinels or defaults so the
//! result is always structurally complete.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Placeholder for replies without a recognisable SQL block.
pub const SQL_SENTINEL: &str = "-- Could not extract SQL query from response";

/// Placeholder for replies without an explanation section.
pub const NO_EXPLANATION: &str = "No explanation provided";

pub const EXPLANATION_MARKER: &str = "EXPLANATION:";
pub const CONFIDENCE_MARKER: &str = "CONFIDENCE:";

// The tag must be followed by whitespace so ```sql-92 or ```sqlite fall through
static SQL_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?i:sql)(?:[ \t]*\r?\n|[ \t]+)(.*?)```").expect("valid regex")
});

static ANY_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").expect("valid regex"));

static LANGUAGE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_+\-]{0,19}$").expect("valid regex"));

/// Self-reported model confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    #[default]
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured view of a model reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedResponse {
    pub sql: String,
    pub explanation: String,
    pub confidence: Confidence,
}

impl ParsedResponse {
    /// False when the SQL field holds the sentinel.
    pub fn sql_extracted(&self) -> bool {
        self.sql != SQL_SENTINEL
    }
}

/// Parse a raw model reply.
pub fn parse_response(raw: &str) -> ParsedResponse {
    ParsedResponse {
        sql: extract_sql(raw).unwrap_or_else(|| SQL_SENTINEL.to_string()),
        explanation: extract_explanation(raw).unwrap_or_else(|| NO_EXPLANATION.to_string()),
        confidence: extract_confidence(raw).unwrap_or_default(),
    }
}

/// SQL from the first ```` ```sql ```` block, else the first fenced block.
pub fn extract_sql(raw: &str) -> Option<String> {
    extract_tagged_block(raw).or_else(|| extract_any_block(raw))
}

/// Interior of the first non-empty block opened with ```` ```sql ````.
pub fn extract_tagged_block(raw: &str) -> Option<String> {
    SQL_FENCE
        .captures_iter(raw)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .find(|sql| !sql.is_empty())
        .map(str::to_string)
}

/// Interior of the first non-empty fenced block, minus a leading language tag line.
pub fn extract_any_block(raw: &str) -> Option<String> {
    ANY_FENCE
        .captures_iter(raw)
        .filter_map(|c| c.get(1))
        .map(|m| strip_language_tag(m.as_str()).trim())
        .find(|sql| !sql.is_empty())
        .map(str::to_string)
}

fn strip_language_tag(interior: &str) -> &str {
    match interior.split_once('\n') {
        Some((first, rest)) if LANGUAGE_TAG.is_match(first.trim_end()) => rest,
        _ => interior,
    }
}

/// Text between `EXPLANATION:` and the next `CONFIDENCE:` (or end of text).
pub fn extract_explanation(raw: &str) -> Option<String> {
    let start = raw.find(EXPLANATION_MARKER)? + EXPLANATION_MARKER.len();
    let rest = &raw[start..];
    let end = rest.find(CONFIDENCE_MARKER).unwrap_or(rest.len());
    Some(rest[..end].trim().to_string())
}

/// Confidence label from the text following `CONFIDENCE:`.
///
/// Substring match in priority order high, medium, low; `None` when the
/// marker is missing or no label appears.
pub fn extract_confidence(raw: &str) -> Option<Confidence> {
    let start = raw.find(CONFIDENCE_MARKER)? + CONFIDENCE_MARKER.len();
    let text = raw[start..].to_lowercase();
    [Confidence::High, Confidence::Medium, Confidence::Low]
        .into_iter()
        .find(|level| text.contains(level.as_str()))
}
