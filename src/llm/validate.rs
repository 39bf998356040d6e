//! Checks on extracted SQL.
//!
//! Gives callers a boolean signal instead of string-matching the sentinel.
//! Nothing here rejects or rewrites a query.

use crate::llm::dialect::Dialect;
use crate::llm::parser::SQL_SENTINEL;
use serde::{Deserialize, Serialize};
use sqlparser::dialect::{GenericDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect};
use sqlparser::parser::Parser;

const LEADING_KEYWORDS: [&str; 6] = ["SELECT", "WITH", "INSERT", "UPDATE", "DELETE", "CREATE"];

/// Result of checking a generated query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlCheck {
    /// Starts with a statement keyword
    pub looks_like_sql: bool,

    /// Parsed cleanly with the dialect's grammar
    pub parses: bool,

    /// Number of statements parsed
    pub statement_count: usize,

    /// Parser error message, if parsing failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

/// True if the first keyword (after `--` comment lines) starts a SQL statement.
///
/// The extraction sentinel is a comment and never qualifies.
pub fn looks_like_sql(text: &str) -> bool {
    let body = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("--"))
        .collect::<Vec<_>>()
        .join(" ");

    let first = body
        .split(|c: char| c.is_whitespace() || c == '(')
        .find(|word| !word.is_empty())
        .unwrap_or("")
        .to_uppercase();

    LEADING_KEYWORDS.contains(&first.as_str())
}

/// Check `sql` against the grammar of `dialect`.
///
/// Oracle and unknown dialects use the generic grammar.
pub fn validate_sql(sql: &str, dialect: &Dialect) -> SqlCheck {
    let looks = sql != SQL_SENTINEL && looks_like_sql(sql);

    let parsed = match dialect {
        Dialect::PostgreSql => Parser::parse_sql(&PostgreSqlDialect {}, sql),
        Dialect::MySql => Parser::parse_sql(&MySqlDialect {}, sql),
        Dialect::SqlServer => Parser::parse_sql(&MsSqlDialect {}, sql),
        Dialect::Oracle | Dialect::Other(_) => Parser::parse_sql(&GenericDialect {}, sql),
    };

    match parsed {
        Ok(statements) if !statements.is_empty() => SqlCheck {
            looks_like_sql: looks,
            parses: true,
            statement_count: statements.len(),
            parse_error: None,
        },
        Ok(_) => SqlCheck {
            looks_like_sql: looks,
            parses: false,
            statement_count: 0,
            parse_error: Some("no statements".to_string()),
        },
        Err(e) => SqlCheck {
            looks_like_sql: looks,
            parses: false,
            statement_count: 0,
            parse_error: Some(e.to_string()),
        },
    }
}
