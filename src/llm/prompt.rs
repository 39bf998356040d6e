//! Prompt composition for SQL generation.
//!
//! The response format section is the contract the parser relies on: a fenced
//! SQL block, then an `EXPLANATION:` line, then a `CONFIDENCE:` line, in that
//! order.

use crate::llm::dialect::Dialect;
use crate::llm::parser::{CONFIDENCE_MARKER, EXPLANATION_MARKER};

/// Build the instruction text sent to the model.
///
/// # Arguments
///
/// * `question` - User question, embedded verbatim
/// * `context` - Schema context from `build_context`
/// * `dialect` - Target dialect, named in the preamble and guidelines
pub fn build_prompt(question: &str, context: &str, dialect: &Dialect) -> String {
    let target = dialect.prompt_name();

    let guidelines = [
        format!("Generate syntactically correct {} queries", target),
        "Use proper JOINs to connect related tables".to_string(),
        "Include appropriate WHERE clauses for filtering".to_string(),
        "Use aggregate functions (COUNT, SUM, AVG) when asking for totals or averages".to_string(),
        "Add ORDER BY for meaningful sorting".to_string(),
        "Limit result rows for top/bottom queries".to_string(),
        "Handle NULL values appropriately".to_string(),
        "Include table aliases for readability".to_string(),
        format!("Use proper date formatting for {}", target),
        "Follow banking industry best practices".to_string(),
    ];
    let guidelines = guidelines
        .iter()
        .enumerate()
        .map(|(i, g)| format!("{}. {}", i + 1, g))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert SQL developer specializing in banking database queries. \
Your task is to convert natural language questions into accurate {target} SQL queries.

{context}

IMPORTANT GUIDELINES:
{guidelines}

RESPONSE FORMAT:
Provide your response in this exact format:

```sql
[Your SQL query here]
```

{EXPLANATION_MARKER}
[Brief explanation of what the query does and why you chose this approach]

{CONFIDENCE_MARKER} [high/medium/low]

USER QUESTION: {question}

Generate the SQL query now:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_in_order() {
        let prompt = build_prompt("How many accounts?", "CTX", &Dialect::PostgreSql);
        let fence = prompt.find("```sql").unwrap();
        let explanation = prompt.find("EXPLANATION:").unwrap();
        let confidence = prompt.find("CONFIDENCE:").unwrap();
        assert!(fence < explanation && explanation < confidence);
    }

    #[test]
    fn test_dialect_and_question_embedded() {
        let prompt = build_prompt("List all branches", "RELEVANT DATABASE SCHEMA:", &Dialect::MySql);
        assert!(prompt.contains("accurate MYSQL SQL queries"));
        assert!(prompt.contains("9. Use proper date formatting for MYSQL"));
        assert!(prompt.contains("RELEVANT DATABASE SCHEMA:"));
        assert!(prompt.contains("USER QUESTION: List all branches"));
        assert!(prompt.ends_with("Generate the SQL query now:"));
    }

    #[test]
    fn test_context_embedded_unchanged() {
        let context = "RELEVANT DATABASE SCHEMA:\n  (none)\n\n";
        let prompt = build_prompt("q", context, &Dialect::PostgreSql);
        assert!(prompt.contains(&format!("SQL queries.\n\n{}\n\nIMPORTANT GUIDELINES:", context)));
    }

    #[test]
    fn test_unknown_dialect_verbatim() {
        let prompt = build_prompt("q", "c", &Dialect::from("DuckDB"));
        assert!(prompt.contains("accurate DuckDB SQL queries"));
    }

    #[test]
    fn test_ten_guidelines() {
        let prompt = build_prompt("q", "c", &Dialect::Oracle);
        assert!(prompt.contains("1. Generate syntactically correct ORACLE queries"));
        assert!(prompt.contains("10. Follow banking industry best practices"));
    }
}
