//! Keyword-based relevant table selection.

use crate::schema::DomainProfile;

/// Select tables relevant to a natural language question.
///
/// # Arguments
///
/// * `profile` - Domain vocabulary (keywords, default set, cap)
/// * `question` - Natural language question
///
/// # Returns
///
/// Between 1 and `profile.max_tables` table names
///
/// # Algorithm
///
/// 1. Lower-case the question
/// 2. For every keyword that occurs as a substring, add its tables
/// 3. De-duplicate, keeping the first occurrence
/// 4. Fall back to `profile.default_tables` when nothing matched
/// 5. Truncate to `profile.max_tables`
///
/// Matching is a heuristic; it can both over- and under-select.
///
/// # Examples
///
/// - "top customers by balance" → customers, customer_types, customer_segments, accounts
/// - "what is the weather" → customers, accounts, transactions (default)
pub fn select_tables(profile: &DomainProfile, question: &str) -> Vec<String> {
    let question = question.to_lowercase();
    let mut selected: Vec<String> = Vec::new();

    for (keyword, tables) in &profile.keywords {
        if !question.contains(keyword.as_str()) {
            continue;
        }
        for table in tables {
            if !selected.contains(table) {
                selected.push(table.clone());
            }
        }
    }

    if selected.is_empty() {
        selected = profile.default_tables.clone();
    }

    // A zero cap would break the non-empty guarantee
    selected.truncate(profile.max_tables.max(1));
    selected
}
