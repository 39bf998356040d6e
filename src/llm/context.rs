//! Schema context rendering for prompts.

use crate::schema::{DomainProfile, SchemaCatalog, FALLBACK_DESCRIPTION};
use std::fmt::Write;

/// Render the schema context for the given tables.
///
/// # Arguments
///
/// * `catalog` - Schema catalog
/// * `profile` - Domain profile (join guidance)
/// * `table_names` - Tables to describe, in output order
///
/// # Returns
///
/// Plain text block: one section per table present in the catalog, then every
/// catalog relationship touching a requested table, then applicable join hints.
///
/// Names absent from the catalog are skipped. Relationships pull in join
/// partners that were not selected themselves.
pub fn build_context(catalog: &SchemaCatalog, profile: &DomainProfile, table_names: &[String]) -> String {
    let mut out = String::new();
    out.push_str("RELEVANT DATABASE SCHEMA:\n");
    out.push_str(&"=".repeat(40));
    out.push('\n');

    for name in table_names {
        let Some(table) = catalog.table(name) else {
            tracing::debug!(table = %name, "Table not in catalog, skipping");
            continue;
        };

        let _ = writeln!(out, "\nTABLE: {}", table.name);
        let _ = writeln!(
            out,
            "Purpose: {}",
            catalog.description(&table.name).unwrap_or(FALLBACK_DESCRIPTION)
        );
        let _ = writeln!(out, "Rows: {}", group_thousands(table.row_count));
        out.push_str("Columns:\n");
        for column in &table.columns {
            let _ = write!(out, "  - {}: {}", column.name, column.data_type);
            if !column.nullable {
                out.push_str(" (required)");
            }
            out.push('\n');
        }
    }

    out.push_str("\nTABLE RELATIONSHIPS:\n");
    let mut any = false;
    for rel in catalog.relationships() {
        if table_names.iter().any(|t| rel.touches(t)) {
            let _ = writeln!(out, "  {}", rel);
            any = true;
        }
    }
    if !any {
        out.push_str("  (none)\n");
    }

    let mut hints = profile.applicable_hints(table_names).peekable();
    if hints.peek().is_some() {
        out.push_str("\nJOIN GUIDANCE:\n");
        for hint in hints {
            let _ = writeln!(out, "  {}:", hint.name);
            for note in &hint.notes {
                let _ = writeln!(out, "    - {}", note);
            }
        }
    }

    out
}

/// Format an integer with comma thousands separators (1234567 → "1,234,567").
pub(crate) fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnMetadata, Relationship, TableMetadata};

    fn catalog() -> SchemaCatalog {
        let tables = vec![
            TableMetadata {
                name: "customers".to_string(),
                row_count: 1000,
                columns: vec![
                    ColumnMetadata::new("customer_id", "integer", false),
                    ColumnMetadata::new("email", "character varying", true),
                ],
            },
            TableMetadata {
                name: "accounts".to_string(),
                row_count: 2500,
                columns: vec![
                    ColumnMetadata::new("account_id", "integer", false),
                    ColumnMetadata::new("customer_id", "integer", false),
                    ColumnMetadata::new("current_balance", "numeric", true),
                ],
            },
            TableMetadata {
                name: "employees".to_string(),
                row_count: 120,
                columns: vec![
                    ColumnMetadata::new("employee_id", "integer", false),
                    ColumnMetadata::new("manager_id", "integer", true),
                ],
            },
        ];
        let relationships = vec![
            Relationship::new("accounts", "customer_id", "customers", "customer_id"),
            Relationship::new("employees", "manager_id", "employees", "employee_id"),
        ];
        SchemaCatalog::new(tables, relationships)
            .unwrap()
            .with_descriptions([("customers", "Customer profiles")])
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_table_sections() {
        let profile = DomainProfile::banking();
        let text = build_context(&catalog(), &profile, &names(&["customers", "accounts"]));

        assert!(text.contains("TABLE: customers\nPurpose: Customer profiles\nRows: 1,000\n"));
        assert!(text.contains("  - customer_id: integer (required)\n"));
        assert!(text.contains("  - email: character varying\n"));
        // No description registered
        assert!(text.contains("TABLE: accounts\nPurpose: Banking table\nRows: 2,500\n"));
        assert!(text.contains("  accounts.customer_id -> customers.customer_id\n"));
        assert!(text.contains("customer_balances:"));
        // Input order preserved
        assert!(text.find("TABLE: customers").unwrap() < text.find("TABLE: accounts").unwrap());
    }

    #[test]
    fn test_unknown_table_skipped() {
        let profile = DomainProfile::banking();
        let text = build_context(&catalog(), &profile, &names(&["merchants", "employees"]));
        assert!(!text.contains("TABLE: merchants"));
        assert!(text.contains("TABLE: employees"));
    }

    #[test]
    fn test_relationships_expand_to_join_partners() {
        let profile = DomainProfile::banking();
        let text = build_context(&catalog(), &profile, &names(&["accounts"]));
        assert!(!text.contains("TABLE: customers"));
        assert!(text.contains("accounts.customer_id -> customers.customer_id"));
        assert!(!text.contains("employees.manager_id"));
    }

    #[test]
    fn test_self_reference_rendered() {
        let profile = DomainProfile::banking();
        let text = build_context(&catalog(), &profile, &names(&["employees"]));
        assert!(text.contains("  employees.manager_id -> employees.employee_id\n"));
    }

    #[test]
    fn test_no_relationships() {
        let profile = DomainProfile::banking();
        let text = build_context(&catalog(), &profile, &names(&["nothing"]));
        assert!(text.ends_with("TABLE RELATIONSHIPS:\n  (none)\n"));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
