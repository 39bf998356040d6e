//! Built-in banking domain profile.
//!
//! Holds the keyword vocabulary used for table selection, the fallback table
//! set, table descriptions and join guidance. Constructed once and passed
//! explicitly to the selector and context builder.

use serde::{Deserialize, Serialize};

/// Maximum number of tables the selector returns.
pub const MAX_RELEVANT_TABLES: usize = 6;

/// Description used for tables without a registered description.
pub const FALLBACK_DESCRIPTION: &str = "Banking table";

/// Curated join path for a common business question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinHint {
    /// Short label (e.g., "customer_transactions")
    pub name: String,

    /// Tables that must all be in context for the hint to apply
    pub tables: Vec<String>,

    /// Join lines and usage notes
    pub notes: Vec<String>,
}

/// Immutable vocabulary for one business domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainProfile {
    /// Lower-case keyword to tables, in match priority order
    pub keywords: Vec<(String, Vec<String>)>,

    /// Tables used when no keyword matches
    pub default_tables: Vec<String>,

    /// Upper bound on selected tables
    pub max_tables: usize,

    /// Table name to description
    pub descriptions: Vec<(String, String)>,

    /// Join guidance appended to the schema context
    #[serde(default)]
    pub join_hints: Vec<JoinHint>,
}

impl DomainProfile {
    /// Banking profile over the 17-table retail banking schema.
    pub fn banking() -> Self {
        let keywords: &[(&str, &[&str])] = &[
            ("customer", &["customers", "customer_types", "customer_segments"]),
            ("account", &["accounts", "products", "product_categories"]),
            ("transaction", &["transactions", "transaction_types", "merchants"]),
            ("employee", &["employees", "departments"]),
            ("branch", &["branches", "regions"]),
            ("balance", &["accounts"]),
            ("deposit", &["transactions", "accounts"]),
            ("withdrawal", &["transactions", "accounts"]),
            ("transfer", &["transactions"]),
            ("loan", &["products", "accounts"]),
            ("credit", &["products", "accounts", "customers"]),
            ("city", &["cities", "branches", "customers"]),
            ("state", &["states", "cities"]),
            ("region", &["regions", "branches"]),
            ("merchant", &["merchants", "merchant_categories", "transactions"]),
            ("salary", &["employees"]),
            ("manager", &["employees"]),
            ("segment", &["customer_segments", "customers"]),
        ];

        let descriptions: &[(&str, &str)] = &[
            ("countries", "Reference table containing country information with currencies and tax rates"),
            ("states", "Geographic reference for US states and provinces"),
            ("cities", "City information with population and economic data"),
            ("regions", "Bank operational regions for branch organization"),
            ("branches", "Physical bank branch locations and details"),
            ("departments", "Bank organizational departments"),
            ("employees", "Bank staff information with hierarchy and compensation"),
            ("customer_segments", "Customer classification tiers based on relationship value"),
            ("customer_types", "Categories of customers (individual, business, corporate)"),
            ("customers", "Customer profiles with demographics and financial information"),
            ("product_categories", "Banking product classification (deposits, loans, cards)"),
            ("products", "Specific banking products with terms and fees"),
            ("accounts", "Customer accounts with balances and transaction limits"),
            ("transaction_types", "Classification of banking transaction types"),
            ("merchant_categories", "Merchant category codes for transaction classification"),
            ("merchants", "Business entities where transactions occur"),
            ("transactions", "Individual banking transactions with amounts and details"),
        ];

        let join_hints = vec![
            hint(
                "customer_balances",
                &["customers", "accounts"],
                &[
                    "customers.customer_id = accounts.customer_id",
                    "Use accounts.current_balance for current balances",
                ],
            ),
            hint(
                "customer_transactions",
                &["customers", "accounts", "transactions"],
                &[
                    "customers.customer_id = accounts.customer_id",
                    "accounts.account_id = transactions.account_id",
                    "transactions has no customer_id column; join through accounts",
                ],
            ),
            hint(
                "geographic_customers",
                &["customers", "cities", "states"],
                &[
                    "customers.city_id = cities.city_id",
                    "cities.state_id = states.state_id",
                ],
            ),
            hint(
                "branch_employees",
                &["branches", "employees"],
                &[
                    "branches.branch_id = employees.branch_id",
                    "Active employees: employees.termination_date IS NULL",
                ],
            ),
        ];

        Self {
            keywords: keywords
                .iter()
                .map(|(k, tables)| (k.to_string(), tables.iter().map(|t| t.to_string()).collect()))
                .collect(),
            default_tables: vec![
                "customers".to_string(),
                "accounts".to_string(),
                "transactions".to_string(),
            ],
            max_tables: MAX_RELEVANT_TABLES,
            descriptions: descriptions
                .iter()
                .map(|(t, d)| (t.to_string(), d.to_string()))
                .collect(),
            join_hints,
        }
    }

    /// Tables mapped to `keyword`, if it is in the vocabulary.
    pub fn tables_for(&self, keyword: &str) -> Option<&[String]> {
        self.keywords
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, tables)| tables.as_slice())
    }

    /// Hints whose tables are all contained in `tables`.
    pub fn applicable_hints<'a>(&'a self, tables: &'a [String]) -> impl Iterator<Item = &'a JoinHint> {
        self.join_hints
            .iter()
            .filter(move |h| h.tables.iter().all(|t| tables.contains(t)))
    }
}

impl Default for DomainProfile {
    fn default() -> Self {
        Self::banking()
    }
}

fn hint(name: &str, tables: &[&str], notes: &[&str]) -> JoinHint {
    JoinHint {
        name: name.to_string(),
        tables: tables.iter().map(|t| t.to_string()).collect(),
        notes: notes.iter().map(|n| n.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banking_vocabulary() {
        let profile = DomainProfile::banking();
        assert_eq!(profile.keywords.len(), 18);
        assert_eq!(profile.descriptions.len(), 17);
        assert_eq!(profile.tables_for("balance"), Some(&["accounts".to_string()][..]));
        assert_eq!(profile.tables_for("manager"), Some(&["employees".to_string()][..]));
        assert!(profile.tables_for("weather").is_none());
    }

    #[test]
    fn test_keywords_are_lowercase() {
        let profile = DomainProfile::banking();
        assert!(profile.keywords.iter().all(|(k, _)| *k == k.to_lowercase()));
    }

    #[test]
    fn test_applicable_hints() {
        let profile = DomainProfile::banking();
        let tables = vec!["customers".to_string(), "accounts".to_string()];
        let names: Vec<_> = profile.applicable_hints(&tables).map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["customer_balances"]);
    }
}
