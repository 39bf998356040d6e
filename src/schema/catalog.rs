//! Schema catalog: table, column and relationship metadata.
//!
//! The catalog is read from a JSON document of the form
//!
//! ```json
//! {
//!   "tables": {
//!     "customers": {
//!       "row_count": 1000,
//!       "columns": [{"name": "customer_id", "type": "integer", "nullable": false}]
//!     }
//!   },
//!   "relationships": [
//!     {"source_table": "accounts", "source_column": "customer_id",
//!      "target_table": "customers", "target_column": "customer_id"}
//!   ]
//! }
//! ```
//!
//! Extra keys (indexes, sample queries, comments) are ignored. Table order
//! follows the document.

use crate::types::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name
    pub name: String,

    /// Declared SQL type
    #[serde(rename = "type")]
    pub data_type: String,

    /// Whether NULL is allowed
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

impl ColumnMetadata {
    pub fn new(name: &str, data_type: &str, nullable: bool) -> Self {
        Self {
            name: name.to_string(),
            data_type: data_type.to_string(),
            nullable,
        }
    }
}

/// Table metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableMetadata {
    /// Table name
    pub name: String,

    /// Approximate row count (informational)
    pub row_count: u64,

    /// Columns in declaration order
    pub columns: Vec<ColumnMetadata>,
}

/// Directed foreign-key edge `source_table.source_column -> target_table.target_column`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
}

impl Relationship {
    pub fn new(source_table: &str, source_column: &str, target_table: &str, target_column: &str) -> Self {
        Self {
            source_table: source_table.to_string(),
            source_column: source_column.to_string(),
            target_table: target_table.to_string(),
            target_column: target_column.to_string(),
        }
    }

    /// True if either endpoint is `table`.
    pub fn touches(&self, table: &str) -> bool {
        self.source_table == table || self.target_table == table
    }

    /// True for edges from a table to itself (e.g. `employees.manager_id`).
    pub fn is_self_reference(&self) -> bool {
        self.source_table == self.target_table
    }
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{}",
            self.source_table, self.source_column, self.target_table, self.target_column
        )
    }
}

#[derive(Debug, Deserialize)]
struct RawTable {
    #[serde(default)]
    row_count: u64,
    columns: Vec<ColumnMetadata>,
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    tables: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    relationships: Vec<Relationship>,
}

/// Immutable schema catalog shared by every generation call.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    tables: Vec<TableMetadata>,
    positions: HashMap<String, usize>,
    descriptions: BTreeMap<String, String>,
    relationships: Vec<Relationship>,
}

impl SchemaCatalog {
    /// Build a catalog from parts.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::CatalogError` on duplicate table names or
    /// relationships with empty endpoints
    pub fn new(tables: Vec<TableMetadata>, relationships: Vec<Relationship>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(tables.len());
        for (index, table) in tables.iter().enumerate() {
            if table.name.trim().is_empty() {
                return Err(GeneratorError::CatalogError("Table with empty name".to_string()));
            }
            if positions.insert(table.name.clone(), index).is_some() {
                return Err(GeneratorError::CatalogError(format!(
                    "Duplicate table '{}'",
                    table.name
                )));
            }
        }

        for rel in &relationships {
            let endpoints = [&rel.source_table, &rel.source_column, &rel.target_table, &rel.target_column];
            if endpoints.iter().any(|s| s.trim().is_empty()) {
                return Err(GeneratorError::CatalogError(format!(
                    "Relationship with empty endpoint: {}",
                    rel
                )));
            }
        }

        Ok(Self {
            tables,
            positions,
            descriptions: BTreeMap::new(),
            relationships,
        })
    }

    /// Parse a catalog from its JSON document.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::CatalogError` if the document is malformed
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawCatalog = serde_json::from_str(json)
            .map_err(|e| GeneratorError::CatalogError(format!("Invalid schema document: {}", e)))?;

        let mut tables = Vec::with_capacity(raw.tables.len());
        for (name, value) in raw.tables {
            let table: RawTable = serde_json::from_value(value).map_err(|e| {
                GeneratorError::CatalogError(format!("Invalid metadata for table '{}': {}", name, e))
            })?;
            tables.push(TableMetadata {
                name,
                row_count: table.row_count,
                columns: table.columns,
            });
        }

        Self::new(tables, raw.relationships)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::CatalogError` if the file is missing or malformed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::CatalogError(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_json_str(&content)?;

        tracing::info!(
            path = %path.display(),
            tables = catalog.tables.len(),
            relationships = catalog.relationships.len(),
            "Schema catalog loaded"
        );

        Ok(catalog)
    }

    /// Attach human-readable table descriptions, replacing existing ones with the same name.
    pub fn with_descriptions<I, K, V>(mut self, descriptions: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.descriptions
            .extend(descriptions.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn table(&self, name: &str) -> Option<&TableMetadata> {
        self.positions.get(name).map(|&i| &self.tables[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.descriptions.get(name).map(String::as_str)
    }

    /// Tables in document order.
    pub fn tables(&self) -> impl Iterator<Item = &TableMetadata> {
        self.tables.iter()
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
