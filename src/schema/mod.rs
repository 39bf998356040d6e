//! Schema metadata and domain vocabulary.

pub mod banking;
pub mod catalog;

pub use banking::{DomainProfile, JoinHint, FALLBACK_DESCRIPTION, MAX_RELEVANT_TABLES};
pub use catalog::{ColumnMetadata, Relationship, SchemaCatalog, TableMetadata};
