//! Target SQL dialects.
//!
//! The dialect only shapes prompt text; no SQL is rewritten between dialects.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Target SQL dialect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    #[default]
    PostgreSql,
    MySql,
    Oracle,
    SqlServer,
    /// Unrecognised identifier, passed through verbatim
    Other(String),
}

/// Descriptive metadata for a known dialect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialectInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
}

impl Dialect {
    /// Dialects with first-class metadata.
    pub fn supported() -> [Dialect; 4] {
        [Dialect::PostgreSql, Dialect::MySql, Dialect::Oracle, Dialect::SqlServer]
    }

    /// Identifier as used in configuration and results.
    pub fn as_str(&self) -> &str {
        match self {
            Self::PostgreSql => "postgresql",
            Self::MySql => "mysql",
            Self::Oracle => "oracle",
            Self::SqlServer => "sqlserver",
            Self::Other(raw) => raw,
        }
    }

    /// Name embedded in the prompt: upper-cased for known dialects, verbatim otherwise.
    pub fn prompt_name(&self) -> String {
        match self {
            Self::Other(raw) => raw.clone(),
            known => known.as_str().to_uppercase(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    pub fn info(&self) -> Option<DialectInfo> {
        let info = match self {
            Self::PostgreSql => DialectInfo {
                name: "PostgreSQL",
                description: "Advanced open-source database with JSON support",
                features: &["JSON", "Arrays", "Window Functions", "CTEs", "UPSERT"],
            },
            Self::MySql => DialectInfo {
                name: "MySQL",
                description: "Popular open-source database for web applications",
                features: &["JSON (5.7+)", "Full-Text Search", "Partitioning", "Replication"],
            },
            Self::Oracle => DialectInfo {
                name: "Oracle Database",
                description: "Enterprise database with advanced analytics",
                features: &["Advanced Analytics", "Partitioning", "Data Guard", "RAC"],
            },
            Self::SqlServer => DialectInfo {
                name: "SQL Server",
                description: "Microsoft enterprise database platform",
                features: &["T-SQL", "Integration Services", "Analysis Services", "Reporting"],
            },
            Self::Other(_) => return None,
        };
        Some(info)
    }
}

impl FromStr for Dialect {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dialect = match s.trim().to_lowercase().as_str() {
            "postgresql" | "postgres" | "pg" => Self::PostgreSql,
            "mysql" => Self::MySql,
            "oracle" => Self::Oracle,
            "sqlserver" | "mssql" | "tsql" => Self::SqlServer,
            _ => Self::Other(s.to_string()),
        };
        Ok(dialect)
    }
}

impl From<&str> for Dialect {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(dialect) => dialect,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Dialect {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Dialect {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Dialect::from(raw.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known() {
        assert_eq!(Dialect::from("postgresql"), Dialect::PostgreSql);
        assert_eq!(Dialect::from("MySQL"), Dialect::MySql);
        assert_eq!(Dialect::from("mssql"), Dialect::SqlServer);
        assert_eq!(Dialect::from("oracle").prompt_name(), "ORACLE");
    }

    #[test]
    fn test_unknown_passes_through() {
        let dialect = Dialect::from("DuckDB");
        assert_eq!(dialect, Dialect::Other("DuckDB".to_string()));
        assert_eq!(dialect.prompt_name(), "DuckDB");
        assert_eq!(dialect.as_str(), "DuckDB");
        assert!(dialect.info().is_none());
    }

    #[test]
    fn test_info() {
        for dialect in Dialect::supported() {
            assert!(dialect.is_known());
            assert!(!dialect.info().unwrap().features.is_empty());
        }
        assert_eq!(Dialect::SqlServer.info().unwrap().name, "SQL Server");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Dialect::SqlServer).unwrap();
        assert_eq!(json, "\"sqlserver\"");
        let back: Dialect = serde_json::from_str("\"snowflake\"").unwrap();
        assert_eq!(back.as_str(), "snowflake");
    }
}
