//! Export of generated queries.
//!
//! - `.sql` files with a comment header describing how the query was produced
//! - a JSONL history log with one generation result per line

use crate::llm::GenerationResult;
use crate::types::{GeneratorError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

const MAX_NAME_ATTEMPTS: usize = 1000;

/// One line of the JSONL history log.
#[derive(Debug, Serialize)]
struct HistoryEntry<'a> {
    question: &'a str,
    timestamp: DateTime<Utc>,
    #[serde(flatten)]
    result: &'a GenerationResult,
}

/// Writes generated SQL to files under a directory.
pub struct QueryExporter {
    dir: PathBuf,
    sequence: AtomicUsize,
}

impl QueryExporter {
    /// Create an exporter writing into `dir` (created on first export).
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            sequence: AtomicUsize::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a successful result to `query_<timestamp>_<n>.sql`.
    ///
    /// # Arguments
    ///
    /// * `question` - Question the SQL answers
    /// * `result` - Generation result
    ///
    /// # Returns
    ///
    /// Path of the written file
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::ExportError` for failed results or sentinel
    /// SQL, and `GeneratorError::IoError` if writing fails
    pub fn export_sql(&self, question: &str, result: &GenerationResult) -> Result<PathBuf> {
        let query = result.query().ok_or_else(|| {
            GeneratorError::ExportError("Cannot export a failed generation".to_string())
        })?;
        if !query.looks_like_sql {
            return Err(GeneratorError::ExportError(
                "Generated text is not a SQL query".to_string(),
            ));
        }

        fs::create_dir_all(&self.dir)?;

        let now = Utc::now();
        let mut content = String::new();
        content.push_str("-- SQL RAG export\n");
        content.push_str(&format!("-- Question: {}\n", single_line(question)));
        content.push_str(&format!("-- Dialect: {}\n", result.dialect));
        content.push_str(&format!("-- Confidence: {}\n", query.confidence));
        content.push_str(&format!("-- Tables: {}\n", result.relevant_tables.join(", ")));
        content.push_str(&format!("-- Generated: {}\n\n", now.format("%Y-%m-%d %H:%M:%S UTC")));
        content.push_str(&query.sql_query);
        content.push('\n');

        let (path, mut file) = self.create_unique(&now)?;
        file.write_all(content.as_bytes())?;
        tracing::info!(path = %path.display(), "Query exported");
        Ok(path)
    }

    // Existing files are skipped, never replaced.
    fn create_unique(&self, now: &DateTime<Utc>) -> Result<(PathBuf, File)> {
        let stamp = now.format("%Y%m%d_%H%M%S");
        for _ in 0..MAX_NAME_ATTEMPTS {
            let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
            let path = self.dir.join(format!("query_{}_{}.sql", stamp, seq));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(GeneratorError::ExportError(format!(
            "No free export file name in {}",
            self.dir.display()
        )))
    }
}

/// Append a result to a JSONL history file, creating it if needed.
///
/// # Errors
///
/// Returns `GeneratorError::IoError` if the file cannot be written
pub fn append_jsonl<P: AsRef<Path>>(path: P, question: &str, result: &GenerationResult) -> Result<()> {
    let entry = HistoryEntry {
        question,
        timestamp: Utc::now(),
        result,
    };
    let line = serde_json::to_string(&entry)?;

    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path.as_ref())?;
    writeln!(file, "{}", line)?;
    Ok(())
}

// Keeps multi-line questions inside the `--` comment.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{parse_response, Dialect};
    use tempfile::tempdir;

    fn success() -> GenerationResult {
        GenerationResult::generated(
            parse_response("```sql\nSELECT * FROM accounts;\n```\nCONFIDENCE: high"),
            vec!["accounts".to_string()],
            Dialect::PostgreSql,
        )
    }

    #[test]
    fn test_export_sql_header() {
        let dir = tempdir().unwrap();
        let exporter = QueryExporter::new(dir.path().join("exports"));

        let path = exporter.export_sql("List\nall accounts", &success()).unwrap();
        let content = fs::read_to_string(&path).unwrap();

        assert!(path.extension().is_some_and(|e| e == "sql"));
        assert!(content.starts_with("-- SQL RAG export\n"));
        assert!(content.contains("-- Question: List all accounts\n"));
        assert!(content.contains("-- Dialect: postgresql\n"));
        assert!(content.contains("-- Confidence: high\n"));
        assert!(content.ends_with("\nSELECT * FROM accounts;\n"));
    }

    #[test]
    fn test_exports_do_not_collide() {
        let dir = tempdir().unwrap();
        let exporter = QueryExporter::new(dir.path());
        let a = exporter.export_sql("q", &success()).unwrap();
        let b = exporter.export_sql("q", &success()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_exporters_sharing_dir_keep_both_files() {
        let dir = tempdir().unwrap();
        let first = QueryExporter::new(dir.path());
        let second = QueryExporter::new(dir.path());

        let a = first.export_sql("first question", &success()).unwrap();
        let b = second.export_sql("second question", &success()).unwrap();

        assert_ne!(a, b);
        assert!(fs::read_to_string(&a).unwrap().contains("-- Question: first question\n"));
        assert!(fs::read_to_string(&b).unwrap().contains("-- Question: second question\n"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_refuses_failed_and_sentinel() {
        let dir = tempdir().unwrap();
        let exporter = QueryExporter::new(dir.path());

        let failed = GenerationResult::failed("boom", vec![], Dialect::PostgreSql);
        assert!(matches!(
            exporter.export_sql("q", &failed),
            Err(GeneratorError::ExportError(_))
        ));

        let sentinel = GenerationResult::generated(parse_response("no sql"), vec![], Dialect::PostgreSql);
        assert!(exporter.export_sql("q", &sentinel).is_err());
    }

    #[test]
    fn test_append_jsonl() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history").join("queries.jsonl");

        append_jsonl(&path, "first", &success()).unwrap();
        append_jsonl(&path, "second", &GenerationResult::failed("boom", vec![], Dialect::MySql)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["question"], "first");
        assert_eq!(lines[0]["sql_query"], "SELECT * FROM accounts;");
        assert_eq!(lines[1]["success"], false);
        assert_eq!(lines[1]["dialect"], "mysql");
    }
}
