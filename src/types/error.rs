//! Error types for SQL generation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeneratorError>;

#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Schema catalog missing, malformed or inconsistent
    #[error("Catalog error: {0}")]
    CatalogError(String),

    /// Invalid configuration value or missing API key
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Completion request failed (transport, status, body, timeout)
    #[error("LLM error: {0}")]
    LlmError(String),

    /// Result cannot be exported
    #[error("Export error: {0}")]
    ExportError(String),

    /// File system error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parse error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GeneratorError::LlmError("connection reset".to_string());
        assert_eq!(err.to_string(), "LLM error: connection reset");

        let err = GeneratorError::CatalogError("Duplicate table 'accounts'".to_string());
        assert_eq!(err.to_string(), "Catalog error: Duplicate table 'accounts'");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: GeneratorError = io.into();
        assert!(matches!(err, GeneratorError::IoError(_)));
        assert!(err.to_string().starts_with("IO error:"));
    }
}
