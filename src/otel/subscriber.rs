//! Subscriber installation.

use crate::types::{GeneratorError, Result};
use tracing_subscriber::EnvFilter;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Install a global fmt subscriber.
///
/// Filtering comes from `RUST_LOG`, defaulting to `info`. Returns `Ok(false)`
/// if a global subscriber was already installed.
///
/// # Errors
///
/// Returns `GeneratorError::ConfigError` if `RUST_LOG` is set but invalid
pub fn init_tracing(format: LogFormat) -> Result<bool> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) => EnvFilter::try_new(directives)
            .map_err(|e| GeneratorError::ConfigError(format!("Invalid RUST_LOG: {}", e)))?,
        Err(_) => EnvFilter::new("info"),
    };

    let installed = match format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
            .is_ok(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .try_init()
            .is_ok(),
    };

    if installed {
        tracing::info!(format = ?format, "Logging initialized");
    }
    Ok(installed)
}
