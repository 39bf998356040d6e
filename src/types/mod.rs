//! Core types for SQL generation.

pub mod error;

pub use error::{GeneratorError, Result};
