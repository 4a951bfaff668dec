//! # Core Error Types
//!
//! The vertical checks themselves are total boolean functions and never
//! fail; the only error surface in this library is configuration parsing.

use thiserror::Error;

/// Errors that can occur while loading check configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("malformed configuration document: {0}")]
    Parse(String),

    /// A parsed value is outside its legal range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type CoreResult<T> = Result<T, ConfigError>;
