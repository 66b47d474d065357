//! Result and error types for Gedmark.

use thiserror::Error;

/// Result type for Gedmark operations
pub type MarkerResult<T> = Result<T, MarkerError>;

/// Errors that can occur in Gedmark
#[derive(Debug, Error)]
pub enum MarkerError {
    /// Bulk override requested with a fingerprint that no longer matches
    #[error("Fingerprint mismatch at {path}: accessors have changed, not marking all")]
    FingerprintMismatch {
        /// Display path of the branch
        path: String,
        /// Fingerprint computed from the current catalog
        expected: String,
        /// Fingerprint supplied by the caller
        provided: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Report serialization error
    #[error("Report serialization failed: {message}")]
    ReportSerialization {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl MarkerError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
