//! Error types for cachedash-core

use thiserror::Error;

/// Main error type for the cachedash-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Timestamp could not be parsed as an instant
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// Status value outside the declared vocabulary (strict policy only)
    #[error("unknown {kind} status: {value:?}")]
    UnknownStatus { kind: &'static str, value: String },

    /// Form input rejected by a validator
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for cachedash-core
pub type Result<T> = std::result::Result<T, Error>;
