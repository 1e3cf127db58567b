//! Error types for notiq.

use thiserror::Error;

/// Result type alias using notiq's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for notiq operations.
///
/// Malformed query text is deliberately absent from this enum: a query that
/// cannot be parsed produces a `ParsedQuery` without an expression tree.
#[derive(Error, Debug)]
pub enum Error {
    /// A required argument was missing or out of range
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A search builder dimension was configured twice
    #[error("{0} can only be called once")]
    DimensionAlreadySet(&'static str),

    /// The search backend rejected or failed a request
    #[error("Backend error: {0}")]
    Backend(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The caller cancelled the operation before it completed
    #[error("Operation cancelled")]
    Cancelled,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
