//! OpenSearch-specific error handling.

use notiq_core::Error;
use serde::Deserialize;

/// Classified OpenSearch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorCode {
    /// Missing or rejected credentials.
    Unauthorized,
    /// The target index does not exist.
    IndexNotFound,
    /// The cluster rejected the query body.
    BadQuery,
    /// Too many requests or search queue full.
    Throttled,
    /// Cluster-side failure.
    ServerError,
    Unknown,
}

impl BackendErrorCode {
    /// Determine the code from HTTP status and the OpenSearch error type.
    pub fn from_response(status: u16, error_type: &str) -> Self {
        match (status, error_type) {
            (401 | 403, _) => Self::Unauthorized,
            (404, _) | (_, "index_not_found_exception") => Self::IndexNotFound,
            (429, _) | (_, "es_rejected_execution_exception") => Self::Throttled,
            (400, _) => Self::BadQuery,
            (500..=599, _) => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Whether a caller-side retry could succeed. This crate never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Throttled | Self::ServerError)
    }
}

/// Error body returned by OpenSearch.
#[derive(Debug, Default, Deserialize)]
pub struct OpenSearchErrorResponse {
    #[serde(default)]
    pub error: OpenSearchError,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenSearchError {
    #[serde(rename = "type", default)]
    pub error_type: String,
    #[serde(default)]
    pub reason: String,
}

/// Convert a classified failure to a notiq error.
pub fn to_notiq_error(code: BackendErrorCode, message: &str) -> Error {
    match code {
        BackendErrorCode::Unauthorized => {
            Error::Config(format!("OpenSearch authentication failed: {}", message))
        }
        BackendErrorCode::IndexNotFound => {
            Error::Config(format!("OpenSearch index not found: {}", message))
        }
        BackendErrorCode::BadQuery => Error::Backend(format!("Query rejected: {}", message)),
        BackendErrorCode::Throttled => Error::Backend(format!("Throttled: {}", message)),
        BackendErrorCode::ServerError => Error::Backend(format!("Server error: {}", message)),
        BackendErrorCode::Unknown => Error::Backend(message.to_string()),
    }
}
