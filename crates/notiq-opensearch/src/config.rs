//! Connection settings for the OpenSearch backend.

use std::env;

use notiq_core::defaults;
use notiq_core::IndexKind;

/// Configuration for the OpenSearch count client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenSearchConfig {
    /// Base URL of the cluster, without a trailing index path.
    pub base_url: String,
    /// Basic-auth user (optional for unsecured clusters).
    pub username: Option<String>,
    pub password: Option<String>,
    /// Index queried for UK searches.
    pub uk_index: String,
    /// Index pattern queried for global searches.
    pub global_index: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Skip TLS verification (for self-signed certs in local environments).
    pub skip_tls_verify: bool,
}

impl Default for OpenSearchConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::OPENSEARCH_URL.to_string(),
            username: None,
            password: None,
            uk_index: defaults::UK_INDEX.to_string(),
            global_index: defaults::GLOBAL_INDEX.to_string(),
            timeout_seconds: defaults::BACKEND_TIMEOUT_SECS,
            skip_tls_verify: false,
        }
    }
}

impl OpenSearchConfig {
    /// Create from environment variables.
    ///
    /// - `NOTIQ_OPENSEARCH_URL`
    /// - `NOTIQ_OPENSEARCH_USERNAME` / `NOTIQ_OPENSEARCH_PASSWORD`
    /// - `NOTIQ_OPENSEARCH_UK_INDEX` / `NOTIQ_OPENSEARCH_GLOBAL_INDEX`
    /// - `NOTIQ_OPENSEARCH_TIMEOUT` (seconds)
    /// - `NOTIQ_OPENSEARCH_SKIP_TLS_VERIFY` ("1" or "true")
    pub fn from_env() -> Self {
        let base = Self::default();
        Self {
            base_url: env::var("NOTIQ_OPENSEARCH_URL").unwrap_or(base.base_url),
            username: env::var("NOTIQ_OPENSEARCH_USERNAME").ok(),
            password: env::var("NOTIQ_OPENSEARCH_PASSWORD").ok(),
            uk_index: env::var("NOTIQ_OPENSEARCH_UK_INDEX").unwrap_or(base.uk_index),
            global_index: env::var("NOTIQ_OPENSEARCH_GLOBAL_INDEX").unwrap_or(base.global_index),
            timeout_seconds: env::var("NOTIQ_OPENSEARCH_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(base.timeout_seconds),
            skip_tls_verify: env::var("NOTIQ_OPENSEARCH_SKIP_TLS_VERIFY")
                .map(|v| v == "1" || v.to_lowercase() == "true")
                .unwrap_or(false),
        }
    }

    /// Index name for an index target.
    pub fn index_name(&self, index: IndexKind) -> &str {
        match index {
            IndexKind::Uk => &self.uk_index,
            IndexKind::Global => &self.global_index,
        }
    }

    /// `_count` endpoint URL for an index target.
    pub fn count_url(&self, index: IndexKind) -> String {
        format!(
            "{}/{}/_count",
            self.base_url.trim_end_matches('/'),
            self.index_name(index)
        )
    }
}
