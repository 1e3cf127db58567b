//! HTTP count client for OpenSearch.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use notiq_core::{BackendQuery, CountBackend, Error, IndexKind, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::OpenSearchConfig;
use crate::error::{to_notiq_error, BackendErrorCode, OpenSearchErrorResponse};

#[derive(Serialize)]
struct CountRequest<'a> {
    query: &'a BackendQuery,
}

#[derive(Deserialize)]
struct CountResponse {
    count: u64,
}

/// [`CountBackend`] backed by the OpenSearch `_count` API.
pub struct OpenSearchCountClient {
    client: Client,
    config: OpenSearchConfig,
}

impl OpenSearchCountClient {
    /// Create a client with the given configuration.
    pub fn new(config: OpenSearchConfig) -> Result<Self> {
        let mut client_builder =
            Client::builder().timeout(Duration::from_secs(config.timeout_seconds));

        if config.skip_tls_verify {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            url = %config.base_url,
            uk_index = %config.uk_index,
            global_index = %config.global_index,
            "Initializing OpenSearch count client"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables. See [`OpenSearchConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::new(OpenSearchConfig::from_env())
    }

    pub fn config(&self) -> &OpenSearchConfig {
        &self.config
    }

    fn build_request(&self, index: IndexKind) -> reqwest::RequestBuilder {
        let req = self.client.post(self.config.count_url(index));
        match &self.config.username {
            Some(user) => req.basic_auth(user, self.config.password.as_ref()),
            None => req,
        }
    }
}

#[async_trait]
impl CountBackend for OpenSearchCountClient {
    #[instrument(skip(self, query), fields(
        subsystem = "backend",
        component = "opensearch",
        op = "count",
        index = index.as_str(),
    ))]
    async fn count(&self, query: &BackendQuery, index: IndexKind) -> Result<u64> {
        let start = Instant::now();

        let response = self
            .build_request(index)
            .json(&CountRequest { query })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenSearch count request failed");
                Error::Request(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body: OpenSearchErrorResponse = response.json().await.unwrap_or_default();
            let code = BackendErrorCode::from_response(status.as_u16(), &body.error.error_type);
            let message = if body.error.reason.is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                body.error.reason
            };
            warn!(
                http_status = status.as_u16(),
                ?code,
                error = %message,
                "OpenSearch rejected count"
            );
            return Err(to_notiq_error(code, &message));
        }

        let body: CountResponse = response.json().await.map_err(|e| {
            Error::Serialization(format!("Invalid count response: {}", e))
        })?;

        debug!(
            result_count = body.count,
            duration_ms = start.elapsed().as_millis() as u64,
            "OpenSearch count complete"
        );
        Ok(body.count)
    }

    fn name(&self) -> &str {
        "opensearch"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(CountRequest {
            query: &BackendQuery::MatchAll,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "query": { "match_all": {} } }));
    }

    #[test]
    fn test_new_with_defaults() {
        let client = OpenSearchCountClient::new(OpenSearchConfig::default()).unwrap();
        assert_eq!(client.name(), "opensearch");
        assert_eq!(client.config().uk_index, "docindex");
    }
}
