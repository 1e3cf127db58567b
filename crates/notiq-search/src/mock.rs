//! Mock count backend for deterministic testing.
//!
//! Records every count request and answers with a fixed count, a
//! per-request responder, or a failure.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use notiq_search::mock::MockCountBackend;
//! use notiq_search::SearchService;
//!
//! let backend = Arc::new(MockCountBackend::new().with_count(42));
//! let _service = SearchService::new(backend.clone());
//! assert_eq!(backend.call_count(), 0);
//! ```

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use notiq_core::{BackendQuery, CountBackend, Error, IndexKind, Result};

type Responder = dyn Fn(&BackendQuery, IndexKind) -> Result<u64> + Send + Sync;

/// Mock count backend for testing.
#[derive(Clone)]
pub struct MockCountBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Clone, Default)]
struct MockConfig {
    count: u64,
    responder: Option<Arc<Responder>>,
    failure: Option<String>,
    latency_ms: u64,
}

/// One recorded count request.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub query: BackendQuery,
    pub index: IndexKind,
    pub timestamp: std::time::Instant,
}

impl Default for MockCountBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCountBackend {
    /// Create a mock that answers every request with zero.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer every request with `count`.
    pub fn with_count(mut self, count: u64) -> Self {
        Arc::make_mut(&mut self.config).count = count;
        self
    }

    /// Answer each request by calling `responder`. Takes precedence over
    /// [`with_count`](Self::with_count).
    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&BackendQuery, IndexKind) -> Result<u64> + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.config).responder = Some(Arc::new(responder));
        self
    }

    /// Fail every request with a backend error.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).failure = Some(message.into());
        self
    }

    /// Delay every response.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        Arc::make_mut(&mut self.config).latency_ms = latency_ms;
        self
    }

    /// Get all logged calls for assertion.
    pub fn calls(&self) -> Vec<MockCall> {
        self.log().clone()
    }

    pub fn call_count(&self) -> usize {
        self.log().len()
    }

    pub fn clear_calls(&self) {
        self.log().clear()
    }

    fn log(&self) -> MutexGuard<'_, Vec<MockCall>> {
        self.call_log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl CountBackend for MockCountBackend {
    async fn count(&self, query: &BackendQuery, index: IndexKind) -> Result<u64> {
        self.log().push(MockCall {
            query: query.clone(),
            index,
            timestamp: std::time::Instant::now(),
        });

        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }

        if let Some(message) = &self.config.failure {
            return Err(Error::Backend(message.clone()));
        }
        match &self.config.responder {
            Some(responder) => responder(query, index),
            None => Ok(self.config.count),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
