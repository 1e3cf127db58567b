//! Search service: compiles specs and counts them against a backend.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use notiq_core::{parse, BackendQuery, CountBackend, Error, IndexKind, Result, SearchSpec};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace};

use crate::builder::SearchBuilder;
use crate::compiler::{CompilerConfig, QueryCompiler};
use crate::spec_filter::compile_filters;

/// A spec compiled for a specific backend index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledSearch {
    pub index: IndexKind,
    pub query: BackendQuery,
}

/// Entry point for first-class searches.
#[derive(Clone)]
pub struct SearchService {
    backend: Arc<dyn CountBackend>,
    compiler: QueryCompiler,
}

impl fmt::Debug for SearchService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchService")
            .field("backend", &self.backend.name())
            .field("compiler", &self.compiler)
            .finish()
    }
}

impl SearchService {
    pub fn new(backend: Arc<dyn CountBackend>) -> Self {
        Self::with_config(backend, CompilerConfig::default())
    }

    pub fn with_config(backend: Arc<dyn CountBackend>, config: CompilerConfig) -> Self {
        Self {
            backend,
            compiler: QueryCompiler::new(config),
        }
    }

    /// Start building a search against `index`.
    pub fn use_index(&self, index: IndexKind) -> SearchBuilder {
        SearchBuilder::with_service(self.clone(), index)
    }

    /// Compile a spec into its backend query.
    ///
    /// The text query (if it parses) goes in `must`, structured filters in
    /// `filter`. A spec with neither compiles to `match_all`.
    pub fn compile(&self, spec: &SearchSpec) -> CompiledSearch {
        let fields = spec.text_fields();
        let text = spec
            .query_text()
            .and_then(|text| self.compiler.compile_parsed(&parse(text), fields.as_slice()));

        let query = BackendQuery::conjoin(text, compile_filters(spec));
        trace!(index = spec.index.as_str(), query = %query.to_json(), "Compiled search");

        CompiledSearch {
            index: spec.index,
            query,
        }
    }

    /// Count the documents matching `spec`.
    ///
    /// Returns [`Error::Cancelled`] if `token` fires first.
    #[instrument(skip(self, spec, token), fields(
        subsystem = "search",
        component = "search_service",
        op = "count",
        index = spec.index.as_str(),
    ))]
    pub async fn count(&self, spec: &SearchSpec, token: &CancellationToken) -> Result<u64> {
        let start = Instant::now();
        let compiled = self.compile(spec);
        let count = count_or_cancel(self.backend.as_ref(), &compiled, token).await?;
        debug!(
            result_count = count,
            duration_ms = start.elapsed().as_millis() as u64,
            "Count complete"
        );
        Ok(count)
    }

    pub(crate) fn backend(&self) -> &dyn CountBackend {
        self.backend.as_ref()
    }
}

/// Run one backend count, aborting when `token` is cancelled.
pub(crate) async fn count_or_cancel(
    backend: &dyn CountBackend,
    compiled: &CompiledSearch,
    token: &CancellationToken,
) -> Result<u64> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(Error::Cancelled),
        result = backend.count(&compiled.query, compiled.index) => result,
    }
}
