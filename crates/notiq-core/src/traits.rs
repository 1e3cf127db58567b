//! Core traits for notiq abstractions.
//!
//! The search backend is an external collaborator; these traits are the
//! seam that concrete clients (and test doubles) implement.

use async_trait::async_trait;

use crate::backend_query::BackendQuery;
use crate::error::Result;
use crate::models::IndexKind;

// =============================================================================
// SEARCH BACKEND TRAITS
// =============================================================================

/// Backend able to count documents matching a compiled query.
#[async_trait]
pub trait CountBackend: Send + Sync {
    /// Count documents in `index` matching `query`.
    ///
    /// Failures are returned as errors and must never be reported as a
    /// zero count.
    async fn count(&self, query: &BackendQuery, index: IndexKind) -> Result<u64>;

    /// Short backend name used in log fields.
    fn name(&self) -> &str {
        "backend"
    }
}
