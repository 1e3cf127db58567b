//! # notiq-opensearch
//!
//! OpenSearch implementation of the notiq [`CountBackend`](notiq_core::CountBackend).
//!
//! Compiled queries are sent to the index's `_count` endpoint; the UK and
//! global index names are configurable.

pub mod client;
pub mod config;
pub mod error;

pub use client::OpenSearchCountClient;
pub use config::OpenSearchConfig;
pub use error::BackendErrorCode;
