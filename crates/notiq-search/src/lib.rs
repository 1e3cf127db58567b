//! # notiq-search
//!
//! Query compilation and counting for notiq saved searches.
//!
//! This crate provides:
//! - Compilation of parsed query trees into backend boolean queries
//! - Structured filters (type, region, dates, value) for search specs
//! - A validated, single-use-per-dimension search builder
//! - Windowed (current / 1-year / 5-year) counts for saved searches
//!
//! ## Example
//!
//! ```ignore
//! use notiq_search::{SearchService, WindowedCounter};
//!
//! let service = SearchService::new(backend);
//! let count = service
//!     .use_index(IndexKind::Uk)
//!     .search_for("bridge AND (repair OR maintenance)")?
//!     .filter_by_type(&[NoticeType::Tender])?
//!     .count(&token)
//!     .await?;
//!
//! let searches = WindowedCounter::new(service)
//!     .populate_totals(saved_searches, &token)
//!     .await?;
//! ```

pub mod builder;
pub mod compiler;
pub mod mock;
pub mod service;
pub mod spec_filter;
pub mod windowed;

pub use builder::SearchBuilder;
pub use compiler::{CompilerConfig, QueryCompiler};
pub use service::{CompiledSearch, SearchService};
pub use spec_filter::{compile_filters, region_filter, type_filter};
pub use windowed::{CountWindow, WindowedCounter};
