//! # notiq-core
//!
//! Core types, traits, and the saved-search query language for notiq.
//!
//! This crate provides the foundational data structures and trait definitions
//! that the search and backend crates depend on. Everything here is pure and
//! synchronous except the [`CountBackend`] trait.

pub mod backend_query;
pub mod defaults;
pub mod error;
pub mod field_selector;
pub mod legacy;
pub mod logging;
pub mod models;
pub mod query;
pub mod temporal;
pub mod traits;

// Re-export commonly used types
pub use backend_query::{BackendQuery, BoolQuery, MatchType, MultiMatchQuery, RangeValue, TermsValues};
pub use error::{Error, Result};
pub use field_selector::{map_short_code, resolve_fields, FIELD_SELECTORS};
pub use legacy::{LegacySavedSearchRecord, LegacySearchPayload};
pub use models::*;
pub use query::{parse, Expression, ParsedQuery, TermExpression, Token, TokenKind};
pub use temporal::PublishedRange;
pub use traits::*;
