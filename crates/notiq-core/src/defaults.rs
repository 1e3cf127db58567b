//! Centralized default constants for notiq.
//!
//! **This module is the single source of truth** for backend field names,
//! index names and compiler tuning. Crates reference these constants instead
//! of repeating string literals.

// =============================================================================
// BACKEND FIELDS
// =============================================================================

/// Publication date of a notice.
pub const FIELD_PUBLISHED_DATE: &str = "publisheddate";

/// Closing (deadline) date of a notice.
pub const FIELD_CLOSING_DATE: &str = "closingdate";

/// Integer notice type code.
pub const FIELD_NOTICE_TYPE: &str = "typeint";

/// Region (NUTS) codes attached to a notice.
pub const FIELD_REGION: &str = "nuts";

/// Upper monetary value of a notice.
pub const FIELD_VALUE: &str = "valuemax";

/// Text fields searched when a query names no explicit field set.
pub const DEFAULT_TEXT_FIELDS: &[&str] = &[
    "summary",
    "reftitleshort",
    "publisher",
    "awardedtofirstlines",
    "cpvdesc",
    "cpvcodes",
    "location",
];

// =============================================================================
// REGIONS
// =============================================================================

/// Region tag carried by notices without a NUTS code.
pub const UNKNOWN_REGION: &str = "u";

/// Region codes that route a search to the global index.
pub const GLOBAL_REGIONS: &[&str] = &["eu", "os"];

// =============================================================================
// QUERY COMPILER
// =============================================================================

/// Analyzer applied to every multi-field text match.
pub const ANALYZER: &str = "my_analyzer2";

/// Upper bound on prefix expansions for unquoted terms.
pub const MAX_EXPANSIONS: u32 = 200;

// =============================================================================
// SEARCH BACKEND
// =============================================================================

/// Default OpenSearch endpoint.
pub const OPENSEARCH_URL: &str = "http://localhost:9200";

/// Index holding UK notices.
pub const UK_INDEX: &str = "docindex";

/// Wildcard pattern spanning every regional index.
pub const GLOBAL_INDEX: &str = "docindex*";

/// Count request timeout in seconds.
pub const BACKEND_TIMEOUT_SECS: u64 = 10;
