//! Structured logging schema and field name constants for notiq.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation can query by the same names across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Backend failure surfaced to the caller |
//! | INFO  | Batch completions (saved-search totals) |
//! | DEBUG | Decision points: parse degradation, compiled index, per-window counts |
//! | TRACE | Token streams and compiled query bodies |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "query", "search", "backend"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "parser", "compiler", "windowed_counter", "opensearch"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "parse", "count", "counts", "populate_totals"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Saved search id being counted.
pub const SAVED_SEARCH_ID: &str = "saved_search_id";

/// Member owning the saved search.
pub const MEMBER_ID: &str = "member_id";

/// Raw query text.
pub const QUERY: &str = "query";

/// Index target ("uk", "global").
pub const INDEX: &str = "index";

/// Date window variant ("current", "last_year", "five_year").
pub const WINDOW: &str = "window";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Count returned by the search backend.
pub const RESULT_COUNT: &str = "result_count";

/// Number of tokens produced by the tokenizer (after implicit ORs).
pub const TOKEN_COUNT: &str = "token_count";

/// Number of saved searches in a batch.
pub const BATCH_SIZE: &str = "batch_size";

// ─── Backend fields ────────────────────────────────────────────────────────

/// HTTP status returned by the search backend.
pub const HTTP_STATUS: &str = "http_status";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
