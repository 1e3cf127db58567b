//! Domain models: search specifications, notice types, and saved searches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::defaults::{DEFAULT_TEXT_FIELDS, GLOBAL_REGIONS};

// =============================================================================
// ENUMERATIONS
// =============================================================================

/// Which backend index a search targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// The single UK notice index.
    #[default]
    Uk,
    /// Every regional index (wildcard).
    Global,
}

impl IndexKind {
    /// Derive the index from region codes: any `eu` or `os` code (any case)
    /// selects the global index, everything else stays on the UK index.
    /// Codes are compared as stored, so padded codes such as `" eu"` do not
    /// count.
    pub fn for_regions<S: AsRef<str>>(regions: &[S]) -> Self {
        let global = regions.iter().any(|r| {
            GLOBAL_REGIONS
                .iter()
                .any(|g| g.eq_ignore_ascii_case(r.as_ref()))
        });
        if global {
            Self::Global
        } else {
            Self::Uk
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uk => "uk",
            Self::Global => "global",
        }
    }
}

/// Notice type, with the integer codes stored in legacy payloads and in the
/// backend's `typeint` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeType {
    /// Prior information notice.
    Pin,
    Tender,
    Award,
}

impl NoticeType {
    pub fn code(&self) -> i32 {
        match self {
            Self::Pin => 1,
            Self::Tender => 2,
            Self::Award => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Pin),
            2 => Some(Self::Tender),
            3 => Some(Self::Award),
            _ => None,
        }
    }

    /// Expand a type list for the backend filter.
    ///
    /// Tenders and PINs were never distinguished to end users, so a list
    /// containing `Tender` also matches `Pin`. Order is preserved and
    /// duplicates removed.
    pub fn expand_for_filter(types: &[NoticeType]) -> Vec<NoticeType> {
        let mut expanded: Vec<NoticeType> = Vec::with_capacity(types.len() + 1);
        for t in types {
            if !expanded.contains(t) {
                expanded.push(*t);
            }
        }
        if expanded.contains(&Self::Tender) && !expanded.contains(&Self::Pin) {
            expanded.push(Self::Pin);
        }
        expanded
    }
}

/// Text fields that a query may be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    Summary,
    RefTitleShort,
    Publisher,
    AwardedToFirstLines,
    CpvDesc,
    CpvCodes,
    Location,
}

impl SearchField {
    /// Backend field name.
    pub fn backend_field(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::RefTitleShort => "reftitleshort",
            Self::Publisher => "publisher",
            Self::AwardedToFirstLines => "awardedtofirstlines",
            Self::CpvDesc => "cpvdesc",
            Self::CpvCodes => "cpvcodes",
            Self::Location => "location",
        }
    }
}

/// Named bundle of default text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueryFieldSet {
    #[default]
    Default,
}

impl QueryFieldSet {
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::Default => DEFAULT_TEXT_FIELDS,
        }
    }
}

/// Result ordering requested by a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultOrder {
    PublishedDateDesc,
}

// =============================================================================
// SEARCH SPEC
// =============================================================================

/// Complete, backend-independent description of one search.
///
/// Specs are values: variants (for example the date windows of a saved
/// search) are derived with the `with_*` methods, which return a new spec.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchSpec {
    pub index: IndexKind,

    /// Free-text query in the saved-search query language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    /// Named field bundle for the query. Ignored when `query_fields` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_field_set: Option<QueryFieldSet>,

    /// Explicit field list for the query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_fields: Option<Vec<SearchField>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<NoticeType>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<String>>,

    /// Inclusive lower bound on the publication date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_from_utc: Option<DateTime<Utc>>,

    /// Inclusive upper bound on the publication date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_to_utc: Option<DateTime<Utc>>,

    /// Only notices closing on or after this instant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_on_or_after_utc: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_min: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_max: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<ResultOrder>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl SearchSpec {
    /// Empty spec (matches everything) on the given index.
    pub fn new(index: IndexKind) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    /// Backend fields a text query is matched against.
    ///
    /// An explicit, non-empty field list wins over the named set; with
    /// neither, the default set applies.
    pub fn text_fields(&self) -> Vec<&'static str> {
        match &self.query_fields {
            Some(fields) if !fields.is_empty() => {
                fields.iter().map(SearchField::backend_field).collect()
            }
            _ => self
                .query_field_set
                .unwrap_or_default()
                .fields()
                .to_vec(),
        }
    }

    /// Query text, if present and not blank.
    pub fn query_text(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.trim().is_empty())
    }

    /// True when the type filter only admits tenders (and the PINs that
    /// travel with them).
    pub fn is_tender_only(&self) -> bool {
        match &self.types {
            Some(types) if !types.is_empty() => {
                types.contains(&NoticeType::Tender)
                    && types
                        .iter()
                        .all(|t| matches!(t, NoticeType::Tender | NoticeType::Pin))
            }
            _ => false,
        }
    }

    /// Derive a spec with the publication window replaced.
    pub fn with_published_window(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            published_from_utc: from,
            published_to_utc: to,
            ..self.clone()
        }
    }

    /// Derive a spec with the closing-date floor replaced.
    pub fn with_closing_floor(&self, floor: Option<DateTime<Utc>>) -> Self {
        Self {
            closing_on_or_after_utc: floor,
            ..self.clone()
        }
    }
}

// =============================================================================
// SAVED SEARCHES
// =============================================================================

/// Result counts for the three date windows of a saved search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowedTotals {
    pub current: u64,
    pub last_year: u64,
    pub five_year: u64,
}

/// A member's saved search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSearch {
    pub id: i64,
    pub member_id: i64,
    pub name: String,
    pub alert: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub spec: SearchSpec,
    /// Recomputed on every read, never persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totals: Option<WindowedTotals>,
}

impl SavedSearch {
    /// Return this saved search with totals attached.
    pub fn with_totals(self, totals: WindowedTotals) -> Self {
        Self {
            totals: Some(totals),
            ..self
        }
    }
}
