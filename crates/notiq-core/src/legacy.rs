//! Decoding of saved searches stored in the legacy JSON format.
//!
//! Legacy rows hold a loosely-typed JSON blob whose property names vary in
//! case between writers. Decoding is lenient throughout: a blob that cannot
//! be read yields an empty payload, and unparseable dates or values are
//! treated as absent.

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::defaults::UNKNOWN_REGION;
use crate::models::{IndexKind, NoticeType, QueryFieldSet, SavedSearch, SearchSpec};

/// Date format used by legacy payloads.
pub const LEGACY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Earliest year a stored timestamp is considered real.
const MIN_VALID_YEAR: i32 = 1900;

// =============================================================================
// PAYLOAD
// =============================================================================

/// The JSON blob stored alongside a legacy saved search.
///
/// Field names are matched case-insensitively (`TypeInt`, `typeint` and
/// `typeInt` are the same property).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacySearchPayload {
    pub name: Option<String>,
    #[serde(rename = "orderby")]
    pub order_by: Option<String>,
    #[serde(rename = "mindate", deserialize_with = "lenient_legacy_date")]
    pub min_date: Option<NaiveDateTime>,
    #[serde(rename = "maxdate", deserialize_with = "lenient_legacy_date")]
    pub max_date: Option<NaiveDateTime>,
    #[serde(rename = "typeint")]
    pub type_int: Option<i32>,
    #[serde(rename = "minvaluestr")]
    pub min_value_str: Option<String>,
    #[serde(rename = "maxvaluestr")]
    pub max_value_str: Option<String>,
    pub query: Option<String>,
    pub nuts: Option<Vec<String>>,
    #[serde(rename = "shortfields")]
    pub short_fields: Option<Vec<String>>,
}

impl LegacySearchPayload {
    /// Parse a stored blob. Blank, invalid or mistyped JSON yields an empty
    /// payload.
    pub fn parse(search_json: Option<&str>) -> Self {
        let Some(raw) = search_json.filter(|s| !s.trim().is_empty()) else {
            return Self::default();
        };

        let value = match serde_json::from_str::<JsonValue>(raw) {
            Ok(JsonValue::Object(map)) => JsonValue::Object(lowercase_keys(map)),
            Ok(_) => return Self::default(),
            Err(e) => {
                debug!(error = %e, "Unreadable legacy search payload, using empty payload");
                return Self::default();
            }
        };

        serde_json::from_value(value).unwrap_or_else(|e| {
            debug!(error = %e, "Mistyped legacy search payload, using empty payload");
            Self::default()
        })
    }

    /// Rebuild a search spec from this payload.
    ///
    /// Date windows, ordering and page size are never restored; they are
    /// supplied per request.
    pub fn to_spec(&self) -> SearchSpec {
        let nuts = self.nuts.as_deref().unwrap_or_default();

        let query_field_set = self
            .query
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .map(|_| QueryFieldSet::Default);

        let types = self.type_int.and_then(|code| match NoticeType::from_code(code) {
            Some(NoticeType::Tender) => Some(vec![NoticeType::Tender, NoticeType::Pin]),
            Some(t) => Some(vec![t]),
            None => None,
        });

        let regions = (!nuts.is_empty()).then(|| legacy_regions(nuts));

        SearchSpec {
            index: IndexKind::for_regions(nuts),
            query: self.query.clone(),
            query_field_set,
            types,
            regions,
            value_min: parse_legacy_value(self.min_value_str.as_deref()),
            value_max: parse_legacy_value(self.max_value_str.as_deref()),
            ..Default::default()
        }
    }
}

fn lowercase_keys(map: Map<String, JsonValue>) -> Map<String, JsonValue> {
    map.into_iter()
        .map(|(k, v)| (k.to_ascii_lowercase(), v))
        .collect()
}

/// Strings in the legacy format parse; other strings become `None`.
/// Non-string values are a type error.
fn lenient_legacy_date<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| NaiveDateTime::parse_from_str(&s, LEGACY_DATE_FORMAT).ok()))
}

/// Non-blank region codes plus the unknown-region tag, deduplicated
/// case-insensitively.
fn legacy_regions(nuts: &[String]) -> Vec<String> {
    let mut regions: Vec<String> = Vec::with_capacity(nuts.len() + 1);
    let candidates = nuts
        .iter()
        .map(String::as_str)
        .filter(|r| !r.trim().is_empty())
        .chain(std::iter::once(UNKNOWN_REGION));
    for region in candidates {
        if !regions.iter().any(|r| r.eq_ignore_ascii_case(region)) {
            regions.push(region.to_string());
        }
    }
    regions
}

/// Parse a stored monetary bound. Blank and the sentinel `max` mean no bound.
pub fn parse_legacy_value(raw: Option<&str>) -> Option<f64> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("max") {
        return None;
    }
    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, ',' | '£' | '$' | '€'))
        .collect();
    cleaned.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// =============================================================================
// RECORD
// =============================================================================

/// A saved-search row as stored by the legacy application.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LegacySavedSearchRecord {
    pub id: i64,
    pub member_id: i64,
    pub search_json: Option<String>,
    pub search_name: Option<String>,
    pub alert: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub insert_time: Option<DateTime<Utc>>,
}

impl LegacySavedSearchRecord {
    /// Decode into a saved search. Totals are left unset.
    pub fn to_saved_search(&self) -> SavedSearch {
        let payload = LegacySearchPayload::parse(self.search_json.as_deref());

        let name = self
            .search_name
            .clone()
            .or_else(|| payload.name.clone())
            .unwrap_or_default();

        SavedSearch {
            id: self.id,
            member_id: self.member_id,
            name,
            alert: self.alert,
            last_run: normalize_timestamp(self.last_run),
            created_at: normalize_timestamp(self.insert_time),
            spec: payload.to_spec(),
            totals: None,
        }
    }
}

/// Placeholder timestamps (year before 1900) mean "never".
fn normalize_timestamp(ts: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    ts.filter(|t| t.year() >= MIN_VALID_YEAR)
}
