//! Structured (non-text) filters of a search spec.
//!
//! Each dimension contributes one filter clause when present. Clauses are
//! emitted in a fixed order so that a spec always compiles to the same query.

use notiq_core::defaults::{
    FIELD_CLOSING_DATE, FIELD_NOTICE_TYPE, FIELD_PUBLISHED_DATE, FIELD_REGION, FIELD_VALUE,
    UNKNOWN_REGION,
};
use notiq_core::{BackendQuery, NoticeType, RangeValue, SearchSpec, TermsValues};

/// Compile every structured dimension of `spec` into filter clauses.
pub fn compile_filters(spec: &SearchSpec) -> Vec<BackendQuery> {
    let mut filters = Vec::new();

    if spec.published_from_utc.is_some() || spec.published_to_utc.is_some() {
        filters.push(BackendQuery::Range {
            field: FIELD_PUBLISHED_DATE.to_string(),
            gte: spec.published_from_utc.map(RangeValue::Date),
            lte: spec.published_to_utc.map(RangeValue::Date),
        });
    }

    if let Some(floor) = spec.closing_on_or_after_utc {
        filters.push(BackendQuery::Range {
            field: FIELD_CLOSING_DATE.to_string(),
            gte: Some(RangeValue::Date(floor)),
            lte: None,
        });
    }

    if let Some(types) = spec.types.as_deref().filter(|t| !t.is_empty()) {
        filters.push(type_filter(types));
    }

    if let Some(regions) = spec.regions.as_deref().filter(|r| !r.is_empty()) {
        filters.push(region_filter(regions));
    }

    if spec.value_min.is_some() || spec.value_max.is_some() {
        filters.push(BackendQuery::Range {
            field: FIELD_VALUE.to_string(),
            gte: spec.value_min.map(RangeValue::Number),
            lte: spec.value_max.map(RangeValue::Number),
        });
    }

    filters
}

/// Notice-type membership. Tenders always bring PINs along.
pub fn type_filter(types: &[NoticeType]) -> BackendQuery {
    let codes = NoticeType::expand_for_filter(types)
        .iter()
        .map(|t| i64::from(t.code()))
        .collect();
    BackendQuery::Terms {
        field: FIELD_NOTICE_TYPE.to_string(),
        values: TermsValues::Integers(codes),
    }
}

/// Region membership. Notices without a region code carry the unknown tag,
/// which is always admitted.
pub fn region_filter<S: AsRef<str>>(regions: &[S]) -> BackendQuery {
    let mut codes: Vec<String> = Vec::with_capacity(regions.len() + 1);
    let candidates = regions
        .iter()
        .map(|r| r.as_ref().trim())
        .filter(|r| !r.is_empty())
        .chain(std::iter::once(UNKNOWN_REGION));
    for code in candidates {
        if !codes.iter().any(|c| c.eq_ignore_ascii_case(code)) {
            codes.push(code.to_string());
        }
    }
    BackendQuery::Terms {
        field: FIELD_REGION.to_string(),
        values: TermsValues::Keywords(codes),
    }
}
