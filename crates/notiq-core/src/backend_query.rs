//! Backend-native boolean query model.
//!
//! A [`BackendQuery`] is what the compiler produces and what a
//! [`CountBackend`](crate::traits::CountBackend) executes. It renders to the
//! OpenSearch query DSL through [`BackendQuery::to_json`], which is also its
//! `Serialize` form. Rendering is deterministic: the same query always
//! produces byte-identical JSON.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value as JsonValue};

/// How a multi-field match treats its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    /// Exact phrase.
    Phrase,
    /// Phrase whose last word is a prefix.
    PhrasePrefix,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phrase => "phrase",
            Self::PhrasePrefix => "phrase_prefix",
        }
    }
}

/// Text match over several fields.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiMatchQuery {
    pub query: String,
    pub fields: Vec<String>,
    pub analyzer: String,
    pub match_type: MatchType,
    /// Cap on prefix expansions; only set for prefix matches.
    pub max_expansions: Option<u32>,
}

/// Boolean combination of sub-queries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoolQuery {
    /// Every clause must match (scored).
    pub must: Vec<BackendQuery>,
    /// At least one clause must match.
    pub should: Vec<BackendQuery>,
    /// No clause may match.
    pub must_not: Vec<BackendQuery>,
    /// Every clause must match (unscored).
    pub filter: Vec<BackendQuery>,
}

/// Values of a terms (set membership) query.
#[derive(Debug, Clone, PartialEq)]
pub enum TermsValues {
    Integers(Vec<i64>),
    Keywords(Vec<String>),
}

/// One side of a range query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeValue {
    Date(DateTime<Utc>),
    Number(f64),
}

impl RangeValue {
    fn to_json(self) -> JsonValue {
        match self {
            Self::Date(dt) => JsonValue::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Number(n) => json!(n),
        }
    }
}

/// Compiled backend query.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendQuery {
    MatchAll,
    Bool(BoolQuery),
    MultiMatch(MultiMatchQuery),
    Terms {
        field: String,
        values: TermsValues,
    },
    /// Inclusive range; a missing side is open.
    Range {
        field: String,
        gte: Option<RangeValue>,
        lte: Option<RangeValue>,
    },
}

impl BackendQuery {
    /// Both operands must match.
    pub fn all_of(left: BackendQuery, right: BackendQuery) -> Self {
        Self::Bool(BoolQuery {
            must: vec![left, right],
            ..Default::default()
        })
    }

    /// At least one operand must match.
    pub fn any_of(left: BackendQuery, right: BackendQuery) -> Self {
        Self::Bool(BoolQuery {
            should: vec![left, right],
            ..Default::default()
        })
    }

    /// The operand must not match.
    pub fn none_of(operand: BackendQuery) -> Self {
        Self::Bool(BoolQuery {
            must_not: vec![operand],
            ..Default::default()
        })
    }

    /// Conjoin an optional text query with structured filters.
    ///
    /// With nothing to apply the result is `match_all`. Otherwise the text
    /// query goes in `must` and the filters in `filter`.
    pub fn conjoin(text: Option<BackendQuery>, filters: Vec<BackendQuery>) -> Self {
        if text.is_none() && filters.is_empty() {
            return Self::MatchAll;
        }
        Self::Bool(BoolQuery {
            must: text.into_iter().collect(),
            filter: filters,
            ..Default::default()
        })
    }

    /// Render as OpenSearch query DSL.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::MatchAll => json!({ "match_all": {} }),
            Self::Bool(b) => {
                let mut body = Map::new();
                for (key, clauses) in [
                    ("must", &b.must),
                    ("should", &b.should),
                    ("must_not", &b.must_not),
                    ("filter", &b.filter),
                ] {
                    if !clauses.is_empty() {
                        body.insert(
                            key.to_string(),
                            JsonValue::Array(clauses.iter().map(Self::to_json).collect()),
                        );
                    }
                }
                json!({ "bool": body })
            }
            Self::MultiMatch(m) => {
                let mut body = Map::new();
                body.insert("query".to_string(), json!(m.query));
                body.insert("fields".to_string(), json!(m.fields));
                body.insert("analyzer".to_string(), json!(m.analyzer));
                body.insert("type".to_string(), json!(m.match_type.as_str()));
                if let Some(max) = m.max_expansions {
                    body.insert("max_expansions".to_string(), json!(max));
                }
                json!({ "multi_match": body })
            }
            Self::Terms { field, values } => {
                let values = match values {
                    TermsValues::Integers(v) => json!(v),
                    TermsValues::Keywords(v) => json!(v),
                };
                let mut body = Map::new();
                body.insert(field.clone(), values);
                json!({ "terms": body })
            }
            Self::Range { field, gte, lte } => {
                let mut bounds = Map::new();
                if let Some(v) = gte {
                    bounds.insert("gte".to_string(), v.to_json());
                }
                if let Some(v) = lte {
                    bounds.insert("lte".to_string(), v.to_json());
                }
                let mut body = Map::new();
                body.insert(field.clone(), JsonValue::Object(bounds));
                json!({ "range": body })
            }
        }
    }
}

impl Serialize for BackendQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn phrase(text: &str) -> BackendQuery {
        BackendQuery::MultiMatch(MultiMatchQuery {
            query: text.to_string(),
            fields: vec!["summary".to_string()],
            analyzer: "std".to_string(),
            match_type: MatchType::Phrase,
            max_expansions: None,
        })
    }

    #[test]
    fn test_match_all_json() {
        assert_eq!(BackendQuery::MatchAll.to_json(), json!({ "match_all": {} }));
    }

    #[test]
    fn test_multi_match_json() {
        let q = BackendQuery::MultiMatch(MultiMatchQuery {
            query: "bri".to_string(),
            fields: vec!["summary".to_string(), "publisher".to_string()],
            analyzer: "my_analyzer2".to_string(),
            match_type: MatchType::PhrasePrefix,
            max_expansions: Some(200),
        });
        assert_eq!(
            q.to_json(),
            json!({
                "multi_match": {
                    "query": "bri",
                    "fields": ["summary", "publisher"],
                    "analyzer": "my_analyzer2",
                    "type": "phrase_prefix",
                    "max_expansions": 200
                }
            })
        );
    }

    #[test]
    fn test_bool_omits_empty_clauses() {
        let q = BackendQuery::none_of(phrase("a"));
        let json = q.to_json();
        assert!(json["bool"].get("must").is_none());
        assert_eq!(json["bool"]["must_not"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_terms_json() {
        let q = BackendQuery::Terms {
            field: "typeint".to_string(),
            values: TermsValues::Integers(vec![2, 1]),
        };
        assert_eq!(q.to_json(), json!({ "terms": { "typeint": [2, 1] } }));
    }

    #[test]
    fn test_range_json_dates_and_open_side() {
        let from = Utc.with_ymd_and_hms(2025, 10, 19, 12, 0, 0).unwrap();
        let q = BackendQuery::Range {
            field: "publisheddate".to_string(),
            gte: Some(RangeValue::Date(from)),
            lte: None,
        };
        assert_eq!(
            q.to_json(),
            json!({ "range": { "publisheddate": { "gte": "2025-10-19T12:00:00.000Z" } } })
        );
    }

    #[test]
    fn test_conjoin() {
        assert_eq!(BackendQuery::conjoin(None, vec![]), BackendQuery::MatchAll);

        let q = BackendQuery::conjoin(Some(phrase("a")), vec![phrase("b")]);
        let json = q.to_json();
        assert_eq!(json["bool"]["must"].as_array().unwrap().len(), 1);
        assert_eq!(json["bool"]["filter"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_serialize_matches_to_json() {
        let q = BackendQuery::all_of(phrase("a"), phrase("b"));
        assert_eq!(serde_json::to_value(&q).unwrap(), q.to_json());
    }
}
