//! Windowed counter behaviour against the mock backend.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use notiq_core::{
    BackendQuery, Error, IndexKind, NoticeType, SavedSearch, SearchSpec, WindowedTotals,
};
use notiq_search::mock::MockCountBackend;
use notiq_search::{CountWindow, SearchService, WindowedCounter};
use serde_json::Value as JsonValue;
use tokio_util::sync::CancellationToken;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 14, 30, 0).unwrap()
}

/// Range bound on `field` inside the query's filter clauses.
fn filter_bound(query: &BackendQuery, field: &str, side: &str) -> Option<String> {
    let json = query.to_json();
    json["bool"]["filter"]
        .as_array()?
        .iter()
        .find_map(|clause| clause["range"][field][side].as_str().map(String::from))
}

/// Answers 11 / 22 / 33 for the current / one-year / five-year windows.
fn window_responder(query: &BackendQuery, _index: IndexKind) -> notiq_core::Result<u64> {
    match filter_bound(query, "publisheddate", "gte").as_deref() {
        None => Ok(11),
        Some("2025-10-19T14:30:00.000Z") => Ok(22),
        Some("2021-10-19T14:30:00.000Z") => Ok(33),
        Some(other) => Err(Error::Internal(format!("unexpected window start {other}"))),
    }
}

fn counter(backend: &Arc<MockCountBackend>) -> WindowedCounter {
    WindowedCounter::new(SearchService::new(backend.clone()))
}

fn tender_spec() -> SearchSpec {
    SearchSpec {
        query: Some("bridge repair".to_string()),
        types: Some(vec![NoticeType::Tender]),
        regions: Some(vec!["fr".to_string()]),
        ..SearchSpec::new(IndexKind::Uk)
    }
}

#[tokio::test]
async fn test_three_requests_with_expected_windows() {
    let backend = Arc::new(MockCountBackend::new().with_responder(window_responder));
    let totals = counter(&backend)
        .counts_at(&tender_spec(), now(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        totals,
        WindowedTotals {
            current: 11,
            last_year: 22,
            five_year: 33,
        }
    );

    let calls = backend.calls();
    assert_eq!(calls.len(), 3);

    let mut windows: Vec<(Option<String>, Option<String>, Option<String>)> = calls
        .iter()
        .map(|c| {
            (
                filter_bound(&c.query, "publisheddate", "gte"),
                filter_bound(&c.query, "publisheddate", "lte"),
                filter_bound(&c.query, "closingdate", "gte"),
            )
        })
        .collect();
    windows.sort();

    assert_eq!(
        windows,
        vec![
            (None, None, Some("2026-10-19T00:00:00.000Z".to_string())),
            (
                Some("2021-10-19T14:30:00.000Z".to_string()),
                Some("2026-10-19T14:30:00.000Z".to_string()),
                None
            ),
            (
                Some("2025-10-19T14:30:00.000Z".to_string()),
                Some("2026-10-19T14:30:00.000Z".to_string()),
                None
            ),
        ]
    );
    assert!(calls.iter().all(|c| c.index == IndexKind::Uk));
}

#[tokio::test]
async fn test_no_closing_floor_without_tender_filter() {
    let backend = Arc::new(MockCountBackend::new().with_count(4));
    let spec = SearchSpec {
        types: Some(vec![NoticeType::Award]),
        ..SearchSpec::new(IndexKind::Global)
    };

    counter(&backend)
        .counts_at(&spec, now(), &CancellationToken::new())
        .await
        .unwrap();

    let calls = backend.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls
        .iter()
        .all(|c| filter_bound(&c.query, "closingdate", "gte").is_none()));
    assert!(calls.iter().all(|c| c.index == IndexKind::Global));
}

#[tokio::test]
async fn test_backend_failure_fails_whole_operation() {
    let backend = Arc::new(MockCountBackend::new().with_failure("cluster red"));
    let result = counter(&backend)
        .counts_at(&tender_spec(), now(), &CancellationToken::new())
        .await;
    assert!(matches!(result, Err(Error::Backend(ref m)) if m == "cluster red"));
}

#[tokio::test]
async fn test_single_window_failure_fails_whole_operation() {
    let backend = Arc::new(MockCountBackend::new().with_responder(|query, index| {
        match filter_bound(query, "publisheddate", "gte").as_deref() {
            Some("2025-10-19T14:30:00.000Z") => Err(Error::Backend("shard timeout".to_string())),
            _ => window_responder(query, index),
        }
    }));

    let result = counter(&backend)
        .counts_at(&tender_spec(), now(), &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(Error::Backend(ref m)) if m == "shard timeout"));
    assert_eq!(backend.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_aborts_in_flight_counts() {
    let backend = Arc::new(MockCountBackend::new().with_count(1).with_latency_ms(10_000));
    let token = CancellationToken::new();

    let canceller = {
        let token = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            token.cancel();
        })
    };

    let result = counter(&backend).counts_at(&tender_spec(), now(), &token).await;
    canceller.await.unwrap();

    assert!(matches!(result, Err(Error::Cancelled)));
    assert_eq!(backend.call_count(), 3);
}

#[test]
fn test_current_window_compiles_deterministically() {
    let service = SearchService::new(Arc::new(MockCountBackend::new()));
    let spec = tender_spec();

    let first = service.compile(&CountWindow::Current.derive_spec(&spec, now()));
    let second = service.compile(&CountWindow::Current.derive_spec(&spec, now()));

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_current_window_query_shape() {
    let service = SearchService::new(Arc::new(MockCountBackend::new()));
    let compiled = service.compile(&CountWindow::Current.derive_spec(&tender_spec(), now()));
    let json: JsonValue = compiled.query.to_json();

    let must = json["bool"]["must"].as_array().unwrap();
    assert_eq!(must.len(), 1);
    assert_eq!(must[0]["bool"]["should"].as_array().unwrap().len(), 2);

    let filter = json["bool"]["filter"].as_array().unwrap();
    assert_eq!(filter[1]["terms"]["typeint"], serde_json::json!([2, 1]));
    assert_eq!(filter[2]["terms"]["nuts"], serde_json::json!(["fr", "u"]));
}

#[tokio::test]
async fn test_populate_totals_for_batch() {
    let backend = Arc::new(MockCountBackend::new().with_responder(|_, index| {
        Ok(match index {
            IndexKind::Uk => 5,
            IndexKind::Global => 9,
        })
    }));

    let saved = |id: i64, index: IndexKind| SavedSearch {
        id,
        member_id: 1,
        name: format!("search {id}"),
        alert: false,
        last_run: None,
        created_at: None,
        spec: SearchSpec::new(index),
        totals: None,
    };

    let searches = counter(&backend)
        .populate_totals(
            vec![saved(1, IndexKind::Uk), saved(2, IndexKind::Global)],
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(backend.call_count(), 6);
    assert_eq!(searches[0].id, 1);
    assert_eq!(
        searches[0].totals,
        Some(WindowedTotals {
            current: 5,
            last_year: 5,
            five_year: 5,
        })
    );
    assert_eq!(searches[1].id, 2);
    assert_eq!(searches[1].totals.map(|t| t.five_year), Some(9));
}

#[tokio::test]
async fn test_populate_totals_failure_returns_error() {
    let backend = Arc::new(MockCountBackend::new().with_failure("timeout"));
    let saved = SavedSearch {
        id: 1,
        member_id: 1,
        name: String::new(),
        alert: true,
        last_run: None,
        created_at: None,
        spec: tender_spec(),
        totals: None,
    };

    let result = counter(&backend)
        .populate_totals(vec![saved], &CancellationToken::new())
        .await;
    assert!(result.is_err());
}

/// Years spanned by the query's publication window, if it has one.
fn window_years(query: &BackendQuery) -> Option<i32> {
    let parse = |side: &str| {
        filter_bound(query, "publisheddate", side)
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
    };
    Some(parse("lte")?.year() - parse("gte")?.year())
}

#[tokio::test]
async fn test_populate_totals_one_failing_window_in_batch() {
    // Only the global search's one-year window fails.
    let backend = Arc::new(MockCountBackend::new().with_responder(|query, index| {
        match (index, window_years(query)) {
            (IndexKind::Global, Some(1)) => Err(Error::Backend("shard timeout".to_string())),
            _ => Ok(7),
        }
    }));

    let saved = |id: i64, index: IndexKind| SavedSearch {
        id,
        member_id: 1,
        name: format!("search {id}"),
        alert: false,
        last_run: None,
        created_at: None,
        spec: SearchSpec::new(index),
        totals: None,
    };

    let result = counter(&backend)
        .populate_totals(
            vec![saved(1, IndexKind::Uk), saved(2, IndexKind::Global)],
            &CancellationToken::new(),
        )
        .await;

    assert!(matches!(result, Err(Error::Backend(ref m)) if m == "shard timeout"));
}

#[test]
fn test_long_word_list_compiles_and_renders() {
    let service = SearchService::new(Arc::new(MockCountBackend::new()));
    let spec = SearchSpec {
        query: Some(vec!["bridge"; 5_000].join(" ")),
        ..SearchSpec::new(IndexKind::Uk)
    };

    let json = service.compile(&spec).query.to_json();
    let should = json["bool"]["must"][0]["bool"]["should"].as_array().unwrap();
    assert_eq!(should.len(), 5_000);
    assert_eq!(should[4_999]["multi_match"]["query"], "bridge");
}

#[tokio::test]
async fn test_populate_totals_empty_batch() {
    let backend = Arc::new(MockCountBackend::new());
    let searches = counter(&backend)
        .populate_totals(Vec::new(), &CancellationToken::new())
        .await
        .unwrap();
    assert!(searches.is_empty());
    assert_eq!(backend.call_count(), 0);
}
