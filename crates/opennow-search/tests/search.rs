//! End-to-end tests for `ProximitySearch::search` against a mocked Overpass
//! mirror.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use opennow_core::{Coordinate, OpenStatus};
use opennow_overpass::{FetchError, MirrorClient, RetryPolicy};
use opennow_search::{
    FixedTimezone, ProximitySearch, SearchError, SearchRequest, SearchSettings,
    UNNAMED_PLACEHOLDER,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INTERPRETER: &str = "/api/interpreter";
const CENTER: Coordinate = Coordinate::new(37.5663, 126.9779);

/// Wednesday 2026-10-14, 10:00 in Seoul.
fn wednesday_morning() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2026, 10, 14)
        .unwrap()
        .and_hms_opt(1, 0, 0)
        .unwrap()
        .and_utc()
}

fn test_search(server: &MockServer, max_attempts: u32) -> ProximitySearch<FixedTimezone> {
    let policy = RetryPolicy {
        max_attempts,
        backoff_base: 2.0,
        backoff_unit: Duration::from_millis(1),
        max_delay: None,
    };
    let endpoint = format!("{}{INTERPRETER}", server.uri());
    let client = MirrorClient::new(&[endpoint], "opennow-test/0.1", policy)
        .expect("failed to build test MirrorClient");
    ProximitySearch::new(
        client,
        FixedTimezone(chrono_tz::Asia::Seoul),
        SearchSettings::default(),
    )
}

fn request(radius_m: u32, open_only: bool) -> SearchRequest {
    SearchRequest {
        center: CENTER,
        radius_m,
        open_only,
    }
}

fn empty_body() -> serde_json::Value {
    json!({ "elements": [] })
}

/// A mix of open, closed, unknown and unplaceable elements.
fn mixed_body() -> serde_json::Value {
    json!({
        "elements": [
            {
                "type": "node", "id": 1, "lat": 37.5700, "lon": 126.9779,
                "tags": { "name": "Far Open", "opening_hours": "Mo-Fr 09:00-18:00" }
            },
            {
                "type": "node", "id": 2, "lat": 37.5665, "lon": 126.9779,
                "tags": { "name": "Near Closed", "opening_hours": "Mo-Su 20:00-23:00" }
            },
            {
                "type": "way", "id": 3, "center": { "lat": 37.5670, "lon": 126.9779 },
                "tags": { "alt_name": "Unknown Hours", "contact:phone": "02-123-4567" }
            },
            {
                "type": "node", "id": 4, "lat": 37.5668, "lon": 126.9779,
                "tags": { "opening_hours": "24/7" }
            },
            {
                "type": "relation", "id": 5,
                "tags": { "name": "No Center" }
            }
        ]
    })
}

#[tokio::test]
async fn empty_result_widens_once_then_succeeds_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INTERPRETER))
        .and(body_string_contains("around%3A1200%2C"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(INTERPRETER))
        .and(body_string_contains("around%3A2000%2C"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_body()))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_search(&server, 3)
        .search(&request(1200, false), wednesday_morning())
        .await
        .expect("empty result is not an error");

    assert!(outcome.pois.is_empty());
    assert!(outcome.widened);
    assert_eq!(outcome.radius_m, 2000);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn widened_query_results_are_returned() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("around%3A1200%2C"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("around%3A2000%2C"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mixed_body()))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_search(&server, 3)
        .search(&request(1200, false), wednesday_morning())
        .await
        .unwrap();

    assert!(outcome.widened);
    assert_eq!(outcome.pois.len(), 4);
}

#[tokio::test]
async fn no_widening_when_results_exist() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INTERPRETER))
        .respond_with(ResponseTemplate::new(200).set_body_json(mixed_body()))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_search(&server, 3)
        .search(&request(1200, false), wednesday_morning())
        .await
        .unwrap();

    assert!(!outcome.widened);
    assert_eq!(outcome.radius_m, 1200);
}

#[tokio::test]
async fn no_widening_at_max_radius() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INTERPRETER))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_body()))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_search(&server, 3)
        .search(&request(3000, false), wednesday_morning())
        .await
        .unwrap();

    assert!(outcome.pois.is_empty());
    assert!(!outcome.widened);
    assert_eq!(outcome.radius_m, 3000);
}

#[tokio::test]
async fn results_are_normalized_and_ordered() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INTERPRETER))
        .respond_with(ResponseTemplate::new(200).set_body_json(mixed_body()))
        .mount(&server)
        .await;

    let outcome = test_search(&server, 3)
        .search(&request(1200, false), wednesday_morning())
        .await
        .unwrap();

    assert_eq!(outcome.fetched, 5);
    assert_eq!(outcome.dropped, 1);
    assert_eq!(outcome.filtered_out, 0);

    let summary: Vec<(&str, OpenStatus)> = outcome
        .pois
        .iter()
        .map(|p| (p.name.as_str(), p.status))
        .collect();
    assert_eq!(
        summary,
        [
            (UNNAMED_PLACEHOLDER, OpenStatus::Open),
            ("Far Open", OpenStatus::Open),
            ("Unknown Hours", OpenStatus::Unknown),
            ("Near Closed", OpenStatus::Closed),
        ]
    );

    let unknown = &outcome.pois[2];
    assert_eq!(unknown.phone.as_deref(), Some("02-123-4567"));
    assert_eq!(unknown.position, Coordinate::new(37.5670, 126.9779));
    assert_eq!(unknown.timezone, "Asia/Seoul");
}

#[tokio::test]
async fn half_centroid_element_is_dropped_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INTERPRETER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "elements": [
                {
                    "type": "node", "id": 1, "lat": 37.5668, "lon": 126.9779,
                    "tags": { "name": "Good Node", "opening_hours": "24/7" }
                },
                {
                    "type": "way", "id": 2, "center": { "lat": 37.5 },
                    "tags": { "name": "Half Centroid" }
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_search(&server, 3)
        .search(&request(1200, false), wednesday_morning())
        .await
        .expect("one bad element must not fail the search");

    assert_eq!(outcome.pois.len(), 1);
    assert_eq!(outcome.pois[0].name, "Good Node");
    assert_eq!(outcome.fetched, 2);
    assert_eq!(outcome.dropped, 1);
    assert!(!outcome.widened);
}

#[tokio::test]
async fn open_only_filters_after_evaluation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INTERPRETER))
        .respond_with(ResponseTemplate::new(200).set_body_json(mixed_body()))
        .mount(&server)
        .await;

    let outcome = test_search(&server, 3)
        .search(&request(1200, true), wednesday_morning())
        .await
        .unwrap();

    assert_eq!(outcome.pois.len(), 2);
    assert!(outcome.pois.iter().all(|p| p.status == OpenStatus::Open));
    assert_eq!(outcome.filtered_out, 2);
    assert_eq!(outcome.fetched, 5);
}

#[tokio::test]
async fn fatal_fetch_error_fails_the_search() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INTERPRETER))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_search(&server, 6)
        .search(&request(1200, false), wednesday_morning())
        .await
        .expect_err("403 must fail the search");

    assert!(
        matches!(err, SearchError::Fetch(FetchError::Fatal { .. })),
        "got {err:?}"
    );
}

#[tokio::test]
async fn exhausted_retries_fail_the_search() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INTERPRETER))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&server)
        .await;

    let err = test_search(&server, 2)
        .search(&request(1200, false), wednesday_morning())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SearchError::Fetch(FetchError::Transient { attempts: 2, .. })
    ));
}

#[tokio::test]
async fn invalid_input_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_body()))
        .expect(0)
        .mount(&server)
        .await;
    let search = test_search(&server, 3);

    let bad_center = SearchRequest {
        center: Coordinate::new(91.0, 0.0),
        radius_m: 1200,
        open_only: false,
    };
    assert!(matches!(
        search.search(&bad_center, wednesday_morning()).await,
        Err(SearchError::InvalidCenter(_))
    ));
    assert!(matches!(
        search.search(&request(0, false), wednesday_morning()).await,
        Err(SearchError::ZeroRadius)
    ));
}
