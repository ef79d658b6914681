//! Router tests: request parsing, wire shape, and error mapping.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use tabletally::adapter::{router, INVALID_IDS_MESSAGE};
use tabletally::cache::PlayerCountCache;
use tabletally::domain::{PlayerCounts, TtlPolicy};
use tabletally::error::Error;
use tabletally::pipeline::LookupPipeline;
use tabletally::testkit::{record, FixedClock, ManualPacer, ScriptedFetcher};
use tower::ServiceExt;

fn test_router() -> (axum::Router, Arc<ScriptedFetcher>) {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap(),
    ));
    let cache = Arc::new(PlayerCountCache::new(100, clock.clone()));
    let fetcher = Arc::new(ScriptedFetcher::new());
    let pipeline = Arc::new(LookupPipeline::new(
        cache,
        fetcher.clone(),
        Arc::new(ManualPacer::new()),
        clock,
        TtlPolicy::default(),
        20,
    ));
    (router(pipeline), fetcher)
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn malformed_id_list_is_rejected_with_fixed_message() {
    let (app, fetcher) = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/boardgames/1,a")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_bytes(response).await, INVALID_IDS_MESSAGE.as_bytes());
    // rejected before any upstream interaction
    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test]
async fn aggregated_route_returns_wire_shape() {
    let (app, fetcher) = test_router();
    fetcher.push_records(vec![record(174430, &[3], &[2, 3, 4], "2017")]);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/boardgames/174430")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_bytes(response).await;
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(&body).unwrap(),
        serde_json::json!([
            {"id": "174430", "bestWith": [3], "recommendedWith": [2, 3, 4]}
        ])
    );
}

#[tokio::test]
async fn stream_route_emits_one_json_object_per_line() {
    let (app, fetcher) = test_router();
    fetcher.push_records(vec![
        record(1, &[2], &[1, 2], "2020"),
        record(2, &[4], &[3, 4], "2021"),
    ]);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/boardgames/1,2/stream")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/x-ndjson"
    );

    let body = body_bytes(response).await;
    let lines: Vec<PlayerCounts> = body
        .split(|byte| *byte == b'\n')
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_slice(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].id.value(), 1);
    assert_eq!(lines[1].id.value(), 2);
}

#[tokio::test]
async fn upstream_failure_maps_to_bad_gateway() {
    let (app, fetcher) = test_router();
    fetcher.push_error(Error::UpstreamStatus(503));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/boardgames/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
