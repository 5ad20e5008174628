//! Router tests for the lookup API.
//!
//! The store is filled from in-memory fixtures, so no network is involved.

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use ingestion::{IngestConfig, Ingester, LookupStore};
use serde_json::Value;
use tower::ServiceExt;
use zhvi_api::{create_router, AppState};

use test_utils::MONTHLY_CSV;

const STATIC_MARKER: &str = "<title>zhvi test page</title>";

fn static_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("index.html"), STATIC_MARKER).expect("write index");
    std::fs::write(dir.path().join("app.js"), "console.log('ok');").expect("write asset");
    dir
}

async fn loaded_state() -> Arc<AppState> {
    let store = LookupStore::new();
    let ingester = Ingester::new(&IngestConfig::default(), store.clone()).expect("ingester");
    let state = Arc::new(AppState::new(store, ingester.source_url()));
    let outcome = ingester.ingest_reader(MONTHLY_CSV.as_bytes()).await;
    assert!(outcome.is_loaded());
    state.record_outcome(outcome).await;
    state
}

fn router(state: Arc<AppState>, dir: &Path) -> Router {
    create_router(state, dir)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).expect("json body"))
}

#[tokio::test]
async fn data_returns_numeric_series() {
    let dir = static_dir();
    let app = router(loaded_state().await, dir.path());

    let (status, json) = get_json(app, "/api/data/90210").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["zipCode"], "90210");
    let data = json["data"].as_object().expect("data object");
    assert_eq!(data.len(), 2);
    assert!(data["2020-01-31"].is_i64());
    assert_eq!(data["2020-01-31"].as_f64(), Some(500000.0));
    assert_eq!(data["2020-02-29"].as_f64(), Some(510000.0));
}

#[tokio::test]
async fn short_zip_is_zero_padded() {
    let dir = static_dir();
    let state = loaded_state().await;

    let (short_status, short) = get_json(router(state.clone(), dir.path()), "/api/data/501").await;
    let (full_status, full) = get_json(router(state, dir.path()), "/api/data/00501").await;

    assert_eq!(short_status, StatusCode::OK);
    assert_eq!(full_status, StatusCode::OK);
    assert_eq!(short, full);
    assert_eq!(short["zipCode"], "00501");
    assert!(short["data"].get("2020-01-31").is_none());
}

#[tokio::test]
async fn unknown_zip_is_not_found() {
    let dir = static_dir();
    let app = router(loaded_state().await, dir.path());

    let (status, json) = get_json(app, "/api/data/99999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let message = json["error"].as_str().expect("error message");
    assert!(message.contains("99999"), "message was {message}");
}

#[tokio::test]
async fn placeholder_and_empty_rows_are_not_served() {
    let dir = static_dir();
    let state = loaded_state().await;

    let (status, _) = get_json(router(state.clone(), dir.path()), "/api/data/00000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_json(router(state, dir.path()), "/api/data/10001").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_zip_is_not_found() {
    let dir = static_dir();
    let app = router(loaded_state().await, dir.path());

    let (status, json) = get_json(app, "/api/data/abc").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("abc"));
}

#[tokio::test]
async fn lookups_before_ingestion_are_not_found() {
    let dir = static_dir();
    let state = Arc::new(AppState::new(LookupStore::new(), "http://localhost/none.csv"));

    let (status, json) = get_json(router(state.clone(), dir.path()), "/api/data/90210").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("90210"));

    let (_, status_json) = get_json(router(state, dir.path()), "/api/status").await;
    assert_eq!(status_json["state"], "loading");
    assert_eq!(status_json["regions"], 0);
}

#[tokio::test]
async fn summary_reports_location_and_range() {
    let dir = static_dir();
    let app = router(loaded_state().await, dir.path());

    let (status, json) = get_json(app, "/api/data/90210/summary").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["zipCode"], "90210");
    assert_eq!(json["location"], "Beverly Hills, CA");
    assert_eq!(json["metadata"]["countyName"], "Los Angeles County");
    assert_eq!(json["points"], 2);
    assert_eq!(json["first"]["date"], "2020-01-31");
    assert_eq!(json["max"]["date"], "2020-02-29");
    assert_eq!(json["max"]["value"].as_f64(), Some(510000.0));
}

#[tokio::test]
async fn status_reports_loaded_run() {
    let dir = static_dir();
    let app = router(loaded_state().await, dir.path());

    let (status, json) = get_json(app, "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "ready");
    assert_eq!(json["regions"], 2);
    assert_eq!(json["last_run"]["outcome"]["state"], "loaded");
    assert_eq!(json["last_run"]["outcome"]["stats"]["skipped_placeholder"], 1);
}

#[tokio::test]
async fn health_is_ok() {
    let dir = static_dir();
    let app = router(loaded_state().await, dir.path());

    let (status, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn metrics_without_exporter_is_not_found() {
    let dir = static_dir();
    let app = router(loaded_state().await, dir.path());

    let (status, _) = get(app, "/metrics").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn root_serves_static_page() {
    let dir = static_dir();
    let state = loaded_state().await;

    let (status, body) = get(router(state.clone(), dir.path()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), STATIC_MARKER);

    let (status, body) = get(router(state.clone(), dir.path()), "/app.js").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("console.log"));

    let (status, _) = get(router(state, dir.path()), "/missing.css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
