//! Integration tests for chordbot-api HTTP endpoints
//!
//! Tests cover:
//! - Health endpoint
//! - Front-end page
//! - Prediction via POST body and GET query
//! - Metrics recorded per request, including the fallback error path

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

use chordbot_api::chord::{ChordResolver, ChordTable, PREDICT_ENDPOINT};
use chordbot_api::inference::{InferenceClient, InferenceError};
use chordbot_api::metrics::{metrics_routes, PrometheusMetrics, RequestStatus};
use chordbot_api::{build_router, AppState};

/// Test helper: inference double with a fixed reply
struct FixedInference {
    reply: Result<String, InferenceError>,
    calls: AtomicUsize,
}

#[async_trait]
impl InferenceClient for FixedInference {
    async fn complete(&self, _notes: &[String]) -> Result<String, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}

struct TestApp {
    router: axum::Router,
    metrics: Arc<PrometheusMetrics>,
    inference: Arc<FixedInference>,
}

/// Test helper: build the app around a fixed inference reply
fn setup_app(reply: Result<String, InferenceError>) -> TestApp {
    let metrics = Arc::new(PrometheusMetrics::new("chord-bot-test").unwrap());
    let inference = Arc::new(FixedInference {
        reply,
        calls: AtomicUsize::new(0),
    });
    let resolver = ChordResolver::new(
        Arc::new(ChordTable::standard()),
        inference.clone(),
        metrics.clone(),
    );
    let state = AppState::new(Arc::new(resolver), "chord-bot-test");

    TestApp {
        router: build_router(state),
        metrics,
        inference,
    }
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = body.collect().await.expect("Should read body").to_bytes();
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// =============================================================================
// Health / UI
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app(Ok("unused".to_string()));

    let response = app.router.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "chordbot-api");
    assert_eq!(body["service"], "chord-bot-test");
    assert!(body["version"].is_string());
    assert!(body["uptime_seconds"].is_number());
}

#[tokio::test]
async fn test_root_serves_html() {
    let app = setup_app(Ok("unused".to_string()));

    let response = app.router.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("text/html"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Enter notes, e.g., C,E,G"));
}

// =============================================================================
// Prediction
// =============================================================================

#[tokio::test]
async fn test_post_table_match() {
    let app = setup_app(Ok("unused".to_string()));

    let response = app
        .router
        .oneshot(post_json("/api/predict", json!({ "notes": "c, e , g" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["result"], "C Major");
    assert_eq!(body["outcome"], "matched");

    assert_eq!(app.inference.calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        app.metrics.requests_total(PREDICT_ENDPOINT, RequestStatus::Success),
        1
    );
    assert_eq!(app.metrics.chord_predictions(PREDICT_ENDPOINT, "C Major"), 1);
}

#[tokio::test]
async fn test_get_query_uses_fallback_for_superset() {
    let app = setup_app(Ok(" Cmaj7 ".to_string()));

    let response = app
        .router
        .oneshot(get("/api/predict?notes=C,E,G,B"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["result"], "Cmaj7");
    assert_eq!(body["outcome"], "unrecognized");
    assert_eq!(app.inference.calls.load(Ordering::SeqCst), 1);
    // Free-text labels are counted too
    assert_eq!(app.metrics.chord_predictions(PREDICT_ENDPOINT, "Cmaj7"), 1);
}

#[tokio::test]
async fn test_invalid_input_returns_guidance() {
    let app = setup_app(Ok("unused".to_string()));

    let response = app
        .router
        .clone()
        .oneshot(post_json("/api/predict", json!({ "notes": "   " })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["result"], "Please enter 2 or more notes.");
    assert_eq!(body["outcome"], "invalid_input");

    let response = app
        .router
        .oneshot(post_json("/api/predict", json!({ "notes": "C" })))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["result"], "Please enter at least 2 notes.");

    assert_eq!(app.metrics.invalid_requests(PREDICT_ENDPOINT), 2);
    assert_eq!(
        app.metrics
            .requests_total(PREDICT_ENDPOINT, RequestStatus::InvalidInput),
        2
    );
}

#[tokio::test]
async fn test_missing_notes_query_is_empty_input() {
    let app = setup_app(Ok("unused".to_string()));

    let response = app.router.oneshot(get("/api/predict")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["outcome"], "invalid_input");
}

#[tokio::test]
async fn test_inference_failure_is_reported_and_counted() {
    let app = setup_app(Err(InferenceError::Network(
        "dns lookup failed".to_string(),
    )));

    let response = app
        .router
        .oneshot(post_json("/api/predict", json!({ "notes": "C,D,E" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["outcome"], "error");
    assert_eq!(
        body["result"],
        "Error calling inference API: Network error: dns lookup failed"
    );

    assert_eq!(
        app.metrics.requests_total(PREDICT_ENDPOINT, RequestStatus::Error),
        1
    );
    assert_eq!(app.metrics.latency_observations(PREDICT_ENDPOINT), 1);
    assert_eq!(app.metrics.active_requests(PREDICT_ENDPOINT), 0);
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let app = setup_app(Ok("unused".to_string()));

    let request = Request::builder()
        .method("POST")
        .uri("/api/predict")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    // Rejected before resolution: nothing recorded
    assert_eq!(app.metrics.latency_observations(PREDICT_ENDPOINT), 0);
}

// =============================================================================
// Metrics exposition
// =============================================================================

#[tokio::test]
async fn test_each_request_observed_once() {
    let app = setup_app(Ok("Csus2".to_string()));

    for notes in ["", "C", "C,E,G", "C,D,G"] {
        app.router
            .clone()
            .oneshot(post_json("/api/predict", json!({ "notes": notes })))
            .await
            .unwrap();
    }

    assert_eq!(app.metrics.latency_observations(PREDICT_ENDPOINT), 4);
    assert_eq!(app.metrics.note_count_observations(PREDICT_ENDPOINT), 3);
    assert_eq!(app.metrics.active_requests(PREDICT_ENDPOINT), 0);

    let response = metrics_routes(app.metrics.clone())
        .oneshot(get("/metrics"))
        .await
        .unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("chordbot_invalid_requests_total"));
    assert!(text.contains("chord_label=\"Csus2\""));
    assert!(text.contains("status=\"invalid_input\""));
}
