//! Deadline middleware test: a handler that outruns the configured
//! timeout must yield the structured timeout response, not hang.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use devshowcase::middleware::request_deadline;

async fn stalled_handler() -> &'static str {
    tokio::time::sleep(Duration::from_secs(60)).await;
    "too late"
}

#[tokio::test]
async fn test_slow_request_gets_timeout_shape() {
    let app = Router::new()
        .route("/slow", get(stalled_handler))
        .layer(axum::middleware::from_fn_with_state(
            Duration::from_millis(50),
            request_deadline,
        ));

    let req = Request::builder()
        .method("GET")
        .uri("/slow")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.expect("Request failed");

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let body: Value = serde_json::from_slice(&bytes).expect("Invalid JSON response");
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "timeout");
}

#[tokio::test]
async fn test_fast_request_passes_through() {
    let app = Router::new()
        .route("/fast", get(|| async { "ok" }))
        .layer(axum::middleware::from_fn_with_state(
            Duration::from_secs(30),
            request_deadline,
        ));

    let req = Request::builder()
        .method("GET")
        .uri("/fast")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
}
