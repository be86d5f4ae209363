//! Projects API Integration Tests
//!
//! Catalog CRUD plumbing: creation (single and batch), listings, the
//! top-by-engagement view, and the engagement overwrite entry point.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use devshowcase::api;
use devshowcase::extract::CriteriaExtractor;
use devshowcase::state::AppState;

async fn setup_test_app() -> (axum::Router, tempfile::TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test_catalog.db");
    let db = devshowcase::db::connect(db_path.to_str().expect("Invalid database path"))
        .await
        .expect("Failed to open database");

    let extractor = CriteriaExtractor::new("http://127.0.0.1:9".to_string(), None)
        .expect("Failed to build extractor");
    let state = Arc::new(AppState::new(db, extractor));
    (api::router().with_state(state), temp_dir)
}

async fn json_request(app: &axum::Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

async fn get_request(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.expect("Request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let value: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Invalid JSON response")
    };
    (status, value)
}

fn project_body(title: &str, stars: i64) -> Value {
    json!({
        "title": title,
        "description": "sample entry",
        "tags": ["rust"],
        "stars": stars,
        "link": "https://github.com/acme/repo"
    })
}

#[tokio::test]
async fn test_health_check() {
    let (app, _temp_dir) = setup_test_app().await;
    let (status, body) = get_request(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_single_project() {
    let (app, _temp_dir) = setup_test_app().await;

    let (status, body) =
        json_request(&app, "POST", "/api/projects", project_body("Solo", 1)).await;
    assert_eq!(status, StatusCode::CREATED);

    let created = body.as_array().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["title"], "Solo");
    assert_eq!(created[0]["tags"], json!(["rust"]));
    assert!(created[0]["id"].as_str().is_some());
    assert!(created[0]["created_at"].is_string());
}

#[tokio::test]
async fn test_create_batch_and_list() {
    let (app, _temp_dir) = setup_test_app().await;

    let (status, body) = json_request(
        &app,
        "POST",
        "/api/projects",
        json!([project_body("One", 1), project_body("Two", 2)]),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, listing) = get_request(&app, "/api/projects").await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles.len(), 2);
    assert!(titles.contains(&"One") && titles.contains(&"Two"));
}

#[tokio::test]
async fn test_top_projects_ordered_by_engagement() {
    let (app, _temp_dir) = setup_test_app().await;

    json_request(
        &app,
        "POST",
        "/api/projects",
        json!([
            project_body("Tiny", 1),
            project_body("Mid", 20),
            project_body("Big", 300),
            project_body("Huge", 4000),
        ]),
    )
    .await;

    let (status, body) = get_request(&app, "/api/projects/top").await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Huge", "Big", "Mid"]);
}

#[tokio::test]
async fn test_missing_title_is_rejected() {
    let (app, _temp_dir) = setup_test_app().await;

    let (status, body) = json_request(
        &app,
        "POST",
        "/api/projects",
        json!({ "link": "https://github.com/acme/repo" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn test_blank_title_is_rejected() {
    let (app, _temp_dir) = setup_test_app().await;

    let (status, body) = json_request(
        &app,
        "POST",
        "/api/projects",
        json!({ "title": "   ", "link": "https://github.com/acme/repo" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn test_negative_counters_are_rejected() {
    let (app, _temp_dir) = setup_test_app().await;

    let (status, body) = json_request(
        &app,
        "POST",
        "/api/projects",
        json!({
            "title": "Broken",
            "stars": -3,
            "link": "https://github.com/acme/repo"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn test_engagement_overwrite_reports_unknown_ids() {
    let (app, _temp_dir) = setup_test_app().await;

    let (_, created) =
        json_request(&app, "POST", "/api/projects", project_body("Refreshed", 1)).await;
    let id = created[0]["id"].as_str().unwrap().to_string();

    let (status, report) = json_request(
        &app,
        "POST",
        "/api/projects/engagement",
        json!([
            { "id": id, "stars": 11, "forks": 2, "watchers": 7 },
            { "id": "missing-id", "stars": 1, "forks": 1, "watchers": 1 }
        ]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["updated"], 1);
    assert_eq!(report["unknown"], json!(["missing-id"]));

    let (_, listing) = get_request(&app, "/api/projects").await;
    let refreshed = &listing.as_array().unwrap()[0];
    assert_eq!(refreshed["stars"], 11);
    assert_eq!(refreshed["forks"], 2);
    assert_eq!(refreshed["watchers"], 7);
}

#[tokio::test]
async fn test_bookmark_roundtrip() {
    let (app, _temp_dir) = setup_test_app().await;

    let (_, created) =
        json_request(&app, "POST", "/api/projects", project_body("Saved", 1)).await;
    let id = created[0]["id"].as_str().unwrap().to_string();
    let req = json!({ "user_id": "alice", "project_id": id });

    let (status, _) = json_request(&app, "POST", "/api/bookmarks", req.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    // Adding again is idempotent, not an error.
    let (status, _) = json_request(&app, "POST", "/api/bookmarks", req.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let (_, check) = get_request(
        &app,
        &format!("/api/bookmarks/check?user_id=alice&project_id={id}"),
    )
    .await;
    assert_eq!(check["bookmarked"], true);

    let (_, listing) = get_request(&app, "/api/bookmarks/alice").await;
    assert_eq!(listing.as_array().unwrap().len(), 1);

    let (status, _) = json_request(&app, "DELETE", "/api/bookmarks", req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, check) = get_request(
        &app,
        &format!("/api/bookmarks/check?user_id=alice&project_id={id}"),
    )
    .await;
    assert_eq!(check["bookmarked"], false);
}
