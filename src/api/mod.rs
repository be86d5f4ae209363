//! HTTP API routes for the catalog service.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

pub mod bookmarks;
pub mod history;
pub mod projects;

use crate::state::AppState;

/// Configure all API routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        // Project catalog
        .route(
            "/api/projects",
            get(projects::list_projects).post(projects::create_projects),
        )
        .route("/api/projects/top", get(projects::top_projects))
        .route("/api/projects/search", post(projects::search_projects))
        .route("/api/projects/search/best", post(projects::search_best))
        .route(
            "/api/projects/extract-search-criteria",
            post(projects::extract_search_criteria),
        )
        .route("/api/projects/engagement", post(projects::update_engagement))
        // Visit history
        .route(
            "/api/history/{user_id}",
            get(history::list_history).delete(history::delete_all),
        )
        .route(
            "/api/history/{user_id}/{project_id}",
            post(history::record_visit).delete(history::delete_one),
        )
        // Bookmarks
        .route(
            "/api/bookmarks",
            post(bookmarks::add_bookmark).delete(bookmarks::remove_bookmark),
        )
        .route("/api/bookmarks/check", get(bookmarks::check_bookmark))
        .route("/api/bookmarks/{user_id}", get(bookmarks::list_bookmarks))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
