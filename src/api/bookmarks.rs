//! Bookmark endpoints. Pass-through to the store; no ranking or
//! eviction semantics live here.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::models::Project;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BookmarkRequest {
    pub user_id: String,
    pub project_id: String,
}

/// POST /api/bookmarks — 201 when created, 200 when it already existed.
pub async fn add_bookmark(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookmarkRequest>,
) -> Result<Response, ApiError> {
    let created = state.bookmarks.add(&req.user_id, &req.project_id).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(json!({ "bookmarked": true }))).into_response())
}

/// DELETE /api/bookmarks
pub async fn remove_bookmark(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookmarkRequest>,
) -> Result<StatusCode, ApiError> {
    state.bookmarks.remove(&req.user_id, &req.project_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/bookmarks/{user_id}
pub async fn list_bookmarks(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Project>>, ApiError> {
    Ok(Json(state.bookmarks.list(&user_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    pub user_id: String,
    pub project_id: String,
}

/// GET /api/bookmarks/check?user_id=..&project_id=..
pub async fn check_bookmark(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CheckQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let bookmarked = state
        .bookmarks
        .contains(&query.user_id, &query.project_id)
        .await?;
    Ok(Json(json!({ "bookmarked": bookmarked })))
}
