//! Visit-history endpoints over the per-user ledger.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::ApiError;
use crate::models::VisitedProject;
use crate::state::AppState;

/// POST /api/history/{user_id}/{project_id} — 201 on first visit, 200 on
/// a repeat visit (recency refreshed, no duplicate entry).
pub async fn record_visit(
    State(state): State<Arc<AppState>>,
    Path((user_id, project_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let (entry, created) = state.history.record_visit(&user_id, &project_id).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(entry)).into_response())
}

/// GET /api/history/{user_id} — at most 9 projects, most recent first.
pub async fn list_history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<VisitedProject>>, ApiError> {
    Ok(Json(state.history.list_history(&user_id).await?))
}

/// DELETE /api/history/{user_id}/{project_id}
pub async fn delete_one(
    State(state): State<Arc<AppState>>,
    Path((user_id, project_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.history.delete_one(&user_id, &project_id).await?;
    Ok(Json(json!({ "message": "project removed from history" })))
}

/// DELETE /api/history/{user_id}
pub async fn delete_all(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state.history.delete_all(&user_id).await?;
    Ok(Json(json!({
        "message": "history cleared",
        "deleted_count": deleted,
    })))
}
