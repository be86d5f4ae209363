//! Catalog endpoints: listing, creation, search, and the engagement
//! overwrite entry point used by the periodic external refresh job.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::error::ApiError;
use crate::models::{NewProject, Project, ScoredCandidate, SearchCriteria};
use crate::search::{self, ResultPolicy, SEARCH_RESULT_LIMIT};
use crate::state::AppState;

const TOP_PROJECTS_LIMIT: i64 = 3;

/// GET /api/projects — unranked, newest first.
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Project>>, ApiError> {
    Ok(Json(state.projects.list_all().await?))
}

/// GET /api/projects/top — top 3 by engagement.
pub async fn top_projects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Project>>, ApiError> {
    Ok(Json(state.projects.list_top(TOP_PROJECTS_LIMIT).await?))
}

/// POST /api/projects — accepts a single project object or an array.
pub async fn create_projects(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let new_projects: Vec<NewProject> = match &body {
        Value::Array(_) => serde_json::from_value(body.clone())
            .map_err(|e| ApiError::Validation(format!("invalid project payload: {e}")))?,
        Value::Object(_) => vec![serde_json::from_value(body.clone())
            .map_err(|e| ApiError::Validation(format!("invalid project payload: {e}")))?],
        _ => {
            return Err(ApiError::Validation(
                "expected a project object or an array of projects".to_string(),
            ))
        }
    };

    let mut created = Vec::with_capacity(new_projects.len());
    for new in new_projects {
        validate_new_project(&new)?;
        created.push(state.projects.insert(new).await?);
    }

    info!(count = created.len(), "projects created");
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

fn validate_new_project(new: &NewProject) -> Result<(), ApiError> {
    if new.title.trim().is_empty() {
        return Err(ApiError::Validation("project title is required".to_string()));
    }
    if new.link.trim().is_empty() {
        return Err(ApiError::Validation("project link is required".to_string()));
    }
    if new.stars < 0 || new.forks < 0 || new.watchers < 0 {
        return Err(ApiError::Validation(
            "engagement counters must be non-negative".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/projects/search — ranked candidates, up to 50.
pub async fn search_projects(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<Vec<ScoredCandidate>>, ApiError> {
    let criteria = SearchCriteria::from_json(&body)?;
    let snapshot = state.projects.list_all().await?;
    let ranked = search::rank(&criteria, snapshot, ResultPolicy::TopN(SEARCH_RESULT_LIMIT));
    info!(results = ranked.len(), "search completed");
    Ok(Json(ranked))
}

/// POST /api/projects/search/best — single best match; 404 over an empty
/// catalog rather than a silent empty success.
pub async fn search_best(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<ScoredCandidate>, ApiError> {
    let criteria = SearchCriteria::from_json(&body)?;
    let snapshot = state.projects.list_all().await?;
    search::best(&criteria, snapshot)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("no projects in the catalog".to_string()))
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub prompt: String,
}

/// POST /api/projects/extract-search-criteria
pub async fn extract_search_criteria(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ExtractRequest>,
) -> Result<Json<SearchCriteria>, ApiError> {
    if body.prompt.trim().is_empty() {
        return Err(ApiError::Validation("prompt is required".to_string()));
    }
    let criteria = state.extractor.extract(&body.prompt).await?;
    Ok(Json(criteria))
}

#[derive(Debug, Deserialize)]
pub struct EngagementUpdate {
    pub id: String,
    pub stars: i64,
    pub forks: i64,
    pub watchers: i64,
}

#[derive(Debug, Serialize)]
pub struct EngagementReport {
    pub updated: usize,
    pub unknown: Vec<String>,
}

/// POST /api/projects/engagement — batch counter overwrite; the entry
/// point the external refresh job calls. Touches nothing but the
/// counters.
pub async fn update_engagement(
    State(state): State<Arc<AppState>>,
    Json(updates): Json<Vec<EngagementUpdate>>,
) -> Result<Json<EngagementReport>, ApiError> {
    let mut updated = 0;
    let mut unknown = Vec::new();

    for update in updates {
        if update.stars < 0 || update.forks < 0 || update.watchers < 0 {
            return Err(ApiError::Validation(
                "engagement counters must be non-negative".to_string(),
            ));
        }
        let applied = state
            .projects
            .update_engagement(&update.id, update.stars, update.forks, update.watchers)
            .await?;
        if applied {
            updated += 1;
        } else {
            unknown.push(update.id);
        }
    }

    info!(updated, unknown = unknown.len(), "engagement counters refreshed");
    Ok(Json(EngagementReport { updated, unknown }))
}
