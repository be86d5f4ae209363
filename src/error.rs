//! Error taxonomy for the HTTP surface.
//!
//! Every failure a caller can observe maps to one of these kinds; the wire
//! shape is `{"status":"error","code":...,"message":...}` with a stable
//! `code` string per kind. Store internals ride along in a `detail` field
//! only outside production mode.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed request body or criteria.
    #[error("{0}")]
    Validation(String),

    /// The addressed resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A store failure the caller cannot recover from.
    #[error("storage operation failed: {0}")]
    Persistence(String),

    /// The request exceeded its deadline. The underlying write may still
    /// complete; the caller only learns it did not finish in time.
    #[error("request took too long to complete")]
    Timeout,

    /// The criteria-extraction collaborator was unreachable or answered
    /// with a payload we cannot use.
    #[error("{message}")]
    Upstream {
        status: Option<StatusCode>,
        message: String,
    },
}

impl ApiError {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::NotFound(_) => "not_found",
            ApiError::Persistence(_) => "persistence_error",
            ApiError::Timeout => "timeout",
            ApiError::Upstream { .. } => "upstream_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Upstream { status, .. } => status.unwrap_or(StatusCode::BAD_GATEWAY),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Persistence(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Persistence(format!("serialization failed: {e}"))
    }
}

/// `APP_ENV=production` hides store internals from responses; anything
/// else (including unset) is treated as a development environment.
fn production_mode() -> bool {
    matches!(std::env::var("APP_ENV").as_deref(), Ok("production"))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.code(), error = %self, "request failed");
        } else {
            warn!(code = self.code(), error = %self, "request rejected");
        }

        let (message, detail) = match &self {
            ApiError::Persistence(inner) => {
                ("storage operation failed".to_string(), Some(inner.clone()))
            }
            other => (other.to_string(), None),
        };

        let mut body = json!({
            "status": "error",
            "code": self.code(),
            "message": message,
        });
        if let Some(detail) = detail {
            if !production_mode() {
                body["detail"] = json!(detail);
            }
        }

        (status, Json(body)).into_response()
    }
}
