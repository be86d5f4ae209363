//! Request-scoped middleware.

use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;

/// Blanket deadline for every request. A handler that outruns it has its
/// response discarded and the caller receives the timeout error shape;
/// an in-flight write is left to the store to finish or roll back.
pub async fn request_deadline(
    State(deadline): State<Duration>,
    req: Request,
    next: Next,
) -> Response {
    match tokio::time::timeout(deadline, next.run(req)).await {
        Ok(response) => response,
        Err(_) => ApiError::Timeout.into_response(),
    }
}
