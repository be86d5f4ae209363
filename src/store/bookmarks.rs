//! Per-user bookmarks. Pure pass-through: no ranking, no eviction.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::models::Project;
use crate::store::ProjectRow;

#[derive(Clone)]
pub struct BookmarkStore {
    pool: SqlitePool,
}

impl BookmarkStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Idempotent add. Returns false when the bookmark already existed.
    pub async fn add(&self, user_id: &str, project_id: &str) -> Result<bool, ApiError> {
        let result = sqlx::query(
            "INSERT INTO bookmarks (user_id, project_id, created_at) VALUES (?, ?, ?)
             ON CONFLICT (user_id, project_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(project_id)
        .bind(Utc::now().timestamp_micros())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn remove(&self, user_id: &str, project_id: &str) -> Result<(), ApiError> {
        sqlx::query("DELETE FROM bookmarks WHERE user_id = ? AND project_id = ?")
            .bind(user_id)
            .bind(project_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<Project>, ApiError> {
        let rows: Vec<ProjectRow> = sqlx::query_as(
            "SELECT p.id, p.title, p.description, p.tags, p.stars, p.forks, p.watchers,
                    p.link, p.created_at
             FROM bookmarks b
             JOIN projects p ON p.id = b.project_id
             WHERE b.user_id = ?
             ORDER BY b.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProjectRow::into_project).collect()
    }

    pub async fn contains(&self, user_id: &str, project_id: &str) -> Result<bool, ApiError> {
        let exists: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM bookmarks WHERE user_id = ? AND project_id = ?)",
        )
        .bind(user_id)
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists != 0)
    }
}
