//! SQLite-backed stores for the catalog, the visit ledger, and bookmarks.

pub mod bookmarks;
pub mod history;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{NewProject, Project};

pub use bookmarks::BookmarkStore;
pub use history::{HistoryLedger, HISTORY_CAP};

/// Row shape shared by every query returning projects. Tags live in a
/// TEXT column as a JSON array; timestamps as Unix microseconds.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProjectRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tags: sqlx::types::Json<Vec<String>>,
    pub stars: i64,
    pub forks: i64,
    pub watchers: i64,
    pub link: String,
    pub created_at: i64,
}

impl ProjectRow {
    pub(crate) fn into_project(self) -> Result<Project, ApiError> {
        Ok(Project {
            id: self.id,
            title: self.title,
            description: self.description,
            tags: self.tags.0,
            stars: self.stars,
            forks: self.forks,
            watchers: self.watchers,
            link: self.link,
            created_at: datetime_from_micros(self.created_at)?,
        })
    }
}

pub(crate) fn datetime_from_micros(micros: i64) -> Result<DateTime<Utc>, ApiError> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| ApiError::Persistence(format!("timestamp out of range: {micros}")))
}

const PROJECT_COLUMNS: &str =
    "id, title, description, tags, stars, forks, watchers, link, created_at";

#[derive(Clone)]
pub struct ProjectStore {
    pool: SqlitePool,
}

impl ProjectStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a catalog entry. Id and creation time are assigned here;
    /// both are immutable afterwards and ids are never reused.
    pub async fn insert(&self, new: NewProject) -> Result<Project, ApiError> {
        // Truncate to the stored resolution so the returned record equals
        // what a later read will see.
        let created_at = datetime_from_micros(Utc::now().timestamp_micros())?;
        let project = Project {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            description: new.description,
            tags: new.tags,
            stars: new.stars,
            forks: new.forks,
            watchers: new.watchers,
            link: new.link,
            created_at,
        };

        let tags_json = serde_json::to_string(&project.tags)?;
        sqlx::query(
            "INSERT INTO projects (id, title, description, tags, stars, forks, watchers, link, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&project.id)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&tags_json)
        .bind(project.stars)
        .bind(project.forks)
        .bind(project.watchers)
        .bind(&project.link)
        .bind(project.created_at.timestamp_micros())
        .execute(&self.pool)
        .await?;

        Ok(project)
    }

    /// Full catalog snapshot, newest first. The ranking engine reads this
    /// once per search and scores in memory.
    pub async fn list_all(&self) -> Result<Vec<Project>, ApiError> {
        let rows: Vec<ProjectRow> = sqlx::query_as(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProjectRow::into_project).collect()
    }

    /// Highest-engagement projects first.
    pub async fn list_top(&self, limit: i64) -> Result<Vec<Project>, ApiError> {
        let rows: Vec<ProjectRow> = sqlx::query_as(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects
             ORDER BY (stars + forks + watchers) DESC, created_at DESC
             LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProjectRow::into_project).collect()
    }

    /// Overwrite the engagement counters for one project. The counters
    /// are the only mutable fields on a catalog entry. Returns false when
    /// the id is unknown.
    pub async fn update_engagement(
        &self,
        id: &str,
        stars: i64,
        forks: i64,
        watchers: i64,
    ) -> Result<bool, ApiError> {
        let result = sqlx::query(
            "UPDATE projects SET stars = ?, forks = ?, watchers = ? WHERE id = ?",
        )
        .bind(stars)
        .bind(forks)
        .bind(watchers)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
