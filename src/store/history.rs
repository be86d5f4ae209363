//! Per-user visit ledger: bounded, deduplicated, recency-ordered.
//!
//! One row per (user, project) pair. A repeat visit bumps `visited_at`
//! instead of inserting, and every mutation leaves the user at or below
//! [`HISTORY_CAP`] entries — the eviction step runs inside the same
//! transaction as the insert.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::error::ApiError;
use crate::models::{HistoryEntry, VisitedProject};
use crate::store::{datetime_from_micros, ProjectRow};

/// Most recently visited distinct projects kept per user.
pub const HISTORY_CAP: i64 = 9;

#[derive(sqlx::FromRow)]
struct VisitedRow {
    #[sqlx(flatten)]
    project: ProjectRow,
    visited_at: i64,
}

#[derive(Clone)]
pub struct HistoryLedger {
    pool: SqlitePool,
    /// Serializes insert+evict per user; visits by different users never
    /// contend on these locks.
    visit_locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl HistoryLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            visit_locks: Arc::new(DashMap::new()),
        }
    }

    fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.visit_locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Record a visit. Returns the ledger entry and whether it was newly
    /// created (`false` = repeat visit, recency refreshed). The cap
    /// invariant holds when this returns, not eventually.
    pub async fn record_visit(
        &self,
        user_id: &str,
        project_id: &str,
    ) -> Result<(HistoryEntry, bool), ApiError> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        // Truncate to the stored resolution so the returned entry equals
        // what a later read will see.
        let now_micros = Utc::now().timestamp_micros();
        let now = datetime_from_micros(now_micros)?;

        let mut tx = self.pool.begin().await?;

        let insert = sqlx::query(
            "INSERT INTO history (user_id, project_id, visited_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(project_id)
        .bind(now_micros)
        .execute(&mut *tx)
        .await;

        let created = match insert {
            Ok(_) => true,
            // An existing pair is the repeat-visit transition, not an
            // error: refresh its recency instead.
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                sqlx::query(
                    "UPDATE history SET visited_at = ? WHERE user_id = ? AND project_id = ?",
                )
                .bind(now_micros)
                .bind(user_id)
                .bind(project_id)
                .execute(&mut *tx)
                .await?;
                false
            }
            Err(e) => return Err(e.into()),
        };

        // Evict everything past the recency cap, not just one row; a
        // single visit only pushes one over, but a bulk import may leave
        // more.
        sqlx::query(
            "DELETE FROM history
             WHERE user_id = ?
               AND id NOT IN (
                   SELECT id FROM history
                   WHERE user_id = ?
                   ORDER BY visited_at DESC, id DESC
                   LIMIT ?
               )",
        )
        .bind(user_id)
        .bind(user_id)
        .bind(HISTORY_CAP)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((
            HistoryEntry {
                user_id: user_id.to_string(),
                project_id: project_id.to_string(),
                visited_at: now,
            },
            created,
        ))
    }

    /// The user's visited projects, most recent first, capped at
    /// [`HISTORY_CAP`].
    pub async fn list_history(&self, user_id: &str) -> Result<Vec<VisitedProject>, ApiError> {
        let rows: Vec<VisitedRow> = sqlx::query_as(
            "SELECT p.id, p.title, p.description, p.tags, p.stars, p.forks, p.watchers,
                    p.link, p.created_at, h.visited_at
             FROM history h
             JOIN projects p ON p.id = h.project_id
             WHERE h.user_id = ?
             ORDER BY h.visited_at DESC, h.id DESC
             LIMIT ?",
        )
        .bind(user_id)
        .bind(HISTORY_CAP)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(VisitedProject {
                    project: row.project.into_project()?,
                    visited_at: datetime_from_micros(row.visited_at)?,
                })
            })
            .collect()
    }

    /// Remove one entry. `NotFound` when the pair is absent; other users'
    /// entries are never touched.
    pub async fn delete_one(&self, user_id: &str, project_id: &str) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM history WHERE user_id = ? AND project_id = ?")
            .bind(user_id)
            .bind(project_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(
                "project not found in user history".to_string(),
            ));
        }
        Ok(())
    }

    /// Purge the user's ledger. Returns how many entries were removed.
    pub async fn delete_all(&self, user_id: &str) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM history WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
