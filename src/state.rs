use sqlx::SqlitePool;

use crate::extract::CriteriaExtractor;
use crate::store::{BookmarkStore, HistoryLedger, ProjectStore};

/// Shared application state handed to every handler.
pub struct AppState {
    pub projects: ProjectStore,
    pub history: HistoryLedger,
    pub bookmarks: BookmarkStore,
    pub extractor: CriteriaExtractor,
}

impl AppState {
    pub fn new(db: SqlitePool, extractor: CriteriaExtractor) -> Self {
        Self {
            projects: ProjectStore::new(db.clone()),
            history: HistoryLedger::new(db.clone()),
            bookmarks: BookmarkStore::new(db),
            extractor,
        }
    }
}
