//! Core catalog types shared by the store, search, and API layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// A catalog entry for one software project.
///
/// Everything except the engagement counters is immutable after insert;
/// `stars`/`forks`/`watchers` are overwritten wholesale by the periodic
/// external refresh job via the engagement entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub stars: i64,
    pub forks: i64,
    pub watchers: i64,
    pub link: String,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Stars, forks, and watchers rolled into the single ordering key used
    /// for tie-breaking and the top-projects listing.
    pub fn engagement_score(&self) -> i64 {
        self.stars + self.forks + self.watchers
    }
}

/// Payload for creating a catalog entry. Engagement counters may be
/// seeded; id and creation time are assigned by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub stars: i64,
    #[serde(default)]
    pub forks: i64,
    #[serde(default)]
    pub watchers: i64,
    pub link: String,
}

/// Keyword criteria a search runs against the catalog. Wire field names
/// (`title`, `description`, `tags`) match what the extraction model is
/// instructed to produce. All fields empty means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(rename = "title", default)]
    pub title_keywords: Vec<String>,
    #[serde(rename = "description", default)]
    pub description_keywords: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SearchCriteria {
    /// Parse criteria from a JSON object. A missing field is an empty
    /// list; a present field must be an array of strings. Keywords are
    /// trimmed and blank entries dropped.
    pub fn from_json(value: &Value) -> Result<Self, ApiError> {
        if !value.is_object() {
            return Err(ApiError::Validation(
                "search criteria must be a JSON object".to_string(),
            ));
        }
        Ok(Self {
            title_keywords: keyword_field(value, "title")?,
            description_keywords: keyword_field(value, "description")?,
            tags: keyword_field(value, "tags")?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.title_keywords.is_empty() && self.description_keywords.is_empty() && self.tags.is_empty()
    }
}

fn keyword_field(value: &Value, field: &str) -> Result<Vec<String>, ApiError> {
    match value.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => {
            let mut keywords = Vec::with_capacity(items.len());
            for item in items {
                let Some(keyword) = item.as_str() else {
                    return Err(ApiError::Validation(format!(
                        "`{field}` entries must be strings"
                    )));
                };
                let keyword = keyword.trim();
                if !keyword.is_empty() {
                    keywords.push(keyword.to_string());
                }
            }
            Ok(keywords)
        }
        Some(_) => Err(ApiError::Validation(format!(
            "`{field}` must be an array of keywords"
        ))),
    }
}

/// A project paired with the scores the ranking engine computed for it.
/// `relevance_score` never drops below the fallback floor; the engagement
/// score is a tie-breaker only.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub project: Project,
    pub relevance_score: i64,
    pub engagement_score: i64,
}

/// One visit-ledger row. Unique per (user, project); `visited_at` is
/// bumped on repeat visits.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub user_id: String,
    pub project_id: String,
    pub visited_at: DateTime<Utc>,
}

/// A project joined with the visit time, as returned by the history
/// listing.
#[derive(Debug, Clone, Serialize)]
pub struct VisitedProject {
    #[serde(flatten)]
    pub project: Project,
    pub visited_at: DateTime<Utc>,
}
