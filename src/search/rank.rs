//! In-process ranking over a catalog snapshot.
//!
//! The engine performs no I/O: callers hand it the snapshot from one bulk
//! store read and everything else happens in memory, so the scoring
//! policy stays swappable and unit-testable without a live store. The
//! snapshot may be stale with respect to the engagement refresh job; that
//! is fine, ranking tolerates counters moving between reads.

use crate::models::{Project, ScoredCandidate, SearchCriteria};
use crate::search::scorer;

/// Candidates returned by the multi-result search endpoint.
pub const SEARCH_RESULT_LIMIT: usize = 50;

/// Result-shape policy: a ranked prefix, or the single best match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultPolicy {
    TopN(usize),
    Best,
}

/// Score and order the snapshot. Descending by relevance, then engagement,
/// then creation time (newest first); the project id breaks any remaining
/// tie so the order is total and reproducible.
pub fn rank(
    criteria: &SearchCriteria,
    projects: Vec<Project>,
    policy: ResultPolicy,
) -> Vec<ScoredCandidate> {
    let mut candidates: Vec<ScoredCandidate> = projects
        .into_iter()
        .map(|project| {
            let relevance_score = scorer::relevance_score(criteria, &project);
            let engagement_score = project.engagement_score();
            ScoredCandidate {
                project,
                relevance_score,
                engagement_score,
            }
        })
        .collect();

    candidates.sort_by(|a, b| {
        (b.relevance_score, b.engagement_score, b.project.created_at)
            .cmp(&(a.relevance_score, a.engagement_score, a.project.created_at))
            .then_with(|| a.project.id.cmp(&b.project.id))
    });

    let limit = match policy {
        ResultPolicy::TopN(n) => n,
        ResultPolicy::Best => 1,
    };
    candidates.truncate(limit);
    candidates
}

/// Single best match. An empty candidate set falls back to top-1 by
/// engagement over the unfiltered snapshot; `None` means the catalog
/// itself is empty and the caller reports it, never a silent empty
/// success.
pub fn best(criteria: &SearchCriteria, projects: Vec<Project>) -> Option<ScoredCandidate> {
    let fallback_pool = projects.clone();
    if let Some(hit) = rank(criteria, projects, ResultPolicy::Best).into_iter().next() {
        return Some(hit);
    }

    // Engagement-only fallback over the unfiltered snapshot.
    fallback_pool
        .into_iter()
        .max_by(|a, b| {
            (a.engagement_score(), a.created_at).cmp(&(b.engagement_score(), b.created_at))
        })
        .map(|project| ScoredCandidate {
            relevance_score: scorer::FALLBACK_SCORE,
            engagement_score: project.engagement_score(),
            project,
        })
}
