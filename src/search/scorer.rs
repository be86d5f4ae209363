//! Relevance scoring for catalog search.
//!
//! Weighted-sum-with-fallback policy: each matched criterion adds its
//! weight, and a project matching nothing still scores [`FALLBACK_SCORE`]
//! so a best-available result can always be produced. Title and
//! description keywords match as case-insensitive substrings, tags as
//! exact case-insensitive tokens. No stemming, no fuzzy matching.

use crate::models::{Project, SearchCriteria};

pub const TITLE_MATCH: i64 = 10;
pub const TAG_MATCH: i64 = 8;
pub const DESCRIPTION_MATCH: i64 = 5;
pub const FALLBACK_SCORE: i64 = 1;

pub fn relevance_score(criteria: &SearchCriteria, project: &Project) -> i64 {
    let title = project.title.to_lowercase();
    let description = project.description.to_lowercase();
    let tags: Vec<String> = project.tags.iter().map(|t| t.to_lowercase()).collect();

    let mut score = 0;
    for keyword in &criteria.title_keywords {
        if title.contains(&keyword.to_lowercase()) {
            score += TITLE_MATCH;
        }
    }
    for tag in &criteria.tags {
        let tag = tag.to_lowercase();
        if tags.iter().any(|t| *t == tag) {
            score += TAG_MATCH;
        }
    }
    for keyword in &criteria.description_keywords {
        if description.contains(&keyword.to_lowercase()) {
            score += DESCRIPTION_MATCH;
        }
    }

    score.max(FALLBACK_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn project(title: &str, description: &str, tags: &[&str]) -> Project {
        Project {
            id: "p1".to_string(),
            title: title.to_string(),
            description: description.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            stars: 0,
            forks: 0,
            watchers: 0,
            link: "https://example.com/repo".to_string(),
            created_at: Utc::now(),
        }
    }

    fn criteria(title: &[&str], description: &[&str], tags: &[&str]) -> SearchCriteria {
        SearchCriteria {
            title_keywords: title.iter().map(|k| k.to_string()).collect(),
            description_keywords: description.iter().map(|k| k.to_string()).collect(),
            tags: tags.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn weights_sum_across_fields() {
        let p = project("Portfolio Site", "a simple portfolio", &["html", "css"]);
        let c = criteria(&["portfolio"], &["simple"], &["html"]);
        assert_eq!(relevance_score(&c, &p), TITLE_MATCH + DESCRIPTION_MATCH + TAG_MATCH);
    }

    #[test]
    fn zero_match_scores_fallback_floor() {
        let p = project("Expense Tracker", "budgeting tool", &["react"]);
        let c = criteria(&["portfolio"], &["gallery"], &["html"]);
        assert_eq!(relevance_score(&c, &p), FALLBACK_SCORE);
    }

    #[test]
    fn empty_criteria_scores_fallback_floor() {
        let p = project("Anything", "at all", &[]);
        assert_eq!(relevance_score(&SearchCriteria::default(), &p), FALLBACK_SCORE);
    }

    #[test]
    fn title_match_is_case_insensitive_substring() {
        let p = project("My PORTFOLIO Site", "", &[]);
        let c = criteria(&["portfolio"], &[], &[]);
        assert_eq!(relevance_score(&c, &p), TITLE_MATCH);
    }

    #[test]
    fn tag_match_is_exact_token_not_substring() {
        let p = project("x", "", &["javascript"]);
        // "java" is a substring of the stored tag but not the same token
        assert_eq!(relevance_score(&criteria(&[], &[], &["java"]), &p), FALLBACK_SCORE);
        assert_eq!(
            relevance_score(&criteria(&[], &[], &["JavaScript"]), &p),
            TAG_MATCH
        );
    }

    #[test]
    fn each_matching_keyword_counts_once() {
        let p = project("rust web server", "fast rust web server", &[]);
        let c = criteria(&["rust", "web", "server"], &["rust", "missing"], &[]);
        assert_eq!(relevance_score(&c, &p), 3 * TITLE_MATCH + DESCRIPTION_MATCH);
    }
}
