//! Catalog search: relevance scoring and in-process ranking.

pub mod rank;
pub mod scorer;

pub use rank::{best, rank, ResultPolicy, SEARCH_RESULT_LIMIT};
