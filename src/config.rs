//! Index configuration
//!
//! Capacity and scoring knobs for [`TrieSearch`](crate::TrieSearch).

use serde::{Deserialize, Serialize};

/// Default upper bound on indexable term length, in characters.
pub const DEFAULT_MAX_WORD_LENGTH: usize = 50;

/// Default freshness horizon for document recency scoring, in days.
pub const DEFAULT_MAX_AGE_DAYS: f64 = 30.0;

/// Configuration for a trie search index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Terms longer than this (in characters) are silently not indexed.
    pub max_word_length: usize,

    /// Documents older than this contribute no recency boost; newer
    /// documents are blended linearly between the 0.7 floor and 1.0.
    pub max_age_days: f64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_word_length: DEFAULT_MAX_WORD_LENGTH,
            max_age_days: DEFAULT_MAX_AGE_DAYS,
        }
    }
}

impl IndexConfig {
    /// Configuration with a custom term-length capacity bound.
    pub fn with_max_word_length(max_word_length: usize) -> Self {
        Self {
            max_word_length,
            ..Self::default()
        }
    }
}
