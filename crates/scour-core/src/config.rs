//! Engine configuration
//!
//! Supplied once at construction by the external configuration loader.

use serde::Deserialize;
use std::time::Duration;

/// Static tunables for the search engine
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Queries shorter than this are rejected
    #[serde(default = "default_minimum_search_length")]
    pub minimum_search_length: usize,

    /// Per entity-type group result cap
    #[serde(default = "default_max_results_per_entity_type")]
    pub max_results_per_entity_type: usize,

    /// Deadline for a direct (non-cached) search
    #[serde(default = "default_search_timeout", with = "duration_secs")]
    pub search_timeout: Duration,

    /// Whether completed searches are memoized
    #[serde(default = "default_true")]
    pub enable_result_caching: bool,

    /// TTL for cached results
    #[serde(default = "default_max_cache_age", with = "duration_secs")]
    pub max_cache_age: Duration,

    /// Size bound for the result cache
    #[serde(default = "default_max_cache_items")]
    pub max_cache_items: usize,

    /// Whether the background re-indexing scheduler runs
    #[serde(default = "default_true")]
    pub enable_indexing: bool,

    /// Interval between scheduled full rebuilds
    #[serde(default = "default_index_update_interval", with = "duration_secs")]
    pub index_update_interval: Duration,

    /// Whether query terms without exact hits fall back to fuzzy matching
    #[serde(default = "default_true")]
    pub enable_fuzzy_matching: bool,

    /// Minimum edit-distance similarity for a fuzzy match (0.0-1.0)
    #[serde(default = "default_fuzzy_match_threshold")]
    pub fuzzy_match_threshold: f64,
}

fn default_minimum_search_length() -> usize {
    2
}

fn default_max_results_per_entity_type() -> usize {
    50
}

fn default_search_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_max_cache_age() -> Duration {
    Duration::from_secs(300)
}

fn default_max_cache_items() -> usize {
    100
}

fn default_index_update_interval() -> Duration {
    Duration::from_secs(3600)
}

fn default_fuzzy_match_threshold() -> f64 {
    0.7
}

fn default_true() -> bool {
    true
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            minimum_search_length: default_minimum_search_length(),
            max_results_per_entity_type: default_max_results_per_entity_type(),
            search_timeout: default_search_timeout(),
            enable_result_caching: true,
            max_cache_age: default_max_cache_age(),
            max_cache_items: default_max_cache_items(),
            enable_indexing: true,
            index_update_interval: default_index_update_interval(),
            enable_fuzzy_matching: true,
            fuzzy_match_threshold: default_fuzzy_match_threshold(),
        }
    }
}

impl SearchConfig {
    /// Set the fuzzy threshold, clamped to [0, 1]
    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_match_threshold = threshold.clamp(0.0, 1.0);
        self
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
