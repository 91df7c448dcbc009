//! Query types for the search engine

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Filter variant tag
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Match against the result's entity type
    EntityType,
    /// Match against a named facet's value
    Facet(String),
    /// Date-range filter (always-pass in this engine)
    DateRange,
    /// Numeric-range filter (always-pass in this engine)
    NumericRange,
    /// Consumer-defined filter id (always-pass in this engine)
    Custom(String),
}

/// A single search filter
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SearchFilter {
    /// What the filter matches against
    pub kind: FilterKind,

    /// Value to compare with
    pub value: String,

    /// When true, matching results are dropped instead of kept
    #[serde(default)]
    pub is_exclusion: bool,
}

impl SearchFilter {
    /// Inclusion filter on entity type
    pub fn entity_type(value: impl Into<String>) -> Self {
        Self {
            kind: FilterKind::EntityType,
            value: value.into(),
            is_exclusion: false,
        }
    }

    /// Inclusion filter on a named facet
    pub fn facet(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: FilterKind::Facet(name.into()),
            value: value.into(),
            is_exclusion: false,
        }
    }

    /// Flip this filter into an exclusion
    pub fn excluding(mut self) -> Self {
        self.is_exclusion = true;
        self
    }
}

/// Sort key for results within each entity-type group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Relevance score
    #[default]
    Relevance,
    /// Result title, lexicographic
    Title,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Highest relevance / last title first
    #[default]
    Descending,
    /// Lowest relevance / first title first
    Ascending,
}

/// Immutable search query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Text to search for
    pub text: String,

    /// Filters applied to materialized results
    #[serde(default)]
    pub filters: Vec<SearchFilter>,

    /// Sort key within entity-type groups
    #[serde(default)]
    pub sort_key: SortKey,

    /// Sort direction
    #[serde(default)]
    pub sort_direction: SortDirection,

    /// Per-group result cap, further bounded by configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
}

impl SearchQuery {
    /// Create a new query with text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            filters: Vec::new(),
            sort_key: SortKey::default(),
            sort_direction: SortDirection::default(),
            max_results: None,
        }
    }

    /// Add a filter
    pub fn with_filter(mut self, filter: SearchFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set sort key
    pub fn with_sort_key(mut self, key: SortKey) -> Self {
        self.sort_key = key;
        self
    }

    /// Set sort direction
    pub fn with_sort_direction(mut self, direction: SortDirection) -> Self {
        self.sort_direction = direction;
        self
    }

    /// Cap results per entity-type group
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = Some(max);
        self
    }

    /// Stable cache fingerprint of the full query.
    ///
    /// Filter order is normalized before hashing so two queries that
    /// differ only in filter order share a cache entry.
    pub fn fingerprint(&self) -> u64 {
        let mut filters = self.filters.clone();
        filters.sort();

        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.text.hash(&mut hasher);
        filters.hash(&mut hasher);
        self.sort_key.hash(&mut hasher);
        self.sort_direction.hash(&mut hasher);
        self.max_results.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let query = SearchQuery::new("project ideas")
            .with_filter(SearchFilter::entity_type("Note"))
            .with_filter(SearchFilter::facet("tag", "work").excluding())
            .with_max_results(5);

        assert_eq!(query.text, "project ideas");
        assert_eq!(query.filters.len(), 2);
        assert!(query.filters[1].is_exclusion);
        assert_eq!(query.max_results, Some(5));
    }

    #[test]
    fn test_fingerprint_ignores_filter_order() {
        let a = SearchQuery::new("meeting")
            .with_filter(SearchFilter::entity_type("Note"))
            .with_filter(SearchFilter::facet("tag", "work"));
        let b = SearchQuery::new("meeting")
            .with_filter(SearchFilter::facet("tag", "work"))
            .with_filter(SearchFilter::entity_type("Note"));

        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_distinguishes_queries() {
        let a = SearchQuery::new("meeting");
        let b = SearchQuery::new("meetings");
        let c = SearchQuery::new("meeting").with_max_results(3);

        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_fingerprint_sees_exclusion_flag() {
        let include = SearchQuery::new("x").with_filter(SearchFilter::entity_type("Task"));
        let exclude =
            SearchQuery::new("x").with_filter(SearchFilter::entity_type("Task").excluding());
        assert_ne!(include.fingerprint(), exclude.fingerprint());
    }
}
