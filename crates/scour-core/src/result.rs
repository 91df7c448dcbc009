//! Search result types

use crate::query::SearchFilter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single materialized search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Stable identifier of the source entity
    pub id: String,

    /// Entity type name
    pub entity_type: String,

    /// Display title
    pub title: String,

    /// Optional display subtitle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Optional details map for renderers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, String>>,

    /// Relevance score in [0, 1]
    pub relevance_score: f64,

    /// Facets carried from the source entity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<HashMap<String, String>>,

    /// Opaque payload carried from the source entity
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Results for one entity type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultGroup {
    /// Entity type name shared by all results in the group
    pub entity_type: String,

    /// Results, sorted per the query's sort key
    pub results: Vec<SearchResult>,

    /// True when the group was cut down to the result cap
    pub is_truncated: bool,
}

/// The outcome of one executed query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    /// The query text that produced these results
    pub query_text: String,

    /// Filters that were applied
    pub filters: Vec<SearchFilter>,

    /// Results grouped by entity type
    pub groups: Vec<ResultGroup>,

    /// Total surviving results across all groups
    pub total_count: usize,

    /// True when any group was truncated
    pub is_truncated: bool,

    /// Generation timestamp
    pub generated_at: DateTime<Utc>,
}

impl SearchResults {
    /// Well-formed empty results for a query that matched nothing
    pub fn empty(query_text: impl Into<String>, filters: Vec<SearchFilter>) -> Self {
        Self {
            query_text: query_text.into(),
            filters,
            groups: Vec::new(),
            total_count: 0,
            is_truncated: false,
            generated_at: Utc::now(),
        }
    }

    /// Whether the query matched nothing
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// Flattened view across groups, ordered by descending relevance
    pub fn flattened(&self) -> Vec<&SearchResult> {
        let mut all: Vec<&SearchResult> = self
            .groups
            .iter()
            .flat_map(|g| g.results.iter())
            .collect();
        all.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        all
    }

    /// Facet index over all contained results: facet name -> value -> count
    pub fn facet_index(&self) -> HashMap<String, HashMap<String, usize>> {
        let mut index: HashMap<String, HashMap<String, usize>> = HashMap::new();
        for group in &self.groups {
            for result in &group.results {
                if let Some(facets) = &result.facets {
                    for (name, value) in facets {
                        *index
                            .entry(name.clone())
                            .or_default()
                            .entry(value.clone())
                            .or_insert(0) += 1;
                    }
                }
            }
        }
        index
    }
}
