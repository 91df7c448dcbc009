//! Query execution: lookup, aggregation, filtering, grouping

use crate::fuzzy::fuzzy_match;
use crate::index::{DocumentMetadata, IndexSnapshot, Posting};
use crate::tokenizer::normalize_unique;
use chrono::Utc;
use scour_core::{
    FilterKind, Result, ResultGroup, SearchConfig, SearchError, SearchFilter, SearchQuery,
    SearchResult, SearchResults, SortDirection, SortKey,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Executes structured queries against an index snapshot
pub struct QueryEngine {
    config: Arc<SearchConfig>,
}

impl QueryEngine {
    pub fn new(config: Arc<SearchConfig>) -> Self {
        Self { config }
    }

    /// Run a query against one consistent snapshot.
    ///
    /// Zero matching documents is a well-formed empty result, not an
    /// error. Steps run strictly in order: tokenize, lookup, aggregate,
    /// group, truncate, filter, sort.
    pub fn execute(&self, snapshot: &IndexSnapshot, query: &SearchQuery) -> Result<SearchResults> {
        if query.text.chars().count() < self.config.minimum_search_length {
            return Err(SearchError::QueryTooShort {
                minimum: self.config.minimum_search_length,
            });
        }

        let terms = normalize_unique(&query.text);
        if terms.is_empty() {
            return Err(SearchError::InvalidQuery {
                text: query.text.clone(),
                reason: "query tokenized to no searchable terms".to_string(),
            });
        }

        // Scores from multiple matching terms for the same document sum,
        // rewarding documents that match more of the query.
        let mut accumulated: HashMap<(String, String), f64> = HashMap::new();
        for term in &terms {
            for posting in self.postings_for(snapshot, term) {
                let Posting {
                    doc_id,
                    entity_type,
                    score,
                } = posting;
                *accumulated.entry((doc_id, entity_type)).or_insert(0.0) += score;
            }
        }

        if accumulated.is_empty() {
            return Ok(SearchResults::empty(&query.text, query.filters.clone()));
        }

        let mut by_type: HashMap<String, Vec<(String, f64)>> = HashMap::new();
        for ((doc_id, entity_type), score) in accumulated {
            by_type.entry(entity_type).or_default().push((doc_id, score));
        }

        let cap = query
            .max_results
            .unwrap_or(self.config.max_results_per_entity_type)
            .min(self.config.max_results_per_entity_type);

        let mut groups = Vec::new();
        let mut total_count = 0usize;
        let mut any_truncated = false;

        let mut entity_types: Vec<String> = by_type.keys().cloned().collect();
        entity_types.sort();

        for entity_type in entity_types {
            let mut scored = by_type.remove(&entity_type).unwrap_or_default();
            scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

            let is_truncated = scored.len() > cap;
            scored.truncate(cap);

            let mut results: Vec<SearchResult> = scored
                .into_iter()
                .filter_map(|(doc_id, score)| {
                    let metadata = snapshot.metadata(&doc_id)?;
                    let result = materialize(&doc_id, &entity_type, score, metadata);
                    query
                        .filters
                        .iter()
                        .all(|f| filter_keeps(&result, f))
                        .then_some(result)
                })
                .collect();

            if results.is_empty() {
                continue;
            }

            sort_results(&mut results, query.sort_key, query.sort_direction);
            total_count += results.len();
            any_truncated |= is_truncated;

            groups.push(ResultGroup {
                entity_type,
                results,
                is_truncated,
            });
        }

        Ok(SearchResults {
            query_text: query.text.clone(),
            filters: query.filters.clone(),
            groups,
            total_count,
            is_truncated: any_truncated,
            generated_at: Utc::now(),
        })
    }

    /// Exact lookup, falling back to the fuzzy scan only when the exact
    /// lookup found nothing and fuzzy matching is enabled.
    fn postings_for(&self, snapshot: &IndexSnapshot, term: &str) -> Vec<Posting> {
        if let Some(postings) = snapshot.lookup(term) {
            return postings.to_vec();
        }
        if self.config.enable_fuzzy_matching {
            fuzzy_match(snapshot, term, self.config.fuzzy_match_threshold)
        } else {
            Vec::new()
        }
    }
}

fn materialize(
    doc_id: &str,
    entity_type: &str,
    score: f64,
    metadata: &DocumentMetadata,
) -> SearchResult {
    SearchResult {
        id: doc_id.to_string(),
        entity_type: entity_type.to_string(),
        title: metadata.title.clone(),
        subtitle: metadata.subtitle.clone(),
        details: None,
        relevance_score: score.min(1.0),
        facets: metadata.facets.clone(),
        payload: metadata.payload.clone(),
    }
}

/// Whether a filter keeps a result: `matches != is_exclusion`.
///
/// A facet filter against a result lacking that facet counts as not
/// matching, so it fails inclusions but satisfies exclusions. Range and
/// custom filter kinds are always-pass in this engine.
fn filter_keeps(result: &SearchResult, filter: &SearchFilter) -> bool {
    let matches = match &filter.kind {
        FilterKind::EntityType => result.entity_type == filter.value,
        FilterKind::Facet(name) => result
            .facets
            .as_ref()
            .and_then(|f| f.get(name))
            .is_some_and(|v| v == &filter.value),
        FilterKind::DateRange | FilterKind::NumericRange | FilterKind::Custom(_) => {
            return true;
        }
    };
    matches != filter.is_exclusion
}

fn sort_results(results: &mut [SearchResult], key: SortKey, direction: SortDirection) {
    match key {
        SortKey::Relevance => results.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        SortKey::Title => results.sort_by(|a, b| b.title.cmp(&a.title)),
    }
    if direction == SortDirection::Ascending {
        results.reverse();
    }
}
