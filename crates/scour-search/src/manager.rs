//! Search manager façade
//!
//! The public entry point: owns configuration, wires the indexer, query
//! engine, and cache together, and publishes completed-search and
//! indexing events to subscribers.

use crate::cache::ResultCache;
use crate::engine::QueryEngine;
use crate::index::{IndexStats, IndexStore};
use crate::indexer::{Indexer, RebuildReport};
use crate::scheduler::SchedulerHandle;
use crate::traits::EntitySource;
use scour_core::{Result, SearchConfig, SearchError, SearchQuery, SearchResults, Searchable};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Events published to external observers such as a UI layer
#[derive(Debug, Clone)]
pub enum SearchEvent {
    /// One completed search
    SearchCompleted(Arc<SearchResults>),
    /// One completed full rebuild
    IndexingCompleted {
        /// Entities indexed
        indexed: usize,
        /// Wall time for the rebuild
        elapsed: Duration,
    },
}

/// The engine façade. All public operations are safe to call from many
/// concurrent callers.
pub struct SearchManager {
    config: Arc<SearchConfig>,
    source: Arc<dyn EntitySource>,
    store: Arc<IndexStore>,
    indexer: Arc<Indexer>,
    engine: Arc<QueryEngine>,
    cache: Arc<ResultCache>,
    events: broadcast::Sender<SearchEvent>,
    rebuild_in_flight: AtomicBool,
}

impl SearchManager {
    /// Wire up a manager around an entity source.
    ///
    /// No hidden process-wide state: callers own the instance and inject
    /// it where needed.
    pub fn new(config: SearchConfig, source: Arc<dyn EntitySource>) -> Self {
        let config = Arc::new(config);
        let store = Arc::new(IndexStore::new());
        let (events, _) = broadcast::channel(100);

        Self {
            indexer: Arc::new(Indexer::new(Arc::clone(&store))),
            engine: Arc::new(QueryEngine::new(Arc::clone(&config))),
            cache: Arc::new(ResultCache::new(&config)),
            config,
            source,
            store,
            events,
            rebuild_in_flight: AtomicBool::new(false),
        }
    }

    /// Subscribe to completed-search and indexing events
    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.events.subscribe()
    }

    /// Convenience overload: search with text only
    pub async fn search_text(&self, text: impl Into<String>) -> Result<SearchResults> {
        self.search(SearchQuery::new(text)).await
    }

    /// Convenience overload: search with text and filters
    pub async fn search_with_filters(
        &self,
        text: impl Into<String>,
        filters: Vec<scour_core::SearchFilter>,
    ) -> Result<SearchResults> {
        let mut query = SearchQuery::new(text);
        query.filters = filters;
        self.search(query).await
    }

    /// Execute a structured query.
    ///
    /// Checks the minimum length, consults the cache, then runs the query
    /// engine off the caller's thread under the configured timeout. On
    /// success the cache is populated and a [`SearchEvent::SearchCompleted`]
    /// is published.
    pub async fn search(&self, query: SearchQuery) -> Result<SearchResults> {
        if query.text.chars().count() < self.config.minimum_search_length {
            tracing::debug!(text = %query.text, "Rejecting query below minimum length");
            return Err(SearchError::QueryTooShort {
                minimum: self.config.minimum_search_length,
            });
        }

        if self.config.enable_result_caching {
            if let Some(cached) = self.cache.get(&query) {
                tracing::debug!(text = %query.text, "Serving search from cache");
                return Ok(cached);
            }
        }

        let snapshot = self.store.load()?;
        let engine = Arc::clone(&self.engine);
        let task_query = query.clone();

        let executed = tokio::time::timeout(
            self.config.search_timeout,
            tokio::task::spawn_blocking(move || engine.execute(&snapshot, &task_query)),
        )
        .await;

        let results = match executed {
            Err(_) => {
                tracing::error!(text = %query.text, "Search timed out");
                return Err(SearchError::SearchTimeout);
            }
            Ok(Err(join)) => {
                tracing::error!(text = %query.text, "Search task failed: {}", join);
                return Err(SearchError::SearchFailed(join.to_string()));
            }
            Ok(Ok(Err(e))) => {
                if e.is_input_error() {
                    tracing::debug!(text = %query.text, "Query rejected: {}", e);
                } else {
                    tracing::error!(text = %query.text, "Search failed: {}", e);
                }
                return Err(e);
            }
            Ok(Ok(Ok(results))) => results,
        };

        tracing::debug!(
            text = %query.text,
            total = results.total_count,
            "Search completed"
        );

        if self.config.enable_result_caching {
            self.cache.put(&query, results.clone());
        }
        let _ = self
            .events
            .send(SearchEvent::SearchCompleted(Arc::new(results.clone())));

        Ok(results)
    }

    /// Merge one entity into the live index, fire-and-forget.
    ///
    /// The outcome is observable via logs; the returned handle is only
    /// needed by callers that want to await completion.
    pub fn update_index(&self, entity: Arc<dyn Searchable>) -> JoinHandle<()> {
        let indexer = Arc::clone(&self.indexer);
        tokio::spawn(async move {
            let id = entity.searchable_id().to_string();
            if let Err(e) = indexer.index_one(entity).await {
                tracing::error!(id = %id, "Incremental index update failed: {}", e);
            } else {
                tracing::debug!(id = %id, "Indexed entity");
            }
        })
    }

    /// Re-fetch one entity from the source and re-index it, fire-and-forget
    pub fn reindex(&self, id: impl Into<String>) -> JoinHandle<()> {
        let id = id.into();
        let source = Arc::clone(&self.source);
        let indexer = Arc::clone(&self.indexer);
        tokio::spawn(async move {
            match source.fetch_one(&id).await {
                Ok(Some(entity)) => {
                    if let Err(e) = indexer.index_one(entity).await {
                        tracing::error!(id = %id, "Reindex failed: {}", e);
                    }
                }
                Ok(None) => {
                    tracing::warn!(id = %id, "Reindex skipped: entity not found in source");
                }
                Err(e) => {
                    tracing::error!(id = %id, "Reindex fetch failed: {}", e);
                }
            }
        })
    }

    /// Strip one entity from the live index, fire-and-forget
    pub fn remove_from_index(
        &self,
        id: impl Into<String>,
        entity_type: impl Into<String>,
    ) -> JoinHandle<()> {
        let id = id.into();
        let entity_type = entity_type.into();
        let indexer = Arc::clone(&self.indexer);
        tokio::spawn(async move {
            if let Err(e) = indexer.remove_one(&id, &entity_type).await {
                tracing::error!(id = %id, "Index removal failed: {}", e);
            } else {
                tracing::debug!(id = %id, "Removed entity from index");
            }
        })
    }

    /// Fetch everything from the entity source and rebuild the index.
    ///
    /// Failures leave the previous index serving queries. A successful
    /// rebuild publishes [`SearchEvent::IndexingCompleted`].
    pub async fn rebuild_from_source(&self) -> Result<RebuildReport> {
        self.rebuild_in_flight.store(true, Ordering::SeqCst);
        let outcome = self.rebuild_inner().await;
        self.rebuild_in_flight.store(false, Ordering::SeqCst);
        outcome
    }

    async fn rebuild_inner(&self) -> Result<RebuildReport> {
        let entities = self.source.fetch_all_searchable().await.map_err(|e| {
            SearchError::IndexingFailed(format!("entity source fetch failed: {}", e))
        })?;

        let report = self.indexer.rebuild(entities).await?;
        tracing::info!(
            indexed = report.indexed,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Index rebuild completed"
        );
        if let Some(error) = &report.error {
            tracing::warn!("Rebuild completed with skipped entities: {}", error);
        }

        let _ = self.events.send(SearchEvent::IndexingCompleted {
            indexed: report.indexed,
            elapsed: report.elapsed,
        });
        Ok(report)
    }

    /// Whether a full rebuild is currently running
    pub fn is_rebuilding(&self) -> bool {
        self.rebuild_in_flight.load(Ordering::SeqCst)
    }

    /// Drop all cached results
    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::debug!("Result cache cleared");
    }

    /// Drop the entire index and metadata store
    pub async fn clear_index(&self) -> Result<()> {
        self.store.clear().await?;
        tracing::info!("Index cleared");
        Ok(())
    }

    /// Current index size counters
    pub fn index_stats(&self) -> Result<IndexStats> {
        Ok(self.store.load()?.stats())
    }

    /// Number of cached results, for tests and diagnostics
    pub fn cached_results(&self) -> usize {
        self.cache.len()
    }

    /// Start the background re-indexing scheduler.
    ///
    /// Returns `None` when indexing is disabled in configuration.
    pub fn start_background_indexing(self: &Arc<Self>) -> Option<SchedulerHandle> {
        if !self.config.enable_indexing {
            tracing::info!("Background indexing disabled by configuration");
            return None;
        }
        Some(SchedulerHandle::spawn(
            Arc::clone(self),
            self.config.index_update_interval,
        ))
    }
}
