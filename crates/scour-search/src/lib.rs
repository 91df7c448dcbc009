//! Scour Search - In-process inverted-index search engine
//!
//! Provides tokenization, term-frequency scoring, fuzzy (edit-distance)
//! fallback matching, faceted filtering, TTL result caching, and a
//! background re-indexing scheduler behind one concurrency-safe façade.
//!
//! # Usage
//!
//! ```ignore
//! use scour_search::{SearchManager, MemorySource};
//! use scour_core::SearchConfig;
//! use std::sync::Arc;
//!
//! let source = Arc::new(MemorySource::new());
//! let manager = Arc::new(SearchManager::new(SearchConfig::default(), source));
//! manager.rebuild_from_source().await?;
//! let results = manager.search_text("project ideas").await?;
//! ```

pub mod cache;
pub mod engine;
pub mod fuzzy;
pub mod index;
pub mod indexer;
pub mod manager;
pub mod scheduler;
pub mod tokenizer;
pub mod traits;

pub use cache::ResultCache;
pub use engine::QueryEngine;
pub use index::{DocumentMetadata, IndexSnapshot, IndexStats, IndexStore, Posting};
pub use indexer::{Indexer, RebuildReport};
pub use manager::{SearchEvent, SearchManager};
pub use scheduler::SchedulerHandle;
pub use tokenizer::{normalize, normalize_unique};
pub use traits::{EntitySource, MemorySource};
