//! Inverted index, document metadata store, and the shared snapshot holder

use scour_core::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

/// One entry in a term's posting list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    /// Document identifier
    pub doc_id: String,

    /// Entity type of the document
    pub entity_type: String,

    /// Relevance contribution of the term for this document, in [0, 1]
    pub score: f64,
}

/// Display metadata kept 1:1 with index entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Display title
    pub title: String,

    /// Optional display subtitle
    pub subtitle: Option<String>,

    /// Facet key/value pairs
    pub facets: Option<HashMap<String, String>>,

    /// Opaque payload handed back with results
    pub payload: serde_json::Value,
}

/// Index size counters for observability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Documents currently indexed
    pub documents: usize,

    /// Distinct terms in the index
    pub terms: usize,
}

/// An immutable-once-published pairing of inverted index and metadata.
///
/// The index and metadata always swap as a unit, so a reader never sees
/// a new index paired with old metadata or vice versa.
#[derive(Debug, Clone, Default)]
pub struct IndexSnapshot {
    postings: HashMap<String, Vec<Posting>>,
    metadata: HashMap<String, DocumentMetadata>,
}

impl IndexSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact lookup of a term's posting list
    pub fn lookup(&self, term: &str) -> Option<&[Posting]> {
        self.postings.get(term).map(|p| p.as_slice())
    }

    /// All terms currently in the index
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(|k| k.as_str())
    }

    /// Metadata for a document id
    pub fn metadata(&self, doc_id: &str) -> Option<&DocumentMetadata> {
        self.metadata.get(doc_id)
    }

    /// Size counters
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            documents: self.metadata.len(),
            terms: self.postings.len(),
        }
    }

    /// Insert or replace one document's postings and metadata.
    ///
    /// Existing postings for `(doc_id, entity_type)` are stripped first,
    /// so re-indexing the same entity replaces rather than duplicates.
    pub fn upsert(
        &mut self,
        doc_id: &str,
        entity_type: &str,
        term_scores: HashMap<String, f64>,
        metadata: DocumentMetadata,
    ) {
        self.remove(doc_id, entity_type);
        for (term, score) in term_scores {
            self.postings.entry(term).or_default().push(Posting {
                doc_id: doc_id.to_string(),
                entity_type: entity_type.to_string(),
                score,
            });
        }
        self.metadata.insert(doc_id.to_string(), metadata);
    }

    /// Remove one document's postings and metadata together.
    ///
    /// Terms left with zero postings are dropped from the map so empty
    /// entries never accumulate. Metadata is keyed by id alone, so it is
    /// dropped only once the document has no postings left under any
    /// entity type; a removal naming the wrong type leaves the document
    /// fully intact.
    pub fn remove(&mut self, doc_id: &str, entity_type: &str) {
        self.postings.retain(|_, list| {
            list.retain(|p| !(p.doc_id == doc_id && p.entity_type == entity_type));
            !list.is_empty()
        });
        let has_postings = self.postings.values().flatten().any(|p| p.doc_id == doc_id);
        if !has_postings {
            self.metadata.remove(doc_id);
        }
    }
}

/// Shared holder for the live [`IndexSnapshot`].
///
/// Readers load the current `Arc` and keep querying it even if a rebuild
/// swaps in a replacement mid-flight. All mutation goes through the single
/// writer mutex; rebuilds additionally pass a supersede check so a slow
/// rebuild never clobbers a newer one that installed first.
pub struct IndexStore {
    snapshot: RwLock<Arc<IndexSnapshot>>,
    writer: Mutex<()>,
    generation_counter: AtomicU64,
    installed_generation: AtomicU64,
}

impl IndexStore {
    /// Create a store holding an empty snapshot
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(IndexSnapshot::new())),
            writer: Mutex::new(()),
            generation_counter: AtomicU64::new(0),
            installed_generation: AtomicU64::new(0),
        }
    }

    /// Load a consistent snapshot for reading
    pub fn load(&self) -> Result<Arc<IndexSnapshot>> {
        let guard = self
            .snapshot
            .read()
            .map_err(|e| SearchError::SearchFailed(format!("Lock error: {}", e)))?;
        Ok(Arc::clone(&guard))
    }

    /// Claim a generation for a rebuild about to start
    pub fn begin_rebuild(&self) -> u64 {
        self.generation_counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Install a rebuilt snapshot.
    ///
    /// Returns false without installing when a rebuild with a newer
    /// generation has already been installed.
    pub async fn install(&self, snapshot: IndexSnapshot, generation: u64) -> Result<bool> {
        let _writer = self.writer.lock().await;
        if generation <= self.installed_generation.load(Ordering::SeqCst) {
            return Ok(false);
        }
        let mut guard = self
            .snapshot
            .write()
            .map_err(|e| SearchError::IndexingFailed(format!("Lock error: {}", e)))?;
        *guard = Arc::new(snapshot);
        self.installed_generation.store(generation, Ordering::SeqCst);
        Ok(true)
    }

    /// Apply an incremental mutation via copy-on-write.
    ///
    /// Readers observe either the pre- or post-update snapshot, never a
    /// half-written posting list.
    pub async fn update_with<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut IndexSnapshot),
    {
        let _writer = self.writer.lock().await;
        let mut next = (*self.load()?).clone();
        mutate(&mut next);
        let mut guard = self
            .snapshot
            .write()
            .map_err(|e| SearchError::IndexingFailed(format!("Lock error: {}", e)))?;
        *guard = Arc::new(next);
        Ok(())
    }

    /// Replace the live snapshot with an empty one
    pub async fn clear(&self) -> Result<()> {
        self.update_with(|snapshot| *snapshot = IndexSnapshot::new())
            .await
    }
}

impl Default for IndexStore {
    fn default() -> Self {
        Self::new()
    }
}
