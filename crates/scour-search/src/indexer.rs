//! Builds and maintains the inverted index and metadata store

use crate::index::{DocumentMetadata, IndexSnapshot, IndexStore};
use crate::tokenizer::normalize;
use scour_core::{Result, SearchError, Searchable};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Indexing weight for primary text
const PRIMARY_WEIGHT: u32 = 3;
/// Indexing weight for secondary text
const SECONDARY_WEIGHT: u32 = 2;
/// Indexing weight for extra fields
const EXTRA_WEIGHT: u32 = 1;

/// Weighted term frequencies saturate to a score of 1.0 at this count
const FREQUENCY_CEILING: f64 = 10.0;

/// Outcome of a full rebuild
#[derive(Debug, Clone)]
pub struct RebuildReport {
    /// Entities successfully indexed
    pub indexed: usize,

    /// Wall time for the rebuild
    pub elapsed: Duration,

    /// Non-fatal error describing entities that were skipped, if any
    pub error: Option<String>,
}

/// One entity tokenized and weighted, ready to enter a snapshot
struct PreparedDocument {
    doc_id: String,
    entity_type: String,
    term_scores: HashMap<String, f64>,
    metadata: DocumentMetadata,
}

/// Consumes searchable entities and populates the index store
pub struct Indexer {
    store: Arc<IndexStore>,
}

impl Indexer {
    pub fn new(store: Arc<IndexStore>) -> Self {
        Self { store }
    }

    /// Rebuild the index and metadata store from scratch.
    ///
    /// Builds a fresh snapshot off to the side, then atomically swaps it
    /// in; readers never observe a partially built index. One bad entity
    /// is skipped and reported, never aborting the rest of the batch.
    pub async fn rebuild(&self, entities: Vec<Arc<dyn Searchable>>) -> Result<RebuildReport> {
        let generation = self.store.begin_rebuild();
        let started = Instant::now();

        let (snapshot, indexed, skipped) = tokio::task::spawn_blocking(move || {
            let mut snapshot = IndexSnapshot::new();
            let mut indexed = 0usize;
            let mut skipped: Vec<String> = Vec::new();

            for entity in &entities {
                match prepare_document(entity.as_ref()) {
                    Ok(doc) => {
                        snapshot.upsert(&doc.doc_id, &doc.entity_type, doc.term_scores, doc.metadata);
                        indexed += 1;
                    }
                    Err(e) => {
                        tracing::warn!("Skipping entity during rebuild: {}", e);
                        skipped.push(e.to_string());
                    }
                }
            }

            (snapshot, indexed, skipped)
        })
        .await
        .map_err(|e| SearchError::IndexingFailed(format!("Rebuild task failed: {}", e)))?;

        let installed = self.store.install(snapshot, generation).await?;
        let elapsed = started.elapsed();

        if !installed {
            tracing::info!(
                generation,
                "Discarding rebuild superseded by a newer one"
            );
        }

        Ok(RebuildReport {
            indexed,
            elapsed,
            error: if skipped.is_empty() {
                None
            } else {
                Some(format!("{} entities skipped: {}", skipped.len(), skipped.join("; ")))
            },
        })
    }

    /// Merge one entity's postings into the live index.
    ///
    /// Safe to call concurrently with in-flight queries: readers see
    /// either the pre- or post-update snapshot.
    pub async fn index_one(&self, entity: Arc<dyn Searchable>) -> Result<()> {
        let doc = prepare_document(entity.as_ref())?;
        self.store
            .update_with(|snapshot| {
                snapshot.upsert(&doc.doc_id, &doc.entity_type, doc.term_scores, doc.metadata);
            })
            .await
    }

    /// Strip an entity's postings and metadata from the live index
    pub async fn remove_one(&self, doc_id: &str, entity_type: &str) -> Result<()> {
        self.store
            .update_with(|snapshot| snapshot.remove(doc_id, entity_type))
            .await
    }

    /// Drop everything from the live index
    pub async fn clear(&self) -> Result<()> {
        self.store.clear().await
    }
}

/// Tokenize and weight one entity's fields.
///
/// Per-term score is `min(1.0, weighted_frequency / 10.0)`.
fn prepare_document(entity: &dyn Searchable) -> Result<PreparedDocument> {
    let doc_id = entity.searchable_id().to_string();
    let entity_type = entity.entity_type().to_string();

    if doc_id.is_empty() {
        return Err(SearchError::IndexingFailed(
            "entity has an empty id".to_string(),
        ));
    }
    if entity_type.is_empty() {
        return Err(SearchError::IndexingFailed(format!(
            "entity {:?} has an empty type name",
            doc_id
        )));
    }

    let mut frequencies: HashMap<String, u32> = HashMap::new();
    let mut weigh = |text: &str, weight: u32| {
        for term in normalize(text) {
            *frequencies.entry(term).or_insert(0) += weight;
        }
    };

    weigh(&entity.primary_text(), PRIMARY_WEIGHT);
    if let Some(secondary) = entity.secondary_text() {
        weigh(&secondary, SECONDARY_WEIGHT);
    }
    for (_, value) in entity.extra_fields() {
        weigh(&value, EXTRA_WEIGHT);
    }

    let term_scores = frequencies
        .into_iter()
        .map(|(term, freq)| (term, (f64::from(freq) / FREQUENCY_CEILING).min(1.0)))
        .collect();

    let metadata = DocumentMetadata {
        title: entity.primary_text(),
        subtitle: entity.secondary_text(),
        facets: entity.facets(),
        payload: entity.raw_payload(),
    };

    Ok(PreparedDocument {
        doc_id,
        entity_type,
        term_scores,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scour_core::NoteRecord;

    fn note(id: &str, title: &str, content: &str) -> Arc<dyn Searchable> {
        Arc::new(NoteRecord::new(id, title).with_content(content))
    }

    #[tokio::test]
    async fn test_rebuild_populates_index() {
        let store = Arc::new(IndexStore::new());
        let indexer = Indexer::new(Arc::clone(&store));

        let report = indexer
            .rebuild(vec![
                note("n1", "Meeting Notes", "quarterly roadmap"),
                note("n2", "Shopping List", "milk eggs"),
            ])
            .await
            .unwrap();

        assert_eq!(report.indexed, 2);
        assert!(report.error.is_none());

        let snapshot = store.load().unwrap();
        assert_eq!(snapshot.stats().documents, 2);
        assert!(snapshot.lookup("meeting").is_some());
        assert!(snapshot.lookup("milk").is_some());
    }

    #[tokio::test]
    async fn test_rebuild_skips_bad_entity_without_aborting() {
        let store = Arc::new(IndexStore::new());
        let indexer = Indexer::new(Arc::clone(&store));

        let report = indexer
            .rebuild(vec![
                note("", "Broken", "no id"),
                note("n2", "Valid Note", "content"),
            ])
            .await
            .unwrap();

        assert_eq!(report.indexed, 1);
        assert!(report.error.unwrap().contains("1 entities skipped"));
        assert!(store.load().unwrap().lookup("valid").is_some());
    }

    #[tokio::test]
    async fn test_index_one_is_idempotent() {
        let store = Arc::new(IndexStore::new());
        let indexer = Indexer::new(Arc::clone(&store));

        let entity = note("n1", "Project Ideas", "rust search engine");
        indexer.index_one(Arc::clone(&entity)).await.unwrap();
        let once = store.load().unwrap().lookup("project").unwrap().to_vec();

        indexer.index_one(entity).await.unwrap();
        let twice = store.load().unwrap().lookup("project").unwrap().to_vec();

        assert_eq!(once, twice);
        assert_eq!(store.load().unwrap().stats().documents, 1);
    }

    #[tokio::test]
    async fn test_remove_one_roundtrip() {
        let store = Arc::new(IndexStore::new());
        let indexer = Indexer::new(Arc::clone(&store));

        indexer
            .index_one(note("n1", "Meeting Notes", "roadmap"))
            .await
            .unwrap();
        indexer.remove_one("n1", "Note").await.unwrap();

        let snapshot = store.load().unwrap();
        assert!(snapshot.metadata("n1").is_none());
        assert_eq!(snapshot.stats().terms, 0);
    }

    #[test]
    fn test_field_weights_and_score_ceiling() {
        let entity = NoteRecord::new("n1", "alpha")
            .with_content("alpha alpha")
            .with_tag("alpha");
        let doc = prepare_document(&entity).unwrap();

        // 1x3 (primary) + 2x2 (secondary) + 1x1 (extra) = 8 -> 0.8
        assert!((doc.term_scores["alpha"] - 0.8).abs() < 1e-9);

        let heavy = NoteRecord::new("n2", "beta beta beta beta");
        let doc = prepare_document(&heavy).unwrap();
        // 4x3 = 12, clamped at the ceiling
        assert!((doc.term_scores["beta"] - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_index_one_no_searchable_content() {
        let store = Arc::new(IndexStore::new());
        let indexer = Indexer::new(Arc::clone(&store));

        // All-stopword title tokenizes to nothing: metadata is kept,
        // postings are simply absent.
        indexer.index_one(note("n1", "the and of", "")).await.unwrap();
        let snapshot = store.load().unwrap();
        assert!(snapshot.metadata("n1").is_some());
        assert_eq!(snapshot.stats().terms, 0);

        // Removal still clears the metadata despite the empty posting set
        indexer.remove_one("n1", "Note").await.unwrap();
        assert!(store.load().unwrap().metadata("n1").is_none());
    }
}
