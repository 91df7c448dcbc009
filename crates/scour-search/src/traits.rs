//! Collaborator traits

use async_trait::async_trait;
use scour_core::{Result, SearchError, Searchable};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Supplier of raw searchable entities.
///
/// Implemented by the external persistence layer; the engine awaits these
/// before it begins tokenizing, and never performs fetching itself.
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// Fetch every searchable entity for a full rebuild
    async fn fetch_all_searchable(&self) -> Result<Vec<Arc<dyn Searchable>>>;

    /// Fetch one entity by id for an incremental update
    async fn fetch_one(&self, id: &str) -> Result<Option<Arc<dyn Searchable>>>;
}

/// In-memory entity source
///
/// Useful for testing and small fixed datasets.
#[derive(Default)]
pub struct MemorySource {
    entities: RwLock<HashMap<String, Arc<dyn Searchable>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entity
    pub fn insert(&self, entity: Arc<dyn Searchable>) -> Result<()> {
        let mut entities = self
            .entities
            .write()
            .map_err(|e| SearchError::SearchFailed(format!("Lock error: {}", e)))?;
        entities.insert(entity.searchable_id().to_string(), entity);
        Ok(())
    }

    /// Remove an entity by id
    pub fn remove(&self, id: &str) -> Result<()> {
        let mut entities = self
            .entities
            .write()
            .map_err(|e| SearchError::SearchFailed(format!("Lock error: {}", e)))?;
        entities.remove(id);
        Ok(())
    }
}

#[async_trait]
impl EntitySource for MemorySource {
    async fn fetch_all_searchable(&self) -> Result<Vec<Arc<dyn Searchable>>> {
        let entities = self
            .entities
            .read()
            .map_err(|e| SearchError::SearchFailed(format!("Lock error: {}", e)))?;
        Ok(entities.values().cloned().collect())
    }

    async fn fetch_one(&self, id: &str) -> Result<Option<Arc<dyn Searchable>>> {
        let entities = self
            .entities
            .read()
            .map_err(|e| SearchError::SearchFailed(format!("Lock error: {}", e)))?;
        Ok(entities.get(id).cloned())
    }
}
