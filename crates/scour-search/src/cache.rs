//! Memoized search results with TTL and size-bound eviction

use scour_core::{SearchConfig, SearchQuery, SearchResults};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct CacheEntry {
    results: SearchResults,
    inserted_at: Instant,
}

/// Result cache keyed by query fingerprint.
///
/// Entries older than `max_age` are never served; when the cache grows
/// past `max_items`, the oldest-inserted entries are evicted first
/// (insertion time, not last access). All mutation is serialized through
/// one mutex, so concurrent callers cannot corrupt the backing map. A
/// poisoned lock degrades to cache misses rather than failing a search.
pub struct ResultCache {
    max_age: Duration,
    max_items: usize,
    entries: Mutex<HashMap<u64, CacheEntry>>,
}

impl ResultCache {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            max_age: config.max_cache_age,
            max_items: config.max_cache_items,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch cached results, lazily evicting the entry if it expired
    pub fn get(&self, query: &SearchQuery) -> Option<SearchResults> {
        let key = query.fingerprint();
        let mut entries = self.entries.lock().ok()?;

        match entries.get(&key) {
            Some(entry) if entry.inserted_at.elapsed() <= self.max_age => {
                Some(entry.results.clone())
            }
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Insert or overwrite, then trim back to the size bound
    pub fn put(&self, query: &SearchQuery, results: SearchResults) {
        let key = query.fingerprint();
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };

        entries.insert(
            key,
            CacheEntry {
                results,
                inserted_at: Instant::now(),
            },
        );

        while entries.len() > self.max_items {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.inserted_at)
                .map(|(k, _)| *k);
            match oldest {
                Some(k) => entries.remove(&k),
                None => break,
            };
        }
    }

    /// Drop every entry
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// Current entry count
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
