//! Background re-indexing scheduler
//!
//! A recurring timer on its own tokio task triggers full rebuilds,
//! independent of query traffic. Rebuild failures are logged and
//! swallowed, leaving the previous index intact.

use crate::manager::SearchManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handle to a running scheduler task
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Spawn the scheduler loop for a manager.
    ///
    /// Overlap guard: a tick that fires while a rebuild is still running
    /// is skipped, so rebuilds never run concurrently.
    pub fn spawn(manager: Arc<SearchManager>, interval: Duration) -> Self {
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick completes immediately; consume it so the
            // initial rebuild happens one full interval after startup.
            ticker.tick().await;

            tracing::info!(interval_secs = interval.as_secs(), "Index scheduler started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if manager.is_rebuilding() {
                            tracing::debug!("Skipping scheduled rebuild: one already in flight");
                            continue;
                        }
                        if let Err(e) = manager.rebuild_from_source().await {
                            tracing::error!("Scheduled rebuild failed: {}", e);
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        tracing::info!("Index scheduler stopping");
                        break;
                    }
                }
            }
        });

        Self { shutdown, task }
    }

    /// Stop the scheduler and wait for the task to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }

    /// Abort the task without waiting
    pub fn abort(&self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{EntitySource, MemorySource};
    use scour_core::{NoteRecord, SearchConfig};

    fn fast_config() -> SearchConfig {
        SearchConfig {
            index_update_interval: Duration::from_millis(25),
            ..SearchConfig::default()
        }
    }

    #[tokio::test]
    async fn test_scheduler_picks_up_source_changes() {
        let source = Arc::new(MemorySource::new());
        let manager = Arc::new(SearchManager::new(fast_config(), source.clone()));
        let handle = manager.start_background_indexing().unwrap();

        source
            .insert(Arc::new(NoteRecord::new("n1", "Meeting Notes")))
            .unwrap();

        // Wait out at least one tick
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(manager.index_stats().unwrap().documents, 1);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_scheduler_survives_source_failures() {
        struct FlakySource {
            inner: MemorySource,
            fail: std::sync::atomic::AtomicBool,
        }

        #[async_trait::async_trait]
        impl EntitySource for FlakySource {
            async fn fetch_all_searchable(
                &self,
            ) -> scour_core::Result<Vec<Arc<dyn scour_core::Searchable>>> {
                if self.fail.swap(false, std::sync::atomic::Ordering::SeqCst) {
                    return Err(scour_core::SearchError::SearchFailed(
                        "transient outage".to_string(),
                    ));
                }
                self.inner.fetch_all_searchable().await
            }

            async fn fetch_one(
                &self,
                id: &str,
            ) -> scour_core::Result<Option<Arc<dyn scour_core::Searchable>>> {
                self.inner.fetch_one(id).await
            }
        }

        let source = Arc::new(FlakySource {
            inner: MemorySource::new(),
            fail: std::sync::atomic::AtomicBool::new(true),
        });
        source
            .inner
            .insert(Arc::new(NoteRecord::new("n1", "Meeting Notes")))
            .unwrap();

        let manager = Arc::new(SearchManager::new(fast_config(), source));
        let handle = manager.start_background_indexing().unwrap();

        // First tick fails and is swallowed; a later tick succeeds
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(manager.index_stats().unwrap().documents, 1);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_scheduler_disabled_by_configuration() {
        let config = SearchConfig {
            enable_indexing: false,
            ..SearchConfig::default()
        };
        let manager = Arc::new(SearchManager::new(config, Arc::new(MemorySource::new())));
        assert!(manager.start_background_indexing().is_none());
    }
}
