//! Fetch cache with request coalescing
//!
//! Every URI maps to one shared fetch future until the next wholesale clear,
//! so a page linked from many places is requested once per cache generation.
//! There is no per-entry expiry: a timer empties the whole map.

use crate::crawler::fetcher::{FetchFuture, HtmlFetcher};
use dashmap::DashMap;
use futures::future::Shared;
use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Handle to an in-flight or completed fetch
pub type SharedFetch = Shared<FetchFuture>;

/// Coalescing cache in front of an `HtmlFetcher`
pub struct FetchCache {
    fetcher: Arc<dyn HtmlFetcher>,
    entries: DashMap<String, SharedFetch>,
}

impl FetchCache {
    /// Creates an empty cache over `fetcher`
    pub fn new(fetcher: Arc<dyn HtmlFetcher>) -> Self {
        Self {
            fetcher,
            entries: DashMap::new(),
        }
    }

    /// Returns the fetch for `url`, issuing a new one only if none is cached
    ///
    /// Lookup and insert happen under the same shard lock, so concurrent
    /// callers for one URI always receive the same future.
    pub fn fetch(&self, url: &str) -> SharedFetch {
        self.entries
            .entry(url.to_string())
            .or_insert_with(|| {
                tracing::trace!("Fetch cache miss for {}", url);
                self.fetcher.fetch(url).shared()
            })
            .clone()
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry; futures already handed out keep running
    pub fn clear(&self) {
        let dropped = self.entries.len();
        self.entries.clear();
        tracing::debug!("Fetch cache cleared ({} entries)", dropped);
    }

    /// Spawns the task that clears the cache every `period`
    ///
    /// The task holds only a weak reference and exits once the cache is dropped.
    pub fn spawn_eviction(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let cache = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                match cache.upgrade() {
                    Some(cache) => cache.clear(),
                    None => break,
                }
            }
        })
    }
}
