//! Shared fixtures for the integration tests

use futures::FutureExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use sumi_seek::config::CrawlerConfig;
use sumi_seek::crawler::{FetchError, FetchFuture, HtmlFetcher};
use sumi_seek::service::ResultsResponse;
use sumi_seek::storage::InMemoryStore;
use sumi_seek::{CrawlApi, Coordinator, FetchCache};

pub const BASE: &str = "https://example.com/";

/// Serves a fixed set of pages; anything else fails like a refused connection
pub struct ScriptedFetcher {
    pages: HashMap<String, String>,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedFetcher {
    pub fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, html)| (url.to_string(), html.to_string()))
                .collect(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn refused(url: &str) -> FetchError {
        FetchError::Transport {
            url: url.to_string(),
            message: "Connection refused".to_string(),
        }
    }
}

impl HtmlFetcher for ScriptedFetcher {
    fn fetch(&self, url: &str) -> FetchFuture {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = self
            .pages
            .get(url)
            .cloned()
            .ok_or_else(|| Self::refused(url));
        async move { result }.boxed()
    }
}

/// Builds a coordinator over `fetcher` rooted at [`BASE`]
pub fn coordinator(
    fetcher: Arc<dyn HtmlFetcher>,
    store: Arc<InMemoryStore>,
    max_results: u32,
) -> Coordinator {
    let config = CrawlerConfig {
        base_url: BASE.to_string(),
        max_results,
        ..CrawlerConfig::default()
    };
    Coordinator::new(&config, store, Arc::new(FetchCache::new(fetcher)))
        .expect("Failed to build coordinator")
}

/// Store whose every identifier is `id`
pub fn fixed_id_store(id: &'static str) -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::with_id_generator(
        id.len(),
        Box::new(move |_| id.to_string()),
    ))
}

/// Polls `id` until the crawl is DONE or FAILED
pub async fn wait_until_finished(api: &CrawlApi, id: &str) -> ResultsResponse {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let snapshot = api.get_results(id).expect("Failed to read results");
            if snapshot.status.is_finished() {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("Crawl did not finish in time")
}
