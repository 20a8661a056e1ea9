//! Inbound crawl interface
//!
//! `CrawlApi` validates caller input and forwards it to the coordinator and
//! the results service. Transports (HTTP routes, the command line) sit on top
//! of it and only translate its responses and errors.

use crate::config::{Config, IdentifierConfig};
use crate::crawler::{Coordinator, FetchCache, HttpFetcher};
use crate::service::{ResultsResponse, ResultsService};
use crate::storage::{AnalysisStore, InMemoryStore};
use crate::validation::{validate_identifier, validate_keyword, validate_status};
use crate::SeekError;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Response to a crawl request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlResponse {
    pub id: String,
}

/// Validated entry point for starting, reading and steering crawls
pub struct CrawlApi {
    coordinator: Coordinator,
    results: ResultsService,
    accepted_lengths: Vec<usize>,
}

impl CrawlApi {
    /// Wires the production stack described by `config`
    ///
    /// Builds the in-memory store, the HTTP fetcher behind a fetch cache and
    /// starts the cache's periodic clear.
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime.
    pub fn from_config(config: &Config) -> Result<Self, SeekError> {
        let store: Arc<dyn AnalysisStore> = Arc::new(InMemoryStore::new(config.identifier.length));
        let fetcher = HttpFetcher::new(&config.user_agent)?;
        let cache = Arc::new(FetchCache::new(Arc::new(fetcher)));
        cache.spawn_eviction(Duration::from_secs(config.crawler.cache_clear_interval));

        let coordinator = Coordinator::new(&config.crawler, store, cache)?;
        Ok(Self::new(coordinator, &config.identifier))
    }

    /// Builds the API around an existing coordinator
    pub fn new(coordinator: Coordinator, identifier: &IdentifierConfig) -> Self {
        let results = ResultsService::new(Arc::clone(coordinator.store()));
        Self {
            coordinator,
            results,
            accepted_lengths: identifier.effective_accepted_lengths(),
        }
    }

    /// Starts a crawl for `keyword` (4 to 32 characters)
    pub fn start_crawl(&self, keyword: &str) -> Result<CrawlResponse, SeekError> {
        let keyword = validate_keyword(keyword)?;
        let id = self.coordinator.crawl(keyword)?;
        Ok(CrawlResponse { id })
    }

    /// Returns partial or final results for crawl `id`
    pub fn get_results(&self, id: &str) -> Result<ResultsResponse, SeekError> {
        let id = validate_identifier(id, &self.accepted_lengths)?;
        self.results.list(id)
    }

    /// Sets the status of crawl `id` from its wire name (`active`, `halt`, `done`, `failed`)
    pub fn set_crawl_status(&self, id: &str, status: &str) -> Result<ResultsResponse, SeekError> {
        let id = validate_identifier(id, &self.accepted_lengths)?;
        let status = validate_status(status)?;
        self.results.update_status(id, status)
    }
}
