//! Crawler coordinator - keyword crawl orchestration
//!
//! This module drives one crawl from a keyword to a populated record:
//! - Creating the record synchronously and handing back its identifier
//! - Breadth-first exploration of in-scope links, bounded by the result cap
//! - Cooperative cancellation through the record's status
//! - Turning the record into DONE, or FAILED when exploration faults

use crate::config::CrawlerConfig;
use crate::crawler::cache::FetchCache;
use crate::crawler::parser::{contains_keyword, extract_links};
use crate::state::CrawlStatus;
use crate::storage::AnalysisStore;
use crate::url::BaseOrigin;
use crate::SeekError;
use futures::FutureExt;
use std::collections::{HashSet, VecDeque};
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Upper bound on the HALT sampling interval
const MAX_CHUNK_SIZE: usize = 100;

/// Serializes the status check and match count of every link step, across all crawls
static LINK_GATE: Mutex<()> = Mutex::new(());

fn enter_link_gate() -> MutexGuard<'static, ()> {
    // The gate guards no data, so a panic elsewhere leaves nothing inconsistent
    LINK_GATE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Main crawler coordinator structure
///
/// One coordinator serves any number of concurrent crawls; they share the
/// analysis store and the fetch cache.
pub struct Coordinator {
    store: Arc<dyn AnalysisStore>,
    cache: Arc<FetchCache>,
    origin: BaseOrigin,
    max_results: usize,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration (base URL and result cap)
    /// * `store` - Where crawl records live
    /// * `cache` - Coalescing fetch cache shared by every crawl
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(SeekError)` - The base URL does not parse
    pub fn new(
        config: &CrawlerConfig,
        store: Arc<dyn AnalysisStore>,
        cache: Arc<FetchCache>,
    ) -> Result<Self, SeekError> {
        Ok(Self {
            store,
            cache,
            origin: BaseOrigin::parse(&config.base_url)?,
            max_results: config.max_results.max(1) as usize,
        })
    }

    /// The store this coordinator writes to
    pub fn store(&self) -> &Arc<dyn AnalysisStore> {
        &self.store
    }

    /// Starts a crawl for `keyword` and returns its identifier immediately
    ///
    /// Exploration runs on the tokio runtime; poll the store with the
    /// returned identifier to observe progress.
    ///
    /// # Errors
    ///
    /// `SeekError::ProcessingFailed` if the record cannot be created or no
    /// runtime is available. No background work is started in that case.
    pub fn crawl(&self, keyword: &str) -> Result<String, SeekError> {
        self.crawl_with_handle(keyword).map(|(id, _handle)| id)
    }

    /// Like [`Coordinator::crawl`], also returning the exploration task handle
    pub fn crawl_with_handle(&self, keyword: &str) -> Result<(String, JoinHandle<()>), SeekError> {
        tracing::info!("Starting crawl for keyword: {}", keyword);

        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            tracing::error!("Cannot start crawl outside a runtime: {}", e);
            SeekError::ProcessingFailed(e.to_string())
        })?;

        let record = self.store.create(None).map_err(|e| {
            tracing::error!("Failed to create crawl record: {}", e);
            SeekError::ProcessingFailed(e.to_string())
        })?;
        tracing::info!("The following identifier was created: {}", record.id);

        let exploration = Exploration {
            id: record.id.clone(),
            keyword: keyword.to_string(),
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            origin: self.origin.clone(),
            max_results: self.max_results,
        };

        let handle = runtime.spawn(exploration.run_contained());
        Ok((record.id, handle))
    }
}

/// Outcome of one link step
enum Step {
    Continue,
    Aborted,
}

/// State of one running crawl
struct Exploration {
    id: String,
    keyword: String,
    store: Arc<dyn AnalysisStore>,
    cache: Arc<FetchCache>,
    origin: BaseOrigin,
    max_results: usize,
}

impl Exploration {
    /// Runs the crawl, converting a panic into a FAILED record
    async fn run_contained(self) {
        let id = self.id.clone();
        let store = Arc::clone(&self.store);

        if let Err(panic) = AssertUnwindSafe(self.run()).catch_unwind().await {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "crawl task panicked".to_string());
            tracing::error!("Crawl {} panicked: {}", id, message);
            if let Err(e) = store.set_status(&id, CrawlStatus::Failed, Some(message)) {
                tracing::error!("Could not mark crawl {} as failed: {}", id, e);
            }
        }
    }

    /// Runs the crawl and records its terminal status
    async fn run(self) {
        let started = Instant::now();

        let outcome = match self.explore().await {
            Ok(executions) => self
                .store
                .set_status(&self.id, CrawlStatus::Done, None)
                .map(|record| (record, executions))
                .map_err(SeekError::from),
            Err(e) => Err(e),
        };

        match outcome {
            Ok((record, executions)) => {
                tracing::info!(
                    "Time elapsed fetching {} result(s) during {} execution(s) for '{}': {}",
                    record.urls.len(),
                    executions,
                    self.id,
                    format_elapsed(started.elapsed())
                );
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&self, error: SeekError) {
        tracing::error!("Crawl {} failed: {}", self.id, error);
        let _gate = enter_link_gate();
        if let Err(e) = self
            .store
            .set_status(&self.id, CrawlStatus::Failed, Some(error.to_string()))
        {
            tracing::error!("Could not mark crawl {} as failed: {}", self.id, e);
        }
    }

    /// Breadth-first exploration from the base origin
    ///
    /// Returns the number of link executions performed.
    async fn explore(&self) -> Result<u64, SeekError> {
        let base = self.origin.as_str().to_string();
        let html = self.cache.fetch(&base).await?;
        let mut matches = 0usize;

        {
            let _gate = enter_link_gate();
            let status = self.store.status(&self.id)?;
            if status.is_finished() {
                tracing::warn!(
                    "Crawl {} was already {} before exploration started",
                    self.id,
                    status
                );
                return Ok(0);
            }
            if contains_keyword(&html, &self.keyword) {
                self.store.add_url(&self.id, &base)?;
                matches += 1;
            }
        }

        let mut visited: HashSet<String> = HashSet::from([base]);
        let mut queue: VecDeque<Vec<String>> = VecDeque::from([extract_links(&html, &self.origin)]);
        let chunk_size = self.max_results.min(MAX_CHUNK_SIZE) as u64;
        let mut executions = 0u64;

        'drain: while matches < self.max_results {
            let Some(batch) = queue.pop_front() else {
                break;
            };
            tracing::debug!("Crawling batch of {} link(s) for {}", batch.len(), self.id);

            for link in batch {
                if matches >= self.max_results {
                    break 'drain;
                }
                // Claim before fetching
                if !visited.insert(link.clone()) {
                    continue;
                }

                let html = self.cache.fetch(&link).await?;

                let step = {
                    let _gate = enter_link_gate();
                    let status = self.store.status(&self.id)?;
                    let execution = executions;
                    executions += 1;
                    tracing::trace!(
                        "Execution {} with {} queued batch(es); crawl {} is {}",
                        execution,
                        queue.len(),
                        self.id,
                        status
                    );

                    if (execution % chunk_size == 0 && status == CrawlStatus::Halt)
                        || status.is_finished()
                    {
                        tracing::warn!(
                            "Crawl {} was cancelled ({}), skipping further processing at {} result(s)",
                            self.id,
                            status,
                            matches
                        );
                        matches = self.max_results;
                        queue.clear();
                        Step::Aborted
                    } else {
                        if matches < self.max_results && contains_keyword(&html, &self.keyword) {
                            self.store.add_url(&self.id, &link)?;
                            matches += 1;
                            tracing::debug!(
                                "Persisted {} for {} ({} result(s), {} execution(s))",
                                link,
                                self.id,
                                matches,
                                executions
                            );
                        }
                        Step::Continue
                    }
                };

                // An aborted crawl left `matches` at the cap, ending the drain
                if let Step::Continue = step {
                    queue.push_back(extract_links(&html, &self.origin));
                }
            }
        }

        Ok(executions)
    }
}

/// Formats a duration as H:MM:SS
fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
