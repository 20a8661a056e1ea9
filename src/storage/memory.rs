//! In-memory storage implementation
//!
//! Records live in a `DashMap` keyed by identifier, so per-record
//! read-modify-write (`add_url`, `set_status`) is atomic under the shard lock
//! and independent records never contend on one global lock.

use crate::state::CrawlStatus;
use crate::storage::traits::{AnalysisStore, StorageError, StorageResult};
use crate::storage::CrawlRecord;
use crate::validation::validate_url;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

/// Produces a candidate identifier of the requested length
pub type IdGenerator = Box<dyn Fn(usize) -> String + Send + Sync>;

/// Generates a random ASCII alphanumeric string of `len` characters
pub fn random_alphanumeric(len: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Process-local analysis store
pub struct InMemoryStore {
    records: DashMap<String, CrawlRecord>,
    id_length: usize,
    id_generator: IdGenerator,
}

impl InMemoryStore {
    /// Creates an empty store generating random identifiers of `id_length`
    pub fn new(id_length: usize) -> Self {
        Self::with_id_generator(id_length, Box::new(random_alphanumeric))
    }

    /// Creates an empty store with a custom identifier source
    pub fn with_id_generator(id_length: usize, id_generator: IdGenerator) -> Self {
        Self {
            records: DashMap::new(),
            id_length,
            id_generator,
        }
    }

    /// Number of records currently held
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Removes every record
    ///
    /// Administrative reset; crawls still running against cleared identifiers
    /// will fail their next lookup.
    pub fn clear(&self) {
        self.records.clear();
        tracing::debug!("Analysis store cleared");
    }
}

impl AnalysisStore for InMemoryStore {
    fn get(&self, id: &str) -> StorageResult<CrawlRecord> {
        tracing::trace!("Retrieving crawl {}", id);
        self.records
            .get(id)
            .map(|record| record.clone())
            .ok_or_else(|| {
                tracing::error!("Crawl was not found: {}", id);
                StorageError::NotFound(id.to_string())
            })
    }

    fn create(&self, initial_url: Option<&str>) -> StorageResult<CrawlRecord> {
        let initial_url = initial_url.map(validate_url).transpose()?;
        let id = (self.id_generator)(self.id_length);
        tracing::debug!("Creating crawl {} (seed: {:?})", id, initial_url);

        match self.records.entry(id) {
            Entry::Occupied(existing) => {
                tracing::error!(
                    "Crawl already exists: {} with {} urls",
                    existing.key(),
                    existing.get().urls.len()
                );
                Err(StorageError::Conflict(existing.key().clone()))
            }
            Entry::Vacant(slot) => {
                let record = CrawlRecord::new(slot.key().clone(), initial_url);
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    fn add_url(&self, id: &str, url: &str) -> StorageResult<bool> {
        tracing::trace!("Adding url {} to crawl {}", url, id);
        let mut record = self.records.get_mut(id).ok_or_else(|| {
            tracing::error!("Error while adding url {} to unknown crawl {}", url, id);
            StorageError::NotFound(id.to_string())
        })?;
        Ok(record.urls.insert(url.to_string()))
    }

    fn set_status(
        &self,
        id: &str,
        status: CrawlStatus,
        message: Option<String>,
    ) -> StorageResult<CrawlRecord> {
        let mut record = self.records.get_mut(id).ok_or_else(|| {
            tracing::error!("Error while updating unknown crawl {} to {}", id, status);
            StorageError::NotFound(id.to_string())
        })?;

        if record.status.is_terminal() {
            tracing::warn!(
                "Current crawl status {} does not allow update to {}",
                record.status,
                status
            );
        } else {
            tracing::debug!("Crawl {} status {} -> {}", id, record.status, status);
            record.status = status;
            record.message = message;
        }

        Ok(record.clone())
    }

    fn status(&self, id: &str) -> StorageResult<CrawlStatus> {
        self.records
            .get(id)
            .map(|record| record.status)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }
}
