//! Storage traits and error types
//!
//! This module defines the trait interface for analysis store backends and
//! associated error types.

use crate::state::CrawlStatus;
use crate::storage::CrawlRecord;
use crate::validation::ValidationError;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Crawl not found: {0}")]
    NotFound(String),

    #[error("Crawl already exists: {0}")]
    Conflict(String),

    #[error("Invalid record data: {0}")]
    Invalid(#[from] ValidationError),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for analysis store implementations
///
/// Every method takes `&self`: implementations provide their own interior
/// synchronization so unrelated crawls, and many link tasks within one crawl,
/// can call them concurrently without holding any outer lock.
pub trait AnalysisStore: Send + Sync {
    /// Gets a snapshot of the record for `id`
    fn get(&self, id: &str) -> StorageResult<CrawlRecord>;

    /// Creates a new ACTIVE record under a freshly generated identifier
    ///
    /// # Arguments
    ///
    /// * `initial_url` - Optional seed URL stored as the first entry
    ///
    /// # Returns
    ///
    /// The inserted record, or `Conflict` if the generated identifier is taken
    fn create(&self, initial_url: Option<&str>) -> StorageResult<CrawlRecord>;

    /// Adds `url` to the record's URL set
    ///
    /// Returns true if the URL was not already present.
    fn add_url(&self, id: &str, url: &str) -> StorageResult<bool>;

    /// Overwrites status and message unless the record is already DONE
    ///
    /// A DONE record is returned unchanged.
    fn set_status(
        &self,
        id: &str,
        status: CrawlStatus,
        message: Option<String>,
    ) -> StorageResult<CrawlRecord>;

    /// Gets only the current status of the record for `id`
    fn status(&self, id: &str) -> StorageResult<CrawlStatus> {
        self.get(id).map(|record| record.status)
    }
}
