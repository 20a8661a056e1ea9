//! Read and update surface over the analysis store
//!
//! Lookups of unknown identifiers are reported as `NoResults` when reading
//! and as `StatusNotUpdated` when updating.

use crate::state::CrawlStatus;
use crate::storage::{AnalysisStore, CrawlRecord, StorageError};
use crate::SeekError;
use serde::Serialize;
use std::sync::Arc;

/// Snapshot of a crawl as reported to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsResponse {
    pub id: String,
    pub status: CrawlStatus,
    pub urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<CrawlRecord> for ResultsResponse {
    fn from(record: CrawlRecord) -> Self {
        let urls = record.sorted_urls();
        Self {
            id: record.id,
            status: record.status,
            urls,
            message: record.message,
        }
    }
}

/// Results service
pub struct ResultsService {
    store: Arc<dyn AnalysisStore>,
}

impl ResultsService {
    pub fn new(store: Arc<dyn AnalysisStore>) -> Self {
        Self { store }
    }

    /// Returns the crawl as seen right now
    pub fn list(&self, id: &str) -> Result<ResultsResponse, SeekError> {
        tracing::info!("Retrieving results for ID: {}", id);
        match self.store.get(id) {
            Ok(record) => Ok(record.into()),
            Err(StorageError::NotFound(_)) => Err(SeekError::NoResults { id: id.to_string() }),
            Err(e) => Err(e.into()),
        }
    }

    /// Overrides the crawl status on behalf of a caller
    ///
    /// The response reflects the stored record, so a DONE crawl still
    /// reports `done` whatever was requested.
    pub fn update_status(
        &self,
        id: &str,
        status: CrawlStatus,
    ) -> Result<ResultsResponse, SeekError> {
        tracing::info!("Updating crawl {} status to {}", id, status);
        match self.store.set_status(id, status, None) {
            Ok(record) => Ok(record.into()),
            Err(StorageError::NotFound(_)) => Err(SeekError::StatusNotUpdated {
                id: id.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}
