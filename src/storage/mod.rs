//! Storage module for crawl records
//!
//! This module holds the authoritative table of crawl records:
//! - Identifier generation
//! - Status transitions guarded by the terminal DONE state
//! - Accumulation of matching URLs

mod memory;
mod traits;

pub use memory::{random_alphanumeric, IdGenerator, InMemoryStore};
pub use traits::{AnalysisStore, StorageError, StorageResult};

use crate::state::CrawlStatus;
use std::collections::HashSet;

/// Represents one crawl in the analysis table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRecord {
    pub id: String,
    pub status: CrawlStatus,
    pub urls: HashSet<String>,
    pub message: Option<String>,
}

impl CrawlRecord {
    /// Creates a new ACTIVE record with an optional seed URL
    pub fn new(id: String, initial_url: Option<String>) -> Self {
        Self {
            id,
            status: CrawlStatus::Active,
            urls: initial_url.into_iter().collect(),
            message: None,
        }
    }

    /// URLs in lexical order, for stable output
    pub fn sorted_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.urls.iter().cloned().collect();
        urls.sort();
        urls
    }
}
