//! Sumi-Seek: a keyword-driven site crawler
//!
//! This crate starts background crawls from a configured base origin and
//! records every same-origin page whose HTML contains a keyword. Each crawl is
//! tracked under a generated identifier that callers poll for partial or final
//! results, and may halt early.

pub mod api;
pub mod config;
pub mod crawler;
pub mod service;
pub mod state;
pub mod storage;
pub mod url;
pub mod validation;

use thiserror::Error;

/// Main error type for Sumi-Seek operations
#[derive(Debug, Error)]
pub enum SeekError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] storage::StorageError),

    #[error(transparent)]
    Validation(#[from] validation::ValidationError),

    #[error(transparent)]
    Fetch(#[from] crawler::FetchError),

    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    #[error("No results for crawl {id}")]
    NoResults { id: String },

    #[error("Status of crawl {id} could not be updated")]
    StatusNotUpdated { id: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid value for environment variable {name}: '{value}'")]
    InvalidEnv { name: String, value: String },
}

// Re-export commonly used types
pub use api::CrawlApi;
pub use config::Config;
pub use crawler::{Coordinator, FetchCache, HtmlFetcher, HttpFetcher};
pub use service::ResultsService;
pub use state::CrawlStatus;
pub use storage::{AnalysisStore, CrawlRecord, InMemoryStore};
