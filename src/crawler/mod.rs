//! Crawler module for keyword crawls
//!
//! This module contains the core crawling logic, including:
//! - Fetching page bodies over HTTP
//! - Coalescing repeated fetches of one URI
//! - Keyword matching and link extraction
//! - Crawl orchestration and cooperative cancellation

mod cache;
mod coordinator;
mod fetcher;
mod parser;

pub use cache::{FetchCache, SharedFetch};
pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, FetchError, FetchFuture, HtmlFetcher, HttpFetcher};
pub use parser::{contains_keyword, extract_links};
