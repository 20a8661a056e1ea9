//! State module for tracking crawl progress
//!
//! - `CrawlStatus`: lifecycle of a crawl record (active, halt, done, failed)

mod crawl_status;

// Re-export main types
pub use crawl_status::CrawlStatus;
