use serde::Deserialize;

/// Main configuration structure for Sumi-Seek
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub identifier: IdentifierConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Origin every crawl starts from; only links under it are followed
    #[serde(rename = "base-url", default)]
    pub base_url: String,

    /// Maximum number of matching URLs recorded per crawl
    #[serde(rename = "max-results", default = "default_max_results")]
    pub max_results: u32,

    /// Interval between wholesale fetch cache clears (seconds)
    #[serde(
        rename = "cache-clear-interval",
        default = "default_cache_clear_interval"
    )]
    pub cache_clear_interval: u64,

    /// Runtime worker threads; 0 picks twice the available parallelism
    #[serde(rename = "worker-threads", default)]
    pub worker_threads: usize,
}

/// Crawl identifier configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IdentifierConfig {
    /// Length of newly generated identifiers
    #[serde(default = "default_id_length")]
    pub length: usize,

    /// Lengths accepted when validating incoming identifiers.
    ///
    /// Empty means "only `length`"; listing older lengths keeps identifiers
    /// created under a previous setting addressable.
    #[serde(rename = "accepted-lengths", default)]
    pub accepted_lengths: Vec<usize>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

pub(crate) const DEFAULT_MAX_RESULTS: u32 = 100;
pub(crate) const DEFAULT_CACHE_CLEAR_INTERVAL: u64 = 180;
pub(crate) const DEFAULT_ID_LENGTH: usize = 8;

fn default_max_results() -> u32 {
    DEFAULT_MAX_RESULTS
}

fn default_cache_clear_interval() -> u64 {
    DEFAULT_CACHE_CLEAR_INTERVAL
}

fn default_id_length() -> usize {
    DEFAULT_ID_LENGTH
}

impl Config {
    /// Builds a configuration for `base_url` with every other setting at its default
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            crawler: CrawlerConfig {
                base_url: base_url.into(),
                ..CrawlerConfig::default()
            },
            identifier: IdentifierConfig::default(),
            user_agent: UserAgentConfig::default(),
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            max_results: DEFAULT_MAX_RESULTS,
            cache_clear_interval: DEFAULT_CACHE_CLEAR_INTERVAL,
            worker_threads: 0,
        }
    }
}

impl CrawlerConfig {
    /// Number of runtime worker threads to start
    pub fn effective_worker_threads(&self) -> usize {
        if self.worker_threads > 0 {
            return self.worker_threads;
        }
        std::thread::available_parallelism()
            .map(|n| n.get() * 2)
            .unwrap_or(4)
    }
}

impl Default for IdentifierConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_ID_LENGTH,
            accepted_lengths: Vec::new(),
        }
    }
}

impl IdentifierConfig {
    /// Lengths an incoming identifier may have
    pub fn effective_accepted_lengths(&self) -> Vec<usize> {
        if self.accepted_lengths.is_empty() {
            vec![self.length]
        } else {
            self.accepted_lengths.clone()
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SumiSeek".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Format: CrawlerName/Version (+ContactURL; ContactEmail)
    pub fn user_agent_string(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}
