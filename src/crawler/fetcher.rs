//! HTTP fetcher implementation
//!
//! This module is the transport seam of the crawler:
//! - The `HtmlFetcher` trait: fetch the body of a URI without blocking
//! - `HttpFetcher`: the `reqwest` implementation used in production
//! - Building HTTP clients with proper user agent strings
//! - Error classification

use crate::config::UserAgentConfig;
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;

/// Future resolving to the body of a fetched page
pub type FetchFuture = BoxFuture<'static, Result<String, FetchError>>;

/// Errors raised while fetching a page
///
/// Cloneable so a single coalesced fetch can hand its outcome to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Failed to read body from {url}: {message}")]
    Body { url: String, message: String },
}

/// Source of page bodies
///
/// The returned future must not borrow from `self` so it can be shared by
/// the fetch cache and awaited from any task.
pub trait HtmlFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> FetchFuture;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sumi_seek::config::UserAgentConfig;
/// use sumi_seek::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent_string())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// `reqwest`-backed fetcher
///
/// Returns the body for any HTTP status; only transport and body-decoding
/// failures are errors.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from `config`
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl HtmlFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> FetchFuture {
        let client = self.client.clone();
        let url = url.to_string();

        async move {
            tracing::debug!("Fetching HTML data from {}", url);

            let response = client
                .get(&url)
                .send()
                .await
                .map_err(|e| FetchError::Transport {
                    url: url.clone(),
                    message: classify_request_error(&e),
                })?;

            let status = response.status();
            if !status.is_success() {
                tracing::debug!("{} answered HTTP {}", url, status.as_u16());
            }

            response.text().await.map_err(|e| FetchError::Body {
                url: url.clone(),
                message: e.to_string(),
            })
        }
        .boxed()
    }
}

fn classify_request_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    }
}
