//! Input validation for the crawl boundary
//!
//! Keywords, identifiers, URLs and status strings are checked here before any
//! of them reaches the analysis store.

use crate::state::CrawlStatus;
use thiserror::Error;
use url::Url;

/// Shortest accepted keyword (in characters)
pub const MIN_KEYWORD_LENGTH: usize = 4;

/// Longest accepted keyword (in characters)
pub const MAX_KEYWORD_LENGTH: usize = 32;

/// Validation failures for caller-supplied input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("The keyword must have between {min} and {max} characters, got {actual}")]
    Keyword {
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("The ID must be alphanumeric with one of these lengths: {accepted:?}")]
    Identifier { accepted: Vec<usize> },

    #[error("The URL must be an absolute http(s) URL, got '{0}'")]
    Url(String),

    #[error("The status must be one of active, halt, done, failed; got '{0}'")]
    Status(String),
}

/// Checks that the keyword is between 4 and 32 characters long
pub fn validate_keyword(keyword: &str) -> Result<&str, ValidationError> {
    let actual = keyword.chars().count();
    if (MIN_KEYWORD_LENGTH..=MAX_KEYWORD_LENGTH).contains(&actual) {
        Ok(keyword)
    } else {
        Err(ValidationError::Keyword {
            min: MIN_KEYWORD_LENGTH,
            max: MAX_KEYWORD_LENGTH,
            actual,
        })
    }
}

/// Checks that the identifier is ASCII alphanumeric with an accepted length
pub fn validate_identifier<'a>(
    id: &'a str,
    accepted_lengths: &[usize],
) -> Result<&'a str, ValidationError> {
    let alphanumeric = id.chars().all(|c| c.is_ascii_alphanumeric());
    if alphanumeric && accepted_lengths.contains(&id.len()) {
        Ok(id)
    } else {
        Err(ValidationError::Identifier {
            accepted: accepted_lengths.to_vec(),
        })
    }
}

/// Checks that `url` is an absolute http(s) URL with a host
pub fn validate_url(url: &str) -> Result<String, ValidationError> {
    match Url::parse(url) {
        Ok(parsed)
            if matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some() =>
        {
            Ok(url.to_string())
        }
        _ => Err(ValidationError::Url(url.to_string())),
    }
}

/// Parses a status string case-insensitively
pub fn validate_status(status: &str) -> Result<CrawlStatus, ValidationError> {
    CrawlStatus::parse(status).ok_or_else(|| ValidationError::Status(status.to_string()))
}
