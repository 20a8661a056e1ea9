use crate::config::types::{Config, CrawlerConfig, IdentifierConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Longest identifier the generator is allowed to produce
const MAX_ID_LENGTH: usize = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_identifier_config(&config.identifier)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.base_url.trim().is_empty() {
        return Err(ConfigError::Validation(
            "base_url is required (set crawler.base-url or BASE_URL)".to_string(),
        ));
    }

    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", config.base_url, e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url must use http or https, got '{}'",
            base.scheme()
        )));
    }

    if base.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' has no host",
            config.base_url
        )));
    }

    if config.max_results < 1 {
        return Err(ConfigError::Validation(format!(
            "max_results must be >= 1, got {}",
            config.max_results
        )));
    }

    if config.cache_clear_interval < 1 {
        return Err(ConfigError::Validation(format!(
            "cache_clear_interval must be >= 1s, got {}s",
            config.cache_clear_interval
        )));
    }

    Ok(())
}

/// Validates identifier configuration
fn validate_identifier_config(config: &IdentifierConfig) -> Result<(), ConfigError> {
    if config.length < 1 || config.length > MAX_ID_LENGTH {
        return Err(ConfigError::Validation(format!(
            "identifier length must be between 1 and {}, got {}",
            MAX_ID_LENGTH, config.length
        )));
    }

    if let Some(bad) = config
        .accepted_lengths
        .iter()
        .find(|&&len| len < 1 || len > MAX_ID_LENGTH)
    {
        return Err(ConfigError::Validation(format!(
            "accepted identifier lengths must be between 1 and {}, got {}",
            MAX_ID_LENGTH, bad
        )));
    }

    // Fresh identifiers must pass our own validation
    if !config.effective_accepted_lengths().contains(&config.length) {
        return Err(ConfigError::Validation(format!(
            "accepted identifier lengths {:?} do not include the creation length {}",
            config.accepted_lengths, config.length
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| ConfigError::Validation(format!("Invalid email format: '{}'", email)))?;

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
