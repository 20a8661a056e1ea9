use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Overrides `crawler.base-url`
pub const ENV_BASE_URL: &str = "BASE_URL";

/// Overrides `identifier.length`
pub const ENV_ID_LENGTH_CREATION: &str = "ID_LENGTH_CREATION";

/// Overrides `identifier.accepted-lengths` (comma separated)
pub const ENV_ID_LENGTHS_VALIDATION: &str = "ID_LENGTHS_VALIDATION";

/// Overrides `crawler.max-results`
pub const ENV_RESULTS_SIZE: &str = "RESULTS_SIZE";

/// Loads and parses a configuration file from the given path
///
/// Environment overrides are applied on top of the file before validation.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_seek::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Base URL: {}", config.crawler.base_url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content, |name| std::env::var(name).ok())?;
    Ok(config)
}

/// Builds a configuration from environment variables alone
///
/// `BASE_URL` is mandatory; everything else falls back to its default.
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    config_from_lookup(|name| std::env::var(name).ok())
}

/// Parses TOML content, applies overrides from `lookup`, and validates
pub fn parse_config<F>(content: &str, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: Config = toml::from_str(content)?;
    apply_env_overrides(&mut config, lookup)?;
    validate(&config)?;
    Ok(config)
}

/// Builds and validates a default configuration using only `lookup` values
pub fn config_from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::with_base_url(String::new());
    apply_env_overrides(&mut config, lookup)?;
    validate(&config)?;
    Ok(config)
}

/// Applies the deployment environment variables to `config`
///
/// Unset and blank variables leave the corresponding setting untouched.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(base_url) = read(ENV_BASE_URL) {
        config.crawler.base_url = base_url.trim().to_string();
    }

    if let Some(value) = read(ENV_ID_LENGTH_CREATION) {
        config.identifier.length = parse_env_number(ENV_ID_LENGTH_CREATION, &value)?;
    }

    if let Some(value) = read(ENV_ID_LENGTHS_VALIDATION) {
        config.identifier.accepted_lengths = value
            .split(',')
            .map(|part| parse_env_number(ENV_ID_LENGTHS_VALIDATION, part))
            .collect::<Result<Vec<usize>, _>>()?;
    }

    if let Some(value) = read(ENV_RESULTS_SIZE) {
        config.crawler.max_results = parse_env_number(ENV_RESULTS_SIZE, &value)?;
    }

    Ok(())
}

fn parse_env_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        name: name.to_string(),
        value: value.to_string(),
    })
}
