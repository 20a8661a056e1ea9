//! Configuration module for Sumi-Seek
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, with the deployment environment variables (`BASE_URL`,
//! `ID_LENGTH_CREATION`, `ID_LENGTHS_VALIDATION`, `RESULTS_SIZE`) layered on top.
//!
//! # Example
//!
//! ```no_run
//! use sumi_seek::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawls will stop after {} results", config.crawler.max_results);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, IdentifierConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, config_from_lookup, load_config, load_config_from_env, parse_config,
    ENV_BASE_URL, ENV_ID_LENGTHS_VALIDATION, ENV_ID_LENGTH_CREATION, ENV_RESULTS_SIZE,
};
pub use validation::validate;
