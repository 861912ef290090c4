//! Configuration module for Docweave
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use docweave::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("docweave.toml")).unwrap();
//! println!("Crawler will emit at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CacheConfig, Config, CrawlerConfig, UserAgentConfig, DEFAULT_MAX_PAGES,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_page_budget, MAX_PAGE_BUDGET};
