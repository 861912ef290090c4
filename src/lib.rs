//! Docweave: documentation crawler and compiler
//!
//! This crate crawls a seed documentation page for a package, extracts links,
//! code examples and API entries from every visited page, and compiles a bounded
//! set of pages into a single Markdown document.

pub mod cache;
pub mod compiler;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod markup;
pub mod page;
pub mod resolver;
pub mod url;

use std::fmt;
use thiserror::Error;

/// Main error type for Docweave operations
#[derive(Debug, Error)]
pub enum DocweaveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Crawl(#[from] CrawlError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocweaveError {
    /// Returns the failure category reported to callers
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::InvalidConfig,
            Self::Fetch(_) | Self::Client(_) => ErrorKind::NetworkFailure,
            Self::Crawl(CrawlError::Exhausted { .. }) => ErrorKind::CrawlExhausted,
            Self::Crawl(CrawlError::InvalidBudget { .. }) => ErrorKind::InvalidConfig,
            Self::UrlError(_) => ErrorKind::InvalidUrl,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

/// Failure categories surfaced by [`DocweaveError::kind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NetworkFailure,
    CrawlExhausted,
    InvalidConfig,
    InvalidUrl,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NetworkFailure => "NetworkFailure",
            Self::CrawlExhausted => "CrawlExhausted",
            Self::InvalidConfig => "InvalidConfig",
            Self::InvalidUrl => "InvalidUrl",
            Self::Io => "Io",
        };
        f.write_str(name)
    }
}

/// Network failures raised by a fetcher
///
/// These are absorbed per page by the crawler and only surface through
/// [`CrawlError::Exhausted`] when no page could be produced.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Unusable content type '{content_type}' for {url}")]
    ContentMismatch { url: String, content_type: String },

    #[error("{url} redirected off the crawl host to {target}")]
    OffHostRedirect { url: String, target: String },
}

/// Crawl-level failures
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("No pages could be crawled from {seed}: {reason}")]
    Exhausted { seed: String, reason: String },

    #[error("Page budget must be between 1 and {}, got {max_pages}", config::MAX_PAGE_BUDGET)]
    InvalidBudget { max_pages: usize },
}

/// Cache failures
///
/// Never propagated out of the cache; they are logged and degrade to a miss.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to read cache entry {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write cache entry {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("Corrupt cache entry {path}: {source}")]
    Corrupt {
        path: String,
        source: serde_json::Error,
    },
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
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Invalid package name: '{0}'")]
    InvalidSubject(String),
}

/// Result type alias for Docweave operations
pub type Result<T> = std::result::Result<T, DocweaveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use cache::PageCache;
pub use compiler::{compile, compile_at};
pub use config::Config;
pub use crawler::{crawl_and_compile, CrawlRequest, Crawler, Fetcher, HttpFetcher};
pub use extract::Extractor;
pub use markup::Node;
pub use page::{ApiEntry, CodeExample, PageRecord};
