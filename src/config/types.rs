use crate::cache::DEFAULT_TTL_HOURS;
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::PathBuf;

/// Default number of pages a crawl may emit
pub const DEFAULT_MAX_PAGES: usize = 5;

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for Docweave
///
/// Every section is optional; missing values fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub cache: CacheConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages emitted by one crawl
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Timeout for a single HTTP request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Page cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding cache entries; platform cache dir when unset
    #[serde(rename = "directory")]
    pub directory: Option<PathBuf>,

    /// Hours before a cached page is considered stale
    #[serde(rename = "ttl-hours")]
    pub ttl_hours: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            directory: None,
            ttl_hours: DEFAULT_TTL_HOURS,
        }
    }
}

impl CacheConfig {
    /// Resolves the cache directory
    ///
    /// Falls back to the platform cache directory, then to the system temp dir.
    pub fn directory(&self) -> PathBuf {
        if let Some(dir) = &self.directory {
            return dir.clone();
        }

        ProjectDirs::from("", "", env!("CARGO_PKG_NAME"))
            .map(|dirs| dirs.cache_dir().join("pages"))
            .unwrap_or_else(|| std::env::temp_dir().join("docweave-cache"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.crawler.max_pages, 5);
        assert_eq!(config.crawler.request_timeout_secs, 30);
        assert_eq!(config.cache.ttl_hours, 24);
        assert_eq!(config.user_agent.crawler_name, "docweave");
    }

    #[test]
    fn test_header_value() {
        let mut ua = UserAgentConfig {
            crawler_name: "docweave".to_string(),
            crawler_version: "1.2.3".to_string(),
            contact_url: None,
        };
        assert_eq!(ua.header_value(), "docweave/1.2.3");

        ua.contact_url = Some("https://example.com/bot".to_string());
        assert_eq!(ua.header_value(), "docweave/1.2.3 (+https://example.com/bot)");
    }

    #[test]
    fn test_explicit_cache_directory() {
        let cache = CacheConfig {
            directory: Some(PathBuf::from("/tmp/docweave-test")),
            ttl_hours: 24,
        };
        assert_eq!(cache.directory(), PathBuf::from("/tmp/docweave-test"));
    }
}
