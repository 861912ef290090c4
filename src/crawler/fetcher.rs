//! HTTP fetcher implementation
//!
//! This module handles all network retrieval for the crawler:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests for documentation pages
//! - Error classification into [`FetchError`] variants
//! - Parsing the response body into the generic markup tree

use crate::config::{Config, UserAgentConfig};
use crate::markup::{parse_document, Element};
use crate::FetchError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// A parsed document and the URL it was finally served from
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    /// Location after any redirects; relative links resolve against it
    pub url: Url,

    pub document: Element,
}

impl FetchedPage {
    pub fn new(url: Url, document: Element) -> Self {
        Self { url, document }
    }
}

/// Source of parsed documents
///
/// The crawler depends on this seam rather than on HTTP directly, so tests can
/// serve canned markup.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Retrieves `url` and returns its parsed markup tree with the final URL
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Per-request timeout
///
/// # Example
///
/// ```no_run
/// use docweave::config::UserAgentConfig;
/// use docweave::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher from configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.crawler.request_timeout_secs);
        let client = build_http_client(&config.user_agent, timeout)?;
        Ok(Self { client })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Fetches a page with a single GET request
    ///
    /// # Failure Mapping
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Timeout | `FetchError::Timeout` |
    /// | Connection / transport error | `FetchError::Http` |
    /// | Non-2xx status | `FetchError::Status` |
    /// | Non-textual Content-Type | `FetchError::ContentMismatch` |
    ///
    /// Redirects are followed; the returned page carries the final URL.
    /// There is no retry; the crawler absorbs the failure for this page.
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let final_url = response.url().clone();
        if final_url != *url {
            tracing::debug!("{} redirected to {}", url, final_url);
        }

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_textual(&content_type) {
            return Err(FetchError::ContentMismatch {
                url: url.to_string(),
                content_type,
            });
        }

        let body = response.text().await.map_err(|e| classify_error(url, e))?;

        Ok(FetchedPage::new(final_url, parse_document(&body)))
    }
}

fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

/// Returns true for content types that can be parsed as markup
///
/// A missing Content-Type is accepted; many static documentation hosts omit it.
fn is_textual(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.is_empty()
        || content_type.contains("html")
        || content_type.contains("xml")
        || content_type.starts_with("text/")
}
