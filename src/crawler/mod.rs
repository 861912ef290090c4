//! Crawler module for documentation fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`Fetcher`] seam
//! - The FIFO frontier with visited tracking
//! - Crawl phase tracking
//! - Overall crawl coordination and the crawl-and-compile entry point

mod coordinator;
mod fetcher;
mod frontier;
mod state;

pub use coordinator::{CrawlReport, CrawlRequest, Crawler};
pub use fetcher::{build_http_client, FetchedPage, Fetcher, HttpFetcher};
pub use frontier::Frontier;
pub use state::{CrawlPhase, ExhaustReason};

use crate::cache::PageCache;
use crate::compiler::compile;
use crate::DocweaveError;

/// Crawls from a seed and compiles the visited pages into one document
///
/// This is the main entry point. It will:
/// 1. Run a bounded breadth-first crawl from `request.seed`
/// 2. Serve fresh pages from `cache` unless the request bypasses it
/// 3. Compile the pages, in crawl order, into Markdown
///
/// # Returns
///
/// * `Ok(String)` - The compiled document
/// * `Err(DocweaveError)` - No page could be produced; the error carries the
///   seed URL and the last underlying failure
///
/// # Example
///
/// ```no_run
/// use docweave::cache::PageCache;
/// use docweave::config::Config;
/// use docweave::crawler::{crawl_and_compile, CrawlRequest, HttpFetcher};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let fetcher = HttpFetcher::new(&config)?;
/// let cache = PageCache::from_config(&config.cache);
/// let request = CrawlRequest::new(Url::parse("https://serde.rs/")?, "serde");
///
/// let document = crawl_and_compile(&fetcher, &cache, &request).await?;
/// println!("{}", document);
/// # Ok(())
/// # }
/// ```
pub async fn crawl_and_compile<F>(
    fetcher: &F,
    cache: &PageCache,
    request: &CrawlRequest,
) -> Result<String, DocweaveError>
where
    F: Fetcher + ?Sized,
{
    let crawler = Crawler::new(fetcher, cache);
    let report = crawler.crawl(request).await?;
    Ok(compile(&report.pages, &request.subject))
}
