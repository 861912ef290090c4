//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates:
//! - The FIFO frontier and visited set
//! - Cache lookups and writes
//! - Fetching and extraction on cache misses
//! - Enqueueing discovered links
//! - Enforcing the page budget

use crate::cache::PageCache;
use crate::config::{validate_page_budget, DEFAULT_MAX_PAGES};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::Frontier;
use crate::crawler::state::{CrawlPhase, ExhaustReason};
use crate::extract::Extractor;
use crate::page::PageRecord;
use crate::url::{is_same_host, normalize_parsed};
use crate::{CrawlError, FetchError};
use std::time::Instant;
use url::Url;

/// Parameters of a single crawl
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    /// Where the crawl starts; its host bounds the crawl
    pub seed: Url,

    /// Package or library name, used for link relevance
    pub subject: String,

    /// Maximum number of pages to emit
    pub max_pages: usize,

    /// Skip cache reads (results are still written)
    pub bypass_cache: bool,
}

impl CrawlRequest {
    /// Creates a request with the default page budget and cache enabled
    pub fn new(seed: Url, subject: impl Into<String>) -> Self {
        Self {
            seed,
            subject: subject.into(),
            max_pages: DEFAULT_MAX_PAGES,
            bypass_cache: false,
        }
    }

    /// Sets the page budget; [`Crawler::crawl`] rejects values outside
    /// `1..=MAX_PAGE_BUDGET`
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_cache_bypass(mut self, bypass: bool) -> Self {
        self.bypass_cache = bypass;
        self
    }
}

/// Outcome of a successful crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Pages in crawl order; never empty and never longer than the budget
    pub pages: Vec<PageRecord>,

    /// Distinct URLs dequeued
    pub visited: usize,

    /// Pages served from the cache
    pub cache_hits: usize,

    /// URLs dropped because they could not be resolved
    pub failures: usize,

    /// Why the loop stopped
    pub reason: ExhaustReason,
}

/// Bounded breadth-first crawler
///
/// Holds references to its collaborators; one crawler can run any number of
/// sequential crawls.
pub struct Crawler<'a, F: Fetcher + ?Sized> {
    fetcher: &'a F,
    cache: &'a PageCache,
}

impl<'a, F: Fetcher + ?Sized> Crawler<'a, F> {
    pub fn new(fetcher: &'a F, cache: &'a PageCache) -> Self {
        Self { fetcher, cache }
    }

    /// Runs a crawl to completion
    ///
    /// # Algorithm
    ///
    /// 1. Seed the frontier with the normalized seed URL
    /// 2. While pages < budget and the frontier is non-empty:
    ///    a. Dequeue the next unvisited URL and mark it visited
    ///    b. Resolve it: fresh cache hit (unless bypassed), else fetch, extract
    ///       and write to the cache
    ///    c. On failure, log and move on
    ///    d. On success, keep the page and enqueue its unseen links in order
    /// 3. Fail with [`CrawlError::Exhausted`] if no page was produced
    ///
    /// Per-page failures never abort the crawl. A budget outside
    /// `1..=MAX_PAGE_BUDGET` fails with [`CrawlError::InvalidBudget`] before
    /// anything is fetched.
    pub async fn crawl(&self, request: &CrawlRequest) -> Result<CrawlReport, CrawlError> {
        if validate_page_budget(request.max_pages).is_err() {
            return Err(CrawlError::InvalidBudget {
                max_pages: request.max_pages,
            });
        }

        let seed = normalize_parsed(request.seed.clone()).map_err(|e| CrawlError::Exhausted {
            seed: request.seed.to_string(),
            reason: e.to_string(),
        })?;

        tracing::info!(
            "Crawling {} for '{}' (budget {} pages{})",
            seed,
            request.subject,
            request.max_pages,
            if request.bypass_cache { ", cache bypassed" } else { "" }
        );

        let start_time = Instant::now();
        let extractor = Extractor::new(&seed, &request.subject);
        let mut frontier = Frontier::new(seed.clone());
        let mut phase = CrawlPhase::Seeded;
        let mut pages: Vec<PageRecord> = Vec::new();
        let mut cache_hits = 0;
        let mut failures = 0;
        let mut last_error: Option<FetchError> = None;

        let reason = loop {
            if pages.len() >= request.max_pages {
                break ExhaustReason::BudgetReached;
            }

            let Some(url) = frontier.next_unvisited() else {
                break ExhaustReason::FrontierEmpty;
            };
            advance(&mut phase, CrawlPhase::Traversing);

            tracing::debug!("Processing URL: {}", url);

            match self.resolve_page(&url, &extractor, request.bypass_cache).await {
                Ok((page, from_cache)) => {
                    if from_cache {
                        cache_hits += 1;
                    }

                    // A redirect target counts as visited under its own URL too
                    if page.url != url.as_str() {
                        if let Ok(final_url) = Url::parse(&page.url) {
                            if !frontier.mark_visited(&final_url) {
                                tracing::debug!(
                                    "{} redirected to already visited {}",
                                    url,
                                    final_url
                                );
                                continue;
                            }
                        }
                    }

                    let mut enqueued = 0;
                    for link in &page.links {
                        let Ok(link_url) = Url::parse(link) else {
                            tracing::debug!("Ignoring unparsable link {}", link);
                            continue;
                        };
                        if !is_same_host(&link_url, extractor.seed_host()) {
                            continue;
                        }
                        if frontier.push(link_url) {
                            enqueued += 1;
                        }
                    }

                    tracing::info!(
                        "[{}/{}] {} ({} new links, {} in frontier)",
                        pages.len() + 1,
                        request.max_pages,
                        url,
                        enqueued,
                        frontier.len()
                    );
                    pages.push(page);
                }
                Err(e) => {
                    tracing::warn!("Dropping {}: {}", url, e);
                    failures += 1;
                    last_error = Some(e);
                }
            }
        };
        advance(&mut phase, CrawlPhase::Exhausted(reason));

        tracing::info!(
            "Crawl {}: {} pages ({} cached, {} failed) in {:?}",
            phase,
            pages.len(),
            cache_hits,
            failures,
            start_time.elapsed()
        );

        if pages.is_empty() {
            let reason = last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no page could be fetched".to_string());
            return Err(CrawlError::Exhausted {
                seed: seed.to_string(),
                reason,
            });
        }

        Ok(CrawlReport {
            pages,
            visited: frontier.visited_count(),
            cache_hits,
            failures,
            reason,
        })
    }

    /// Resolves one URL into a page record
    ///
    /// Returns the record and whether it came from the cache. Fetched pages
    /// are extracted against their final URL; redirects that leave the seed
    /// host are rejected.
    async fn resolve_page(
        &self,
        url: &Url,
        extractor: &Extractor,
        bypass_cache: bool,
    ) -> Result<(PageRecord, bool), FetchError> {
        if !bypass_cache {
            if let Some(page) = self.cache.get(url.as_str()) {
                return Ok((page, true));
            }
        }

        let fetched = self.fetcher.fetch(url).await?;
        let final_url = normalize_parsed(fetched.url.clone())
            .ok()
            .filter(|target| is_same_host(target, extractor.seed_host()))
            .ok_or_else(|| FetchError::OffHostRedirect {
                url: url.to_string(),
                target: fetched.url.to_string(),
            })?;

        let extraction = extractor.extract(&fetched.document, &final_url);
        let page = PageRecord::from_document(final_url.as_str(), &fetched.document, extraction);

        self.cache.put(url.as_str(), &page);

        Ok((page, false))
    }
}

fn advance(phase: &mut CrawlPhase, next: CrawlPhase) {
    debug_assert!(
        phase.can_transition_to(next),
        "invalid crawl transition {phase} -> {next}"
    );
    if *phase != next {
        tracing::debug!("Crawl phase {} -> {}", phase, next);
    }
    *phase = next;
}
