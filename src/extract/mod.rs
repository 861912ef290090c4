//! Heuristic extraction over markup trees
//!
//! Three independent passes run over each fetched document:
//! - relevant same-host links for the crawl frontier
//! - code examples with an inferred language
//! - API entries pairing headings with signatures and descriptions
//!
//! Empty results from any pass are valid.

mod api;
mod code;
mod language;
mod links;

pub use api::{extract_api_entries, MAX_HEADING_LENGTH};
pub use code::{extract_code_examples, is_code_block};
pub(crate) use code::clean_code;
pub use language::infer_language;
pub use links::{extract_links, RELEVANCE_KEYWORDS};

use crate::markup::Element;
use crate::page::{ApiEntry, CodeExample};
use crate::url::extract_domain;
use url::Url;

/// Output of all extraction passes for one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub links: Vec<String>,
    pub code_examples: Vec<CodeExample>,
    pub api_entries: Vec<ApiEntry>,
}

/// Runs the extraction passes for one crawl
///
/// Links are restricted to the seed's host and judged relevant against the
/// subject name.
#[derive(Debug, Clone)]
pub struct Extractor {
    seed_host: String,
    subject: String,
}

impl Extractor {
    /// Creates an extractor bound to a seed URL and subject
    pub fn new(seed: &Url, subject: &str) -> Self {
        Self {
            seed_host: extract_domain(seed).unwrap_or_default(),
            subject: subject.to_string(),
        }
    }

    pub fn seed_host(&self) -> &str {
        &self.seed_host
    }

    /// Runs all three passes over a document fetched from `page_url`
    pub fn extract(&self, document: &Element, page_url: &Url) -> Extraction {
        let extraction = Extraction {
            links: extract_links(document, page_url, &self.seed_host, &self.subject),
            code_examples: extract_code_examples(document),
            api_entries: extract_api_entries(document),
        };

        tracing::debug!(
            "Extracted {} links, {} code examples, {} API entries from {}",
            extraction.links.len(),
            extraction.code_examples.len(),
            extraction.api_entries.len(),
            page_url
        );

        extraction
    }
}
