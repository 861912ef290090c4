//! Page records produced by a crawl
//!
//! A [`PageRecord`] is the unit that flows from the crawler into the compiler,
//! and it is also what the cache persists per URL.

use crate::extract::Extraction;
use crate::markup::{self, Element};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum trimmed length for a code block to count as an example
pub const MIN_CODE_LENGTH: usize = 10;

/// Everything extracted from a single documentation page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// The URL the page was fetched from (fragment-free)
    pub url: String,

    /// Page title, falling back to the URL
    pub title: String,

    /// Main content area of the page; may have no children
    pub content: Element,

    /// Relevant same-host links, deduplicated in discovery order
    #[serde(default)]
    pub links: Vec<String>,

    #[serde(default)]
    pub code_examples: Vec<CodeExample>,

    #[serde(default)]
    pub api_entries: Vec<ApiEntry>,

    /// When the page was fetched and extracted
    pub fetched_at: DateTime<Utc>,
}

/// A code sample found on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeExample {
    pub code: String,

    /// Inferred language tag; empty when nothing matched
    #[serde(default)]
    pub language: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A heading that looks like an API item, with its signature and prose
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEntry {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PageRecord {
    /// Builds a record from a fetched document and its extraction results
    ///
    /// The stored content is the document's main content area; the title comes
    /// from `<title>`, then the first `h1`, then the URL itself.
    pub fn from_document(url: &str, document: &Element, extraction: Extraction) -> Self {
        let title = markup::document_title(document).unwrap_or_else(|| url.to_string());
        let content = markup::content_root(document).clone();

        Self {
            url: url.to_string(),
            title,
            content,
            links: extraction.links,
            code_examples: extraction.code_examples,
            api_entries: extraction.api_entries,
            fetched_at: Utc::now(),
        }
    }
}

impl ApiEntry {
    /// Returns true if the entry carries a signature or a description
    pub fn has_content(&self) -> bool {
        self.signature.as_deref().is_some_and(|s| !s.is_empty())
            || self.description.as_deref().is_some_and(|d| !d.is_empty())
    }
}
