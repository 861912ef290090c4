//! Relevant link extraction

use crate::markup::Element;
use crate::url::{is_same_host, resolve_link, same_document};
use std::collections::HashSet;
use url::Url;

/// Path or anchor-text fragments that mark a link as documentation
pub const RELEVANCE_KEYWORDS: &[&str] = &[
    "api",
    "reference",
    "doc",
    "guide",
    "tutorial",
    "example",
    "usage",
    "getting-started",
    "introduction",
    "started",
];

/// Extracts relevant same-host links from a document
///
/// # Link Rules
///
/// **Include:** `<a href>` links that resolve to HTTP(S) on `seed_host` and
/// whose path or visible text contains a [`RELEVANCE_KEYWORDS`] entry or the
/// subject name (both compared lowercase).
///
/// **Exclude:** special schemes, fragment-only links, links back to the page
/// itself (ignoring the fragment), and cross-host links.
///
/// Results are fragment-free, deduplicated and in document order.
pub fn extract_links(
    document: &Element,
    page_url: &Url,
    seed_host: &str,
    subject: &str,
) -> Vec<String> {
    let subject = subject.trim().to_lowercase();
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.descendants().filter(|el| el.tag == "a") {
        let Some(href) = anchor.attr("href") else {
            continue;
        };

        let Some(resolved) = resolve_link(href, page_url) else {
            continue;
        };

        if !is_same_host(&resolved, seed_host) {
            tracing::trace!("Skipping cross-host link {}", resolved);
            continue;
        }

        if same_document(&resolved, page_url) {
            continue;
        }

        let text = anchor.normalized_text().to_lowercase();
        if !is_relevant(&resolved.path().to_lowercase(), &text, &subject) {
            continue;
        }

        if seen.insert(resolved.as_str().to_string()) {
            links.push(resolved.into());
        }
    }

    links
}

fn is_relevant(path: &str, text: &str, subject: &str) -> bool {
    let keyword_hit = RELEVANCE_KEYWORDS
        .iter()
        .any(|keyword| path.contains(keyword) || text.contains(keyword));

    keyword_hit || (!subject.is_empty() && (path.contains(subject) || text.contains(subject)))
}
