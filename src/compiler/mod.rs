//! Compilation of crawled pages into a single Markdown document
//!
//! Compilation is pure apart from the generation timestamp: the same pages and
//! subject always produce the same document for a given `generated_at`.

mod markdown;
mod render;
mod slug;

pub use markdown::{format_document, USAGE_NOTES};
pub use render::{
    fenced, render_block, render_body, render_body_blocks, render_inline, BodyBlock,
    BODY_BLOCK_TAGS,
};
pub use slug::{slugify, SlugRegistry};

use crate::page::PageRecord;
use chrono::{DateTime, Utc};

/// Compiles pages into a document stamped with the current time
pub fn compile(pages: &[PageRecord], subject: &str) -> String {
    compile_at(pages, subject, Utc::now())
}

/// Compiles pages into a document stamped with `generated_at`
pub fn compile_at(pages: &[PageRecord], subject: &str, generated_at: DateTime<Utc>) -> String {
    tracing::debug!("Compiling {} pages for {}", pages.len(), subject);
    format_document(pages, subject, generated_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Element;
    use chrono::TimeZone;

    fn record(url: &str, title: &str) -> PageRecord {
        PageRecord {
            url: url.to_string(),
            title: title.to_string(),
            content: Element::new("main"),
            links: Vec::new(),
            code_examples: Vec::new(),
            api_entries: Vec::new(),
            fetched_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn without_timestamp(document: &str) -> String {
        document
            .lines()
            .filter(|line| !line.starts_with("- **Generated**:"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_deterministic_modulo_timestamp() {
        let pages = vec![
            record("https://docs.example.com/", "Home"),
            record("https://docs.example.com/guide", "Guide"),
        ];
        let first = compile_at(&pages, "demo", Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        let second = compile_at(&pages, "demo", Utc.with_ymd_and_hms(2027, 6, 1, 12, 0, 0).unwrap());

        assert_ne!(first, second);
        assert_eq!(without_timestamp(&first), without_timestamp(&second));
    }

    #[test]
    fn test_compile_uses_current_time() {
        let before = Utc::now();
        let document = compile(&[record("https://docs.example.com/", "Home")], "demo");

        let stamp = document
            .lines()
            .find_map(|line| line.strip_prefix("- **Generated**: "))
            .unwrap();
        let parsed = DateTime::parse_from_rfc3339(stamp).unwrap();
        assert!(parsed.timestamp() >= before.timestamp());
    }
}
