//! Compiled document assembly
//!
//! This module turns an ordered list of page records into the final Markdown
//! document: title and metadata, table of contents, one section per page and
//! a closing block of usage notes.

use super::render::{fenced, render_body_blocks, BodyBlock};
use super::slug::SlugRegistry;
use crate::page::{ApiEntry, CodeExample, PageRecord};
use chrono::{DateTime, SecondsFormat, Utc};

const TOC_HEADING: &str = "Table of Contents";
const CODE_EXAMPLES_HEADING: &str = "Code Examples";
const API_REFERENCE_HEADING: &str = "API Reference";

/// Closing block appended to every compiled document
pub const USAGE_NOTES: &str = "## Usage Notes

- This document was assembled automatically from the pages listed in the table of contents.
- Content is extracted heuristically; prose between recognised blocks may be missing.
- Code examples keep their original formatting and carry the language found on the page, if any.
- Follow the `Source` link of a section when exact wording or the latest version matters.
";

/// Formats the full document
///
/// # Arguments
///
/// * `pages` - Page records in crawl order
/// * `subject` - Package or library name used in the title
/// * `generated_at` - Timestamp written into the metadata block
pub fn format_document(pages: &[PageRecord], subject: &str, generated_at: DateTime<Utc>) -> String {
    let mut md = String::new();

    // Anchors are unique across every heading in the document, in order
    let mut slugs = SlugRegistry::new();

    // Title
    let title = format!("{} Documentation", subject);
    slugs.unique(&title);
    md.push_str(&format!("# {}\n\n", title));

    // Metadata
    md.push_str(&format!("- **Subject**: {}\n", subject));
    md.push_str(&format!("- **Pages**: {}\n", pages.len()));
    md.push_str(&format!(
        "- **Generated**: {}\n\n",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));

    // Page sections are rendered first so the table of contents can use their anchors
    slugs.unique(TOC_HEADING);
    let sections: Vec<(String, String)> = pages
        .iter()
        .map(|page| format_page(page, &mut slugs))
        .collect();

    // Table of contents
    md.push_str(&format!("## {}\n\n", TOC_HEADING));
    for (page, (anchor, _)) in pages.iter().zip(&sections) {
        md.push_str(&format!("- [{}](#{})\n", page.title, anchor));
    }
    md.push('\n');

    // Pages
    for (_, section) in &sections {
        md.push_str("---\n\n");
        md.push_str(section);
    }

    if !pages.is_empty() {
        md.push_str("---\n\n");
    }
    md.push_str(USAGE_NOTES);

    md
}

/// Formats one page section, returning its anchor and Markdown
fn format_page(page: &PageRecord, slugs: &mut SlugRegistry) -> (String, String) {
    let mut md = String::new();
    let anchor = slugs.unique(&page.title);

    md.push_str(&format!("## {}\n\n", page.title));
    md.push_str(&format!("Source: <{}>\n\n", page.url));

    for block in render_body_blocks(&page.content) {
        if let BodyBlock::Heading { text, .. } = &block {
            slugs.unique(text);
        }
        md.push_str(&block.to_markdown());
        md.push_str("\n\n");
    }

    if !page.code_examples.is_empty() {
        slugs.unique(CODE_EXAMPLES_HEADING);
        md.push_str(&format!("### {}\n\n", CODE_EXAMPLES_HEADING));
        for example in &page.code_examples {
            push_code_example(&mut md, example);
        }
    }

    if !page.api_entries.is_empty() {
        slugs.unique(API_REFERENCE_HEADING);
        md.push_str(&format!("### {}\n\n", API_REFERENCE_HEADING));
        for entry in &page.api_entries {
            slugs.unique(&entry.name);
            push_api_entry(&mut md, entry);
        }
    }

    (anchor, md)
}

fn push_code_example(md: &mut String, example: &CodeExample) {
    if let Some(description) = &example.description {
        md.push_str(&format!("**{}**\n\n", description));
    }
    md.push_str(&fenced(&example.code, &example.language));
    md.push_str("\n\n");
}

fn push_api_entry(md: &mut String, entry: &ApiEntry) {
    md.push_str(&format!("#### {}\n\n", entry.name));
    if let Some(signature) = &entry.signature {
        md.push_str(&fenced(signature, ""));
        md.push_str("\n\n");
    }
    if let Some(description) = &entry.description {
        md.push_str(description);
        md.push_str("\n\n");
    }
}
