//! API signature extraction

use crate::markup::{Element, Node};
use crate::page::ApiEntry;

/// Headings longer than this are prose, not API names
pub const MAX_HEADING_LENGTH: usize = 100;

/// Section titles that never name an API item
const BOILERPLATE_TITLES: &[&str] = &["introduction", "getting started"];

/// Extracts API entries from a document
///
/// Every heading that is short enough and not boilerplate is paired with the
/// first signature-like sibling (`code`, `pre`, or a class mentioning
/// `signature`) and the first `<p>` sibling that follow it before any other
/// heading. Headings with neither are skipped.
pub fn extract_api_entries(document: &Element) -> Vec<ApiEntry> {
    let mut entries = Vec::new();
    walk(document, &mut entries);
    entries
}

fn walk(parent: &Element, entries: &mut Vec<ApiEntry>) {
    for (index, child) in parent.children.iter().enumerate() {
        let Some(element) = child.as_element() else {
            continue;
        };

        if element.is_heading() {
            if let Some(entry) = entry_for_heading(element, &parent.children[index + 1..]) {
                entries.push(entry);
            }
        } else {
            walk(element, entries);
        }
    }
}

fn entry_for_heading(heading: &Element, following: &[Node]) -> Option<ApiEntry> {
    let name = heading.normalized_text();
    if !is_api_heading(&name) {
        return None;
    }

    let mut signature = None;
    let mut description = None;

    for sibling in following.iter().filter_map(Node::as_element) {
        if sibling.is_heading() || sibling.contains_heading() {
            break;
        }

        if signature.is_none() && is_signature(sibling) {
            signature = Some(sibling.text().trim().to_string()).filter(|s| !s.is_empty());
        } else if description.is_none() && sibling.tag == "p" {
            description = Some(sibling.normalized_text()).filter(|d| !d.is_empty());
        }

        if signature.is_some() && description.is_some() {
            break;
        }
    }

    let entry = ApiEntry {
        name,
        signature,
        description,
    };
    entry.has_content().then_some(entry)
}

fn is_api_heading(text: &str) -> bool {
    if text.is_empty() || text.chars().count() > MAX_HEADING_LENGTH {
        return false;
    }

    let lowered = text.to_lowercase();
    !BOILERPLATE_TITLES.contains(&lowered.as_str())
}

fn is_signature(element: &Element) -> bool {
    matches!(element.tag.as_str(), "code" | "pre")
        || element.class().to_ascii_lowercase().contains("signature")
}
