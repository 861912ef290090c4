//! Generic markup tree
//!
//! Fetched pages are converted into a small owned tree of typed nodes instead
//! of keeping the parser's live DOM around. Extraction and compilation are
//! pattern matching over this tree, and the tree is what gets persisted inside
//! cache records.

mod parse;

pub use parse::{parse_document, STRIPPED_TAGS};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A node in the markup tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element node: tag name, attributes and children
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Element {
    /// Lowercase tag name
    pub tag: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Element {
    /// Creates an element with no attributes or children
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Returns an attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Returns the class attribute, or an empty string
    pub fn class(&self) -> &str {
        self.attr("class").unwrap_or("")
    }

    /// Iterates over whitespace-separated class tokens
    pub fn class_tokens(&self) -> impl Iterator<Item = &str> {
        self.class().split_whitespace()
    }

    /// Returns the heading level (1-6) if this is an `h1`..`h6` element
    pub fn heading_level(&self) -> Option<u8> {
        let bytes = self.tag.as_bytes();
        if bytes.len() == 2 && bytes[0] == b'h' && (b'1'..=b'6').contains(&bytes[1]) {
            Some(bytes[1] - b'0')
        } else {
            None
        }
    }

    pub fn is_heading(&self) -> bool {
        self.heading_level().is_some()
    }

    /// Iterates over element children only
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Descendant text with runs of whitespace collapsed to single spaces
    pub fn normalized_text(&self) -> String {
        collapse_whitespace(&self.text())
    }

    /// Depth-first pre-order iterator over descendant elements (excluding self)
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<&Element> = self.child_elements().collect();
        stack.reverse();
        Descendants { stack }
    }

    /// Returns the first element (self included) matching the predicate, in document order
    pub fn find<F>(&self, predicate: F) -> Option<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        if predicate(self) {
            return Some(self);
        }
        self.descendants().find(|el| predicate(el))
    }

    /// Returns true if any descendant is a heading
    pub fn contains_heading(&self) -> bool {
        self.descendants().any(Element::is_heading)
    }
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    /// Text content of this node and its descendants
    pub fn text(&self) -> String {
        match self {
            Node::Element(el) => el.text(),
            Node::Text(text) => text.clone(),
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// Pre-order element iterator returned by [`Element::descendants`]
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        let children: Vec<&Element> = next.child_elements().collect();
        self.stack.extend(children.into_iter().rev());
        Some(next)
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                if el.tag == "br" {
                    out.push('\n');
                }
                collect_text(&el.children, out);
            }
        }
    }
}

/// Collapses whitespace runs to single spaces and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns the page title: `<title>`, else the first `h1`, else `None`
pub fn document_title(document: &Element) -> Option<String> {
    let from_title = document
        .find(|el| el.tag == "title")
        .map(Element::normalized_text)
        .filter(|t| !t.is_empty());

    from_title.or_else(|| {
        document
            .find(|el| el.tag == "h1")
            .map(Element::normalized_text)
            .filter(|t| !t.is_empty())
    })
}

/// Returns the main content area of a document
///
/// The first of `main`, `article`, `[role=main]` and `body` wins; a document
/// with none of these is its own content root.
pub fn content_root(document: &Element) -> &Element {
    document
        .find(|el| el.tag == "main")
        .or_else(|| document.find(|el| el.tag == "article"))
        .or_else(|| document.find(|el| el.attr("role") == Some("main")))
        .or_else(|| document.find(|el| el.tag == "body"))
        .unwrap_or(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> Element {
        parse_document(html)
    }

    #[test]
    fn test_heading_level() {
        assert_eq!(Element::new("h1").heading_level(), Some(1));
        assert_eq!(Element::new("H6").heading_level(), Some(6));
        assert_eq!(Element::new("h7").heading_level(), None);
        assert_eq!(Element::new("hr").heading_level(), None);
        assert_eq!(Element::new("header").heading_level(), None);
    }

    #[test]
    fn test_text_and_normalized_text() {
        let root = doc("<html><body><p>Hello\n   <b>big</b>   world</p></body></html>");
        let p = root.find(|el| el.tag == "p").unwrap();
        assert_eq!(p.normalized_text(), "Hello big world");
    }

    #[test]
    fn test_descendants_are_document_order() {
        let root = doc("<html><body><div><h2>A</h2><p>x</p></div><h3>B</h3></body></html>");
        let tags: Vec<&str> = root
            .descendants()
            .filter(|el| el.is_heading())
            .map(|el| el.tag.as_str())
            .collect();
        assert_eq!(tags, vec!["h2", "h3"]);
    }

    #[test]
    fn test_document_title_prefers_title_tag() {
        let root = doc("<html><head><title> Guide </title></head><body><h1>Other</h1></body></html>");
        assert_eq!(document_title(&root), Some("Guide".to_string()));
    }

    #[test]
    fn test_document_title_falls_back_to_h1() {
        let root = doc("<html><head></head><body><h1>Heading</h1></body></html>");
        assert_eq!(document_title(&root), Some("Heading".to_string()));
    }

    #[test]
    fn test_content_root_prefers_main() {
        let root = doc("<html><body><nav>menu</nav><main><p>content</p></main></body></html>");
        assert_eq!(content_root(&root).tag, "main");
    }

    #[test]
    fn test_content_root_falls_back_to_body() {
        let root = doc("<html><body><p>content</p></body></html>");
        assert_eq!(content_root(&root).tag, "body");
    }
}
