//! Conversion from parsed HTML into the generic markup tree

use crate::markup::{Element, Node};
use scraper::{ElementRef, Html};

/// Elements that never carry documentation content and are dropped during conversion
pub const STRIPPED_TAGS: &[&str] = &["script", "style", "noscript", "iframe", "frame", "frameset"];

/// Parses an HTML document into the generic markup tree
///
/// The returned element is the document's `<html>` root. Comments, doctype
/// and processing instructions are dropped along with [`STRIPPED_TAGS`].
///
/// # Example
///
/// ```
/// use docweave::markup::parse_document;
///
/// let root = parse_document("<html><body><script>x()</script><p>Hi</p></body></html>");
/// assert_eq!(root.tag, "html");
/// assert_eq!(root.normalized_text(), "Hi");
/// ```
pub fn parse_document(html: &str) -> Element {
    let document = Html::parse_document(html);
    convert_element(document.root_element())
}

fn convert_element(source: ElementRef<'_>) -> Element {
    let value = source.value();
    let mut element = Element::new(value.name());

    for (name, attr_value) in value.attrs() {
        element
            .attrs
            .insert(name.to_ascii_lowercase(), attr_value.to_string());
    }

    for child in source.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if is_stripped(child_element.value().name()) {
                continue;
            }
            element
                .children
                .push(Node::Element(convert_element(child_element)));
        } else if let Some(text) = child.value().as_text() {
            let text: &str = text;
            if !text.is_empty() {
                element.children.push(Node::Text(text.to_string()));
            }
        }
    }

    element
}

fn is_stripped(tag: &str) -> bool {
    STRIPPED_TAGS
        .iter()
        .any(|stripped| stripped.eq_ignore_ascii_case(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_non_content_nodes() {
        let root = parse_document(
            r#"<html><head><style>body{}</style><script>var a;</script></head>
            <body><noscript>enable js</noscript><iframe src="/x"></iframe><p>kept</p></body></html>"#,
        );

        assert!(root.descendants().all(|el| !is_stripped(&el.tag)));
        assert_eq!(root.normalized_text(), "kept");
    }

    #[test]
    fn test_keeps_attributes() {
        let root = parse_document(r#"<html><body><pre class="language-rust" data-x="1">fn main() {}</pre></body></html>"#);
        let pre = root.find(|el| el.tag == "pre").unwrap();
        assert_eq!(pre.attr("class"), Some("language-rust"));
        assert_eq!(pre.attr("data-x"), Some("1"));
    }

    #[test]
    fn test_preserves_preformatted_whitespace() {
        let root = parse_document("<html><body><pre>line one\n    line two</pre></body></html>");
        let pre = root.find(|el| el.tag == "pre").unwrap();
        assert_eq!(pre.text(), "line one\n    line two");
    }

    #[test]
    fn test_comments_dropped() {
        let root = parse_document("<html><body><!-- hidden --><p>shown</p></body></html>");
        assert!(!root.text().contains("hidden"));
    }
}
