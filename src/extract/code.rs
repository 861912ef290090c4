//! Code example extraction

use crate::extract::language::infer_language;
use crate::markup::{Element, Node};
use crate::page::{CodeExample, MIN_CODE_LENGTH};

/// Extracts code examples from a document
///
/// Candidate blocks are `pre`, `code` and any element whose class mentions
/// `highlight`. A taken block is not descended into, so a `<code>` nested in a
/// `<pre>` is counted once. Blocks whose trimmed text is shorter than
/// [`MIN_CODE_LENGTH`] characters are discarded.
pub fn extract_code_examples(document: &Element) -> Vec<CodeExample> {
    let mut examples = Vec::new();
    walk(document, &mut examples);
    examples
}

fn walk(parent: &Element, examples: &mut Vec<CodeExample>) {
    for (index, child) in parent.children.iter().enumerate() {
        let Some(element) = child.as_element() else {
            continue;
        };

        if !is_code_block(element) {
            walk(element, examples);
            continue;
        }

        let raw = element.text();
        if raw.trim().chars().count() < MIN_CODE_LENGTH {
            tracing::trace!("Discarding short <{}> block", element.tag);
            continue;
        }

        examples.push(CodeExample {
            code: clean_code(&raw),
            language: infer_language(element),
            description: describe(parent, index),
        });
    }
}

/// Returns true for elements treated as code blocks
pub fn is_code_block(element: &Element) -> bool {
    matches!(element.tag.as_str(), "pre" | "code")
        || element.class().to_ascii_lowercase().contains("highlight")
}

/// Drops leading blank lines and trailing whitespace, keeping indentation
pub(crate) fn clean_code(raw: &str) -> String {
    raw.trim_end()
        .lines()
        .skip_while(|line| line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Finds a description for the block at `parent.children[index]`
///
/// The nearest preceding heading or paragraph sibling wins; otherwise the last
/// heading inside the parent that precedes the block.
fn describe(parent: &Element, index: usize) -> Option<String> {
    let preceding = &parent.children[..index];

    let sibling = preceding
        .iter()
        .rev()
        .filter_map(Node::as_element)
        .filter(|el| el.is_heading() || el.tag == "p")
        .map(Element::normalized_text)
        .find(|text| !text.is_empty());

    sibling.or_else(|| {
        preceding
            .iter()
            .filter_map(Node::as_element)
            .flat_map(Element::descendants)
            .filter(|el| el.is_heading())
            .map(Element::normalized_text)
            .filter(|text| !text.is_empty())
            .last()
    })
}
