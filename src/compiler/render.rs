//! Markup to Markdown block rendering
//!
//! Page bodies are rebuilt from content headings: each heading is followed by
//! the run of prose, list, code and table siblings up to the next heading.
//! Anything else in the content tree is dropped.

use crate::extract::{clean_code, infer_language};
use crate::markup::{collapse_whitespace, Element, Node};

/// Tags kept in a heading's run of following siblings
pub const BODY_BLOCK_TAGS: &[&str] = &["p", "ul", "ol", "pre", "code", "table"];

/// A rendered piece of a page body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyBlock {
    /// Heading already shifted to its output level
    Heading { level: usize, text: String },

    /// Any other rendered block
    Content(String),
}

impl BodyBlock {
    pub fn to_markdown(&self) -> String {
        match self {
            Self::Heading { level, text } => format!("{} {}", "#".repeat(*level), text),
            Self::Content(block) => block.clone(),
        }
    }
}

/// Renders a page's content tree as Markdown
///
/// Headings are shifted down two levels (capped at `h6`) so they sit under the
/// page's own `##` heading.
pub fn render_body(content: &Element) -> String {
    render_body_blocks(content)
        .iter()
        .map(BodyBlock::to_markdown)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Renders a page's content tree into blocks in document order
pub fn render_body_blocks(content: &Element) -> Vec<BodyBlock> {
    let mut blocks = Vec::new();
    collect_sections(content, &mut blocks);
    blocks
}

/// Walks `parent`'s children in order
///
/// A heading opens a run; renderable siblings after it are emitted until the
/// next sibling heading. Every other element is searched for nested headings,
/// including containers sitting inside a run.
fn collect_sections(parent: &Element, blocks: &mut Vec<BodyBlock>) {
    let mut in_run = false;

    for child in parent.child_elements() {
        if let Some(level) = child.heading_level() {
            let text = child.normalized_text();
            if !text.is_empty() {
                blocks.push(BodyBlock::Heading {
                    level: usize::from((level + 2).min(6)),
                    text,
                });
            }
            in_run = true;
            continue;
        }

        if in_run {
            if let Some(block) = render_block(child) {
                blocks.push(BodyBlock::Content(block));
                continue;
            }
        }

        collect_sections(child, blocks);
    }
}

/// Renders a single body block, or `None` for tags outside [`BODY_BLOCK_TAGS`]
pub fn render_block(element: &Element) -> Option<String> {
    let rendered = match element.tag.as_str() {
        "p" => render_inline(&element.children),
        "ul" => render_list(element, false),
        "ol" => render_list(element, true),
        "pre" | "code" => render_code(element),
        "table" => render_table(element),
        _ => return None,
    };
    Some(rendered).filter(|block| !block.trim().is_empty())
}

/// Renders inline content on a single line
///
/// `code` becomes a backtick span, `strong`/`b` and `em`/`i` keep their
/// emphasis, and everything else contributes its text.
pub fn render_inline(nodes: &[Node]) -> String {
    let mut out = String::new();
    push_inline(nodes, &mut out);
    collapse_whitespace(&out)
}

fn push_inline(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => match el.tag.as_str() {
                "code" => {
                    let text = collapse_whitespace(&el.text());
                    if !text.is_empty() {
                        out.push_str(&code_span(&text));
                    }
                }
                "strong" | "b" => wrap_inline(&el.children, "**", out),
                "em" | "i" => wrap_inline(&el.children, "*", out),
                "br" => out.push(' '),
                _ => push_inline(&el.children, out),
            },
        }
    }
}

fn wrap_inline(children: &[Node], marker: &str, out: &mut String) {
    let inner = render_inline(children);
    if !inner.is_empty() {
        out.push_str(marker);
        out.push_str(&inner);
        out.push_str(marker);
    }
}

fn code_span(text: &str) -> String {
    if text.contains('`') {
        format!("`` {} ``", text)
    } else {
        format!("`{}`", text)
    }
}

fn render_list(list: &Element, ordered: bool) -> String {
    list.child_elements()
        .filter(|el| el.tag == "li")
        .map(|item| render_inline(&item.children))
        .filter(|text| !text.is_empty())
        .enumerate()
        .map(|(i, text)| {
            if ordered {
                format!("{}. {}", i + 1, text)
            } else {
                format!("- {}", text)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_code(block: &Element) -> String {
    let code = clean_code(&block.text());
    if code.trim().is_empty() {
        return String::new();
    }
    fenced(&code, &infer_language(block))
}

/// Wraps code in a backtick fence long enough not to clash with its content
pub fn fenced(code: &str, language: &str) -> String {
    let longest_run = code
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.max(2) + 1);
    format!("{fence}{language}\n{code}\n{fence}")
}

fn render_table(table: &Element) -> String {
    let rows: Vec<Vec<String>> = table
        .descendants()
        .filter(|el| el.tag == "tr")
        .map(|row| {
            row.child_elements()
                .filter(|cell| cell.tag == "th" || cell.tag == "td")
                .map(|cell| render_inline(&cell.children).replace('|', "\\|"))
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect();

    let Some(columns) = rows.iter().map(Vec::len).max() else {
        return String::new();
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (i, row) in rows.iter().enumerate() {
        let mut cells = row.clone();
        cells.resize(columns, String::new());
        lines.push(format!("| {} |", cells.join(" | ")));
        if i == 0 {
            lines.push(format!("|{}", " --- |".repeat(columns)));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{content_root, parse_document};

    fn body(html: &str) -> String {
        let document = parse_document(html);
        render_body(content_root(&document))
    }

    #[test]
    fn test_heading_runs() {
        let rendered = body(
            r#"<main>
                <h1>Serde</h1>
                <p>A <code>Serialize</code> framework.</p>
                <div class="ad">Buy now</div>
                <h2>Install</h2>
                <ul><li>Add the crate</li><li>Derive traits</li></ul>
            </main>"#,
        );

        assert_eq!(
            rendered,
            "### Serde\n\nA `Serialize` framework.\n\n#### Install\n\n- Add the crate\n- Derive traits"
        );
    }

    #[test]
    fn test_content_without_heading_is_discarded() {
        let rendered = body("<main><p>Orphan paragraph</p><h2>Kept</h2><p>Yes</p></main>");
        assert_eq!(rendered, "#### Kept\n\nYes");
    }

    #[test]
    fn test_nested_sections_are_walked() {
        let rendered = body(
            "<main><section><h5>Deep</h5><ol><li>one</li><li>two</li></ol></section></main>",
        );
        assert_eq!(rendered, "###### Deep\n\n1. one\n2. two");
    }

    #[test]
    fn test_headings_inside_a_run_container_are_kept() {
        let rendered = body(
            r#"<main><h1>Serde</h1><p>Intro.</p><div class="content"><h2>Derive</h2><p>Use derive.</p></div></main>"#,
        );
        assert_eq!(rendered, "### Serde\n\nIntro.\n\n#### Derive\n\nUse derive.");
    }

    #[test]
    fn test_run_continues_after_nested_section() {
        let rendered = body(
            "<main><h2>Guide</h2><section><h3>Step</h3><p>One.</p></section><p>Wrap up.</p></main>",
        );
        assert_eq!(rendered, "#### Guide\n\n##### Step\n\nOne.\n\nWrap up.");
    }

    #[test]
    fn test_body_blocks_expose_headings() {
        let document = parse_document("<main><h2>Install</h2><p>Run it.</p></main>");
        assert_eq!(
            render_body_blocks(content_root(&document)),
            vec![
                BodyBlock::Heading {
                    level: 4,
                    text: "Install".to_string()
                },
                BodyBlock::Content("Run it.".to_string()),
            ]
        );
    }

    #[test]
    fn test_code_block_is_fenced_with_language() {
        let rendered = body(
            r#"<main><h2>Usage</h2><pre class="language-rust">fn main() {
    run();
}</pre></main>"#,
        );
        assert_eq!(
            rendered,
            "#### Usage\n\n```rust\nfn main() {\n    run();\n}\n```"
        );
    }

    #[test]
    fn test_table() {
        let rendered = body(
            "<main><h2>Options</h2><table>\
             <tr><th>Name</th><th>Default</th></tr>\
             <tr><td>a|b</td><td><code>1</code></td></tr>\
             </table></main>",
        );
        assert_eq!(
            rendered,
            "#### Options\n\n| Name | Default |\n| --- | --- |\n| a\\|b | `1` |"
        );
    }

    #[test]
    fn test_fence_grows_past_backticks_in_code() {
        assert_eq!(fenced("let s = \"```\";", "rust"), "````rust\nlet s = \"```\";\n````");
        assert_eq!(fenced("x", ""), "```\nx\n```");
    }

    #[test]
    fn test_inline_emphasis() {
        let document = parse_document("<p>Use <strong>only</strong> <em>one</em> call.</p>");
        let paragraph = document.find(|el| el.tag == "p").unwrap();
        assert_eq!(render_inline(&paragraph.children), "Use **only** *one* call.");
    }
}
