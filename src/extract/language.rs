//! Language tag inference for code blocks

use crate::markup::Element;

/// Attributes that name a code block's language directly
const LANGUAGE_ATTRIBUTES: &[&str] = &["data-language", "language", "data-lang"];

/// Class substrings mapped to language tags, checked in order
///
/// `json` precedes `js`, and the long names precede their abbreviations.
const CLASS_HINTS: &[(&str, &str)] = &[
    ("json", "json"),
    ("typescript", "typescript"),
    ("tsx", "tsx"),
    ("javascript", "javascript"),
    ("jsx", "jsx"),
    ("ts", "typescript"),
    ("js", "javascript"),
    ("python", "python"),
    ("py", "python"),
    ("rust", "rust"),
    ("golang", "go"),
    ("ruby", "ruby"),
    ("kotlin", "kotlin"),
    ("java", "java"),
    ("csharp", "csharp"),
    ("cpp", "cpp"),
    ("bash", "bash"),
    ("shell", "bash"),
    ("console", "bash"),
    ("toml", "toml"),
    ("yaml", "yaml"),
    ("html", "html"),
    ("css", "css"),
    ("sql", "sql"),
];

/// Infers the language of a code block
///
/// Tiers are tried in priority order across the block and then its descendant
/// elements, so a `language-*` class on a nested `<code>` beats a vague class
/// on the wrapping `<div>`:
///
/// 1. a class token `language-<tag>` or `lang-<tag>`
/// 2. `data-language`, `language` or `data-lang` attributes
/// 3. substring heuristics on the class attribute
///
/// Returns an empty string when nothing matches.
pub fn infer_language(block: &Element) -> String {
    let candidates: Vec<&Element> = std::iter::once(block).chain(block.descendants()).collect();

    candidates
        .iter()
        .find_map(|el| language_from_class_token(el))
        .or_else(|| candidates.iter().find_map(|el| language_from_attribute(el)))
        .or_else(|| candidates.iter().find_map(|el| language_from_class_hint(el)))
        .unwrap_or_default()
}

fn language_from_class_token(el: &Element) -> Option<String> {
    el.class_tokens().find_map(|token| {
        token
            .strip_prefix("language-")
            .or_else(|| token.strip_prefix("lang-"))
            .filter(|tag| !tag.is_empty())
            .map(str::to_lowercase)
    })
}

fn language_from_attribute(el: &Element) -> Option<String> {
    LANGUAGE_ATTRIBUTES.iter().find_map(|name| {
        el.attr(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase)
    })
}

fn language_from_class_hint(el: &Element) -> Option<String> {
    let class = el.class().to_lowercase();
    if class.is_empty() {
        return None;
    }

    CLASS_HINTS
        .iter()
        .find(|(hint, _)| class.contains(hint))
        .map(|(_, tag)| (*tag).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_document;

    fn first(html: &str, tag: &str) -> Element {
        let root = parse_document(html);
        root.find(|el| el.tag == tag).cloned().unwrap()
    }

    #[test]
    fn test_language_class_token() {
        let pre = first(r#"<html><body><pre class="language-rust">x</pre></body></html>"#, "pre");
        assert_eq!(infer_language(&pre), "rust");
    }

    #[test]
    fn test_lang_class_token() {
        let code = first(r#"<html><body><code class="hljs lang-Python">x</code></body></html>"#, "code");
        assert_eq!(infer_language(&code), "python");
    }

    #[test]
    fn test_nested_code_token_wins_over_wrapper_hint() {
        let div = first(
            r#"<html><body><div class="highlight-js"><pre><code class="language-typescript">x</code></pre></div></body></html>"#,
            "div",
        );
        assert_eq!(infer_language(&div), "typescript");
    }

    #[test]
    fn test_data_language_attribute() {
        let pre = first(r#"<html><body><pre data-language="Go">x</pre></body></html>"#, "pre");
        assert_eq!(infer_language(&pre), "go");
    }

    #[test]
    fn test_class_hints() {
        let json = first(r#"<html><body><pre class="sourceCode json">x</pre></body></html>"#, "pre");
        let js = first(r#"<html><body><pre class="highlight-js">x</pre></body></html>"#, "pre");
        let ts = first(r#"<html><body><pre class="snippet-ts">x</pre></body></html>"#, "pre");
        assert_eq!(infer_language(&json), "json");
        assert_eq!(infer_language(&js), "javascript");
        assert_eq!(infer_language(&ts), "typescript");
    }

    #[test]
    fn test_no_language() {
        let pre = first("<html><body><pre>plain</pre></body></html>", "pre");
        assert_eq!(infer_language(&pre), "");
    }
}
