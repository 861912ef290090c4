//! Heading anchors

use std::collections::HashMap;

/// Converts heading text into a Markdown anchor slug
///
/// Lowercases, keeps alphanumerics, `-` and `_`, turns whitespace into `-` and
/// drops everything else.
///
/// ```
/// use docweave::compiler::slugify;
///
/// assert_eq!(slugify("Getting Started: Install"), "getting-started-install");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.trim().chars() {
        if ch.is_alphanumeric() || ch == '-' || ch == '_' {
            slug.extend(ch.to_lowercase());
        } else if ch.is_whitespace() {
            slug.push('-');
        }
    }
    slug
}

/// Hands out unique slugs, suffixing repeats with `-1`, `-2`, ...
#[derive(Debug, Default)]
pub struct SlugRegistry {
    seen: HashMap<String, usize>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a slug for `text` that has not been handed out before
    pub fn unique(&mut self, text: &str) -> String {
        let base = slugify(text);
        let count = self.seen.entry(base.clone()).or_insert(0);
        let slug = if *count == 0 {
            base
        } else {
            format!("{}-{}", base, count)
        };
        *count += 1;
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Serde JSON"), "serde-json");
        assert_eq!(slugify("  API Reference (v2)  "), "api-reference-v2");
        assert_eq!(slugify("to_string"), "to_string");
        assert_eq!(slugify("Überblick"), "überblick");
    }

    #[test]
    fn test_unique_suffixes_repeats() {
        let mut registry = SlugRegistry::new();
        assert_eq!(registry.unique("Overview"), "overview");
        assert_eq!(registry.unique("Overview"), "overview-1");
        assert_eq!(registry.unique("overview"), "overview-2");
        assert_eq!(registry.unique("Guide"), "guide");
    }
}
