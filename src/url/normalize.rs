use crate::UrlError;
use url::Url;

/// Query parameters that never change page content and are dropped from links
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid", "ref", "source"];

/// Schemes that never lead to a fetchable documentation page
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Normalizes a URL so that equivalent links map to one frontier key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Only HTTP and HTTPS are accepted
/// 3. A host is required
/// 4. Remove fragment (everything after #)
/// 5. Remove tracking query parameters (`utm_*`, `fbclid`, ...), keeping the
///    order of the remaining ones
/// 6. Remove an empty query string
///
/// Paths are left untouched: documentation sites frequently distinguish
/// `/guide` from `/guide/`.
///
/// # Examples
///
/// ```
/// use docweave::url::normalize_url;
///
/// let url = normalize_url("https://Docs.Example.com/guide?utm_source=x#install").unwrap();
/// assert_eq!(url.as_str(), "https://docs.example.com/guide");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Normalizes an already parsed URL; see [`normalize_url`]
pub fn normalize_parsed(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    if url.query().is_some() {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !is_tracking_param(key))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
    }

    Ok(url)
}

/// Resolves a link href against a base URL and normalizes it
///
/// Returns `None` if the link should be excluded:
/// - empty hrefs and fragment-only hrefs
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - hrefs that do not resolve to an HTTP(S) URL
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    normalize_parsed(absolute).ok()
}

/// Returns true if both URLs address the same document, ignoring fragments
pub fn same_document(a: &Url, b: &Url) -> bool {
    without_fragment(a) == without_fragment(b)
}

fn without_fragment(url: &Url) -> &str {
    let s = url.as_str();
    match s.find('#') {
        Some(idx) => &s[..idx],
        None => s,
    }
}

fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
