use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use docweave::url::extract_domain;
///
/// let url = Url::parse("https://DOCS.rs/serde").unwrap();
/// assert_eq!(extract_domain(&url), Some("docs.rs".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if the URL's host equals `host` (case-insensitive)
///
/// Ports are not compared; subdomains are distinct hosts.
pub fn is_same_host(url: &Url, host: &str) -> bool {
    url.host_str()
        .is_some_and(|h| h.eq_ignore_ascii_case(host))
}
