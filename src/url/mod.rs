//! URL handling helpers for Disclosure-Scout
//!
//! The frontier's host-scope filter compares network hosts exactly; this
//! module provides the host extraction used on both sides of that comparison.

use url::Url;

/// Extracts the host from a URL string
///
/// Parses the string and returns the lowercase host portion. Returns None for
/// strings that fail to parse or URLs without a host (e.g. `mailto:`).
///
/// # Examples
///
/// ```
/// use disclosure_scout::url::host_of;
///
/// assert_eq!(host_of("https://example.com/path"), Some("example.com".to_string()));
/// assert_eq!(host_of("https://EXAMPLE.COM/path"), Some("example.com".to_string()));
/// assert_eq!(host_of("not a url"), None);
/// ```
pub fn host_of(url_str: &str) -> Option<String> {
    let url = Url::parse(url_str).ok()?;
    extract_host(&url)
}

/// Extracts the lowercase host from a parsed URL
///
/// Returns None if the URL has no host component.
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
