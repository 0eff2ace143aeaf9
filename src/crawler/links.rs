//! Link extraction for crawl frontier discovery
//!
//! Enumerates a page's link-like references, resolves them against the page's
//! resolved URL, and submits each candidate to the frontier controller. Link
//! discovery is comprehensive: it is independent of the PDF detector's
//! anchor scan.

use crate::crawler::frontier::{CrawlRequest, Frontier};
use crate::extract::PageDoc;
use scraper::Selector;
use url::Url;

/// Discovers links on a page and submits them to the frontier
///
/// Returns the number of candidates that were admitted. Admitted requests
/// carry the origin's start host forward.
pub fn discover_links(page: &PageDoc, origin: &CrawlRequest, frontier: &Frontier) -> usize {
    let mut admitted = 0;
    for candidate in candidate_links(page) {
        if frontier.admit(&candidate, origin) {
            admitted += 1;
        }
    }
    admitted
}

/// Enumerates candidate link strings from a page
///
/// Covers `a[href]` anchors and the canonical link. Special-scheme and
/// fragment-only hrefs are excluded; an href that fails to resolve against
/// the base is passed through raw so the frontier's malformed-URL policy can
/// decide on it.
pub(crate) fn candidate_links(page: &PageDoc) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(sel) = Selector::parse("a[href]") {
        for element in page.document().select(&sel) {
            if let Some(href) = element.value().attr("href") {
                if let Some(candidate) = resolve_candidate(href, page.url()) {
                    links.push(candidate);
                }
            }
        }
    }

    if let Ok(sel) = Selector::parse(r#"link[rel="canonical"][href]"#) {
        for element in page.document().select(&sel) {
            if let Some(href) = element.value().attr("href") {
                if let Some(candidate) = resolve_candidate(href, page.url()) {
                    links.push(candidate);
                }
            }
        }
    }

    links
}

/// Resolves an href to a candidate string
///
/// Returns None for hrefs that are never crawlable:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links (same page anchors)
/// - non-HTTP(S) URLs after resolution
fn resolve_candidate(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    if href.starts_with('#') {
        return None;
    }

    match base.join(href) {
        Ok(url) => {
            if url.scheme() == "http" || url.scheme() == "https" {
                Some(url.to_string())
            } else {
                None
            }
        }
        // Unresolvable href: submit raw so the admission policy sees it
        Err(_) => Some(href.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::make_config;
    use crate::extract::test_page;

    fn origin() -> CrawlRequest {
        CrawlRequest {
            url: "https://acme.example/reports/2023".to_string(),
            start_host: Some("acme.example".to_string()),
        }
    }

    #[test]
    fn test_resolves_relative_and_absolute_links() {
        let page = test_page(
            r#"<html><body>
                <a href="/esg">ESG</a>
                <a href="archive">Archive</a>
                <a href="https://other.example/page">External</a>
            </body></html>"#,
        );
        let links = candidate_links(&page);
        assert_eq!(
            links,
            vec![
                "https://acme.example/esg".to_string(),
                "https://acme.example/reports/archive".to_string(),
                "https://other.example/page".to_string(),
            ]
        );
    }

    #[test]
    fn test_includes_canonical_link() {
        let page = test_page(
            r#"<html><head><link rel="canonical" href="https://acme.example/canonical"></head>
            <body></body></html>"#,
        );
        let links = candidate_links(&page);
        assert!(links.contains(&"https://acme.example/canonical".to_string()));
    }

    #[test]
    fn test_skips_special_schemes_and_fragments() {
        let page = test_page(
            r##"<html><body>
                <a href="javascript:void(0)">JS</a>
                <a href="mailto:ir@acme.example">Mail</a>
                <a href="tel:+1234567890">Call</a>
                <a href="data:text/html,hi">Data</a>
                <a href="#section">Jump</a>
                <a href="">Empty</a>
            </body></html>"##,
        );
        assert!(candidate_links(&page).is_empty());
    }

    #[test]
    fn test_unresolvable_href_passed_raw() {
        let page = test_page(r#"<html><body><a href="http://[broken">Broken</a></body></html>"#);
        let links = candidate_links(&page);
        assert_eq!(links, vec!["http://[broken".to_string()]);
    }

    #[test]
    fn test_discover_links_admits_into_frontier() {
        let page = test_page(
            r#"<html><body>
                <a href="/a">A</a>
                <a href="/b">B</a>
                <a href="/a">A again</a>
            </body></html>"#,
        );
        let frontier = Frontier::new(&make_config(vec![]).crawler);

        let admitted = discover_links(&page, &origin(), &frontier);
        assert_eq!(admitted, 2);
        assert_eq!(frontier.pending(), 2);

        let first = frontier.next().unwrap();
        assert_eq!(first.url, "https://acme.example/a");
        assert_eq!(first.start_host, Some("acme.example".to_string()));
    }

    #[test]
    fn test_discover_links_respects_host_scope() {
        let page = test_page(
            r#"<html><body>
                <a href="/internal">In</a>
                <a href="https://other.example/out">Out</a>
            </body></html>"#,
        );
        let mut config = make_config(vec![]).crawler;
        config.follow_internal_only = true;
        let frontier = Frontier::new(&config);

        let admitted = discover_links(&page, &origin(), &frontier);
        assert_eq!(admitted, 1);
        assert_eq!(frontier.next().unwrap().url, "https://acme.example/internal");
    }
}
