//! PDF/report-link detector
//!
//! Scans a page's anchors for links that look like report documents, either
//! by a `.pdf` extension on the resolved URL or by report keywords in the raw
//! href. Runs independently of metadata extraction.

use crate::extract::PageDoc;
use scraper::Selector;
use std::collections::HashSet;

/// Keywords that mark an href as a report link, matched case-insensitively
/// as substrings of the raw (pre-resolution) href
pub const REPORT_LINK_KEYWORDS: &[&str] = &[
    "esg",
    "sustainability",
    "sustainability-report",
    "annual-report",
    "csr",
];

/// Detects PDF/report candidate links on a page
///
/// For every anchor with an href, resolves it against the page's resolved URL
/// and includes it when the lowercase absolute URL ends in ".pdf" or the raw
/// href contains a report keyword. The result is deduplicated by absolute URL
/// and preserves discovery order. Anchors without an href, and hrefs that
/// cannot be resolved, are skipped.
pub fn detect_report_links(page: &PageDoc) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    let Ok(sel) = Selector::parse("a[href]") else {
        return candidates;
    };

    for anchor in page.document().select(&sel) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(absolute) = page.url().join(href) else {
            continue;
        };
        let absolute = absolute.to_string();

        let is_pdf = absolute.to_lowercase().ends_with(".pdf");
        let href_lower = href.to_lowercase();
        let has_keyword = REPORT_LINK_KEYWORDS.iter().any(|k| href_lower.contains(k));

        if (is_pdf || has_keyword) && seen.insert(absolute.clone()) {
            candidates.push(absolute);
        }
    }

    candidates
}
