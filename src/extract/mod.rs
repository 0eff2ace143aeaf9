//! Page classification and metadata extraction
//!
//! This module contains the decision logic of the crawler:
//! - Metadata extraction via ordered fallback cascades
//! - PDF/report-link detection
//! - The record-classification decision
//!
//! Everything in here is a pure function of a parsed page; fetching and
//! persistence live elsewhere.

mod classify;
mod metadata;
mod pdf;

pub use classify::{classify, MAX_PDF_RECORDS_PER_PAGE};
pub use metadata::extract_metadata;
pub use pdf::{detect_report_links, REPORT_LINK_KEYWORDS};

use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// A fetched page parsed for extraction
///
/// Holds the document tree, the resolved (post-redirect) URL, and the page's
/// plain-text content. Read-only to all extraction logic.
pub struct PageDoc {
    html: Html,
    url: Url,
    text: String,
}

impl PageDoc {
    /// Parses an HTML body fetched from the given resolved URL
    pub fn parse(body: &str, url: Url) -> Self {
        let html = Html::parse_document(body);
        let text = collect_page_text(&html);
        Self { html, url, text }
    }

    /// The resolved URL the page was fetched from
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Whitespace-collapsed plain text of the page body
    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn document(&self) -> &Html {
        &self.html
    }
}

/// Metadata extracted from one page
///
/// Every field may be empty; extraction never fails, it just runs out of
/// fallbacks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageMetadata {
    pub company: String,
    pub title: String,
    /// Free-form date string; not parsed into a calendar type
    pub date: String,
    /// At most 4000 characters
    pub exec_summary: String,
    /// Case as found; deduplicated by exact string equality only
    pub tags: BTreeSet<String>,
}

/// Collects the page's plain text from the body element (document root when
/// there is no body), with whitespace runs collapsed to single spaces.
fn collect_page_text(html: &Html) -> String {
    let root = Selector::parse("body")
        .ok()
        .and_then(|sel| html.select(&sel).next())
        .unwrap_or_else(|| html.root_element());
    collapse_whitespace(&root.text().collect::<Vec<_>>().join(" "))
}

/// Returns the element's text with whitespace collapsed
pub(crate) fn element_text(element: &ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates a string to at most `max` characters, on a char boundary
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
pub(crate) fn test_page(body: &str) -> PageDoc {
    PageDoc::parse(body, Url::parse("https://acme.example/reports/2023").unwrap())
}
