//! Metadata extraction engine
//!
//! Each field is derived by an ordered cascade of extractor functions; the
//! first one to produce a non-empty value wins. The cascades are plain data
//! so individual extractors stay testable in isolation.

use crate::extract::{element_text, truncate_chars, PageDoc, PageMetadata};
use scraper::{ElementRef, Selector};
use std::collections::BTreeSet;

type FieldExtractor = fn(&PageDoc) -> Option<String>;

const COMPANY_CASCADE: &[(&str, FieldExtractor)] = &[
    ("site-name meta", company_from_site_name),
    ("application-name meta", company_from_application_name),
    ("author meta", company_from_author),
    ("header heading", company_from_header_heading),
];

const TITLE_CASCADE: &[(&str, FieldExtractor)] = &[
    ("og:title meta", title_from_og),
    ("twitter:title meta", title_from_twitter),
    ("first h1", title_from_h1),
    ("title element", title_from_title_element),
];

const DATE_CASCADE: &[(&str, FieldExtractor)] = &[
    ("article:published_time meta", date_from_article_meta),
    ("time datetime attribute", date_from_time_attr),
    ("time element text", date_from_time_text),
    ("year scan", date_from_year_scan),
];

/// How many leading characters of page text the year scan considers
const YEAR_SCAN_WINDOW: usize = 1200;

/// Maximum length of an extracted executive summary, in characters
const EXEC_SUMMARY_MAX_CHARS: usize = 4000;

/// How many sibling elements after a summary heading are collected
const EXEC_SUMMARY_SIBLINGS: usize = 6;

/// Derives all metadata fields from a parsed page
///
/// Pure function of the page; never fails, fields for which every fallback
/// comes up empty stay empty.
pub fn extract_metadata(page: &PageDoc) -> PageMetadata {
    PageMetadata {
        company: run_cascade(page, "company", COMPANY_CASCADE),
        title: run_cascade(page, "title", TITLE_CASCADE),
        date: run_cascade(page, "date", DATE_CASCADE),
        exec_summary: extract_exec_summary(page),
        tags: extract_tags(page),
    }
}

/// Runs an ordered extractor cascade; the first non-empty value wins
fn run_cascade(page: &PageDoc, field: &str, cascade: &[(&str, FieldExtractor)]) -> String {
    for (source, extractor) in cascade {
        if let Some(value) = extractor(page)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        {
            tracing::trace!("{} extracted from {}", field, source);
            return value;
        }
    }
    String::new()
}

/// Returns the trimmed content attribute of the first element matching the selector
fn meta_content(page: &PageDoc, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    page.document()
        .select(&sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Returns the collapsed text of the first element matching the selector
fn first_text(page: &PageDoc, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    page.document()
        .select(&sel)
        .next()
        .map(|el| element_text(&el))
        .filter(|v| !v.is_empty())
}

fn company_from_site_name(page: &PageDoc) -> Option<String> {
    meta_content(page, r#"meta[property="og:site_name"]"#)
}

fn company_from_application_name(page: &PageDoc) -> Option<String> {
    meta_content(page, r#"meta[name="application-name"]"#)
}

fn company_from_author(page: &PageDoc) -> Option<String> {
    meta_content(page, r#"meta[name="author"]"#)
}

fn company_from_header_heading(page: &PageDoc) -> Option<String> {
    first_text(page, "header h1, header h2, header h3")
}

fn title_from_og(page: &PageDoc) -> Option<String> {
    meta_content(page, r#"meta[property="og:title"]"#)
}

fn title_from_twitter(page: &PageDoc) -> Option<String> {
    meta_content(page, r#"meta[name="twitter:title"]"#)
}

fn title_from_h1(page: &PageDoc) -> Option<String> {
    first_text(page, "h1")
}

fn title_from_title_element(page: &PageDoc) -> Option<String> {
    first_text(page, "title")
}

fn date_from_article_meta(page: &PageDoc) -> Option<String> {
    meta_content(page, r#"meta[property="article:published_time"]"#)
}

fn date_from_time_attr(page: &PageDoc) -> Option<String> {
    let sel = Selector::parse("time[datetime]").ok()?;
    page.document()
        .select(&sel)
        .next()
        .and_then(|el| el.value().attr("datetime"))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn date_from_time_text(page: &PageDoc) -> Option<String> {
    first_text(page, "time")
}

fn date_from_year_scan(page: &PageDoc) -> Option<String> {
    scan_year(page.text())
}

/// Scans the leading window of page text for the first standalone 19xx/20xx
/// year. Neighbors must not be ASCII alphanumeric, so "12023" and "2023rd"
/// do not match.
fn scan_year(text: &str) -> Option<String> {
    let window: String = text.chars().take(YEAR_SCAN_WINDOW).collect();
    let bytes = window.as_bytes();

    for i in 0..bytes.len().saturating_sub(3) {
        let quad = &bytes[i..i + 4];
        if !quad.iter().all(|b| b.is_ascii_digit()) {
            continue;
        }
        if !(quad.starts_with(b"19") || quad.starts_with(b"20")) {
            continue;
        }
        let boundary_before = i == 0 || !bytes[i - 1].is_ascii_alphanumeric();
        let boundary_after = i + 4 >= bytes.len() || !bytes[i + 4].is_ascii_alphanumeric();
        if boundary_before && boundary_after {
            return Some(window[i..i + 4].to_string());
        }
    }
    None
}

/// Extracts the executive summary block
///
/// Looks for the first h1..h6 heading whose text contains "executive summary"
/// or is exactly the word "summary" (case-insensitive), then collects the
/// non-empty texts of up to 6 following sibling elements, joined by blank
/// lines. Falls back to the first non-empty paragraph in the main content
/// regions when no heading matches.
fn extract_exec_summary(page: &PageDoc) -> String {
    if let Some(heading) = find_summary_heading(page) {
        let mut parts = Vec::new();
        for sibling in heading
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .take(EXEC_SUMMARY_SIBLINGS)
        {
            let text = element_text(&sibling);
            if !text.is_empty() {
                parts.push(text);
            }
        }
        return truncate_chars(&parts.join("\n\n"), EXEC_SUMMARY_MAX_CHARS);
    }

    if let Ok(sel) = Selector::parse("article p, .content p, #content p, .report p, #report p") {
        for paragraph in page.document().select(&sel) {
            let text = element_text(&paragraph);
            if !text.is_empty() {
                return truncate_chars(&text, EXEC_SUMMARY_MAX_CHARS);
            }
        }
    }

    String::new()
}

fn find_summary_heading<'a>(page: &'a PageDoc) -> Option<ElementRef<'a>> {
    let sel = Selector::parse("h1, h2, h3, h4, h5, h6").ok()?;
    page.document().select(&sel).find(|heading| {
        let text = element_text(heading).to_lowercase();
        text.contains("executive summary") || text == "summary"
    })
}

/// Extracts topical tags
///
/// Starts from the comma-split keywords meta, then appends the literal tags
/// "esg" and "sustainability" when those words appear anywhere in the page
/// text. Dedup is exact-string only: "ESG" from the keywords meta and the
/// appended "esg" coexist.
fn extract_tags(page: &PageDoc) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();

    if let Some(keywords) = meta_content(page, r#"meta[name="keywords"]"#) {
        for part in keywords.split(',') {
            let tag = part.trim();
            if !tag.is_empty() {
                tags.insert(tag.to_string());
            }
        }
    }

    let lower = page.text().to_lowercase();
    if lower.contains("esg") {
        tags.insert("esg".to_string());
    }
    if lower.contains("sustainability") {
        tags.insert("sustainability".to_string());
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::test_page;

    #[test]
    fn test_title_prefers_og_over_h1() {
        let page = test_page(
            r#"<html><head>
                <meta property="og:title" content="OG Title">
                <title>Doc Title</title>
            </head><body><h1>H1 Title</h1></body></html>"#,
        );
        let metadata = extract_metadata(&page);
        assert_eq!(metadata.title, "OG Title");
    }

    #[test]
    fn test_title_falls_back_to_h1_then_title() {
        let page = test_page("<html><head><title>Doc Title</title></head><body><h1>H1 Title</h1></body></html>");
        assert_eq!(extract_metadata(&page).title, "H1 Title");

        let page = test_page("<html><head><title>Doc Title</title></head><body></body></html>");
        assert_eq!(extract_metadata(&page).title, "Doc Title");
    }

    #[test]
    fn test_title_empty_when_nothing_matches() {
        let page = test_page("<html><body><p>no titles here</p></body></html>");
        assert_eq!(extract_metadata(&page).title, "");
    }

    #[test]
    fn test_company_cascade_order() {
        let page = test_page(
            r#"<html><head>
                <meta property="og:site_name" content="Acme Corp">
                <meta name="author" content="Someone Else">
            </head><body><header><h1>Header Name</h1></header></body></html>"#,
        );
        assert_eq!(extract_metadata(&page).company, "Acme Corp");

        let page = test_page(
            r#"<html><head><meta name="author" content="Acme IR Team"></head>
            <body><header><h1>Header Name</h1></header></body></html>"#,
        );
        assert_eq!(extract_metadata(&page).company, "Acme IR Team");

        let page = test_page("<html><body><header><h2>Acme Holdings</h2></header></body></html>");
        assert_eq!(extract_metadata(&page).company, "Acme Holdings");
    }

    #[test]
    fn test_date_from_meta_and_time() {
        let page = test_page(
            r#"<html><head><meta property="article:published_time" content="2023-04-05"></head>
            <body><time datetime="2022-01-01">January 2022</time></body></html>"#,
        );
        assert_eq!(extract_metadata(&page).date, "2023-04-05");

        let page = test_page(
            r#"<html><body><time datetime="2022-01-01">January 2022</time></body></html>"#,
        );
        assert_eq!(extract_metadata(&page).date, "2022-01-01");

        let page = test_page("<html><body><time>March 2021</time></body></html>");
        assert_eq!(extract_metadata(&page).date, "March 2021");
    }

    #[test]
    fn test_date_year_scan_fallback() {
        let page = test_page("<html><body><p>Published in 2019 by Acme.</p></body></html>");
        assert_eq!(extract_metadata(&page).date, "2019");
    }

    #[test]
    fn test_date_year_scan_rejects_embedded_digits() {
        assert_eq!(scan_year("order number 12023 here"), None);
        assert_eq!(scan_year("as of 2023, things"), Some("2023".to_string()));
        assert_eq!(scan_year("ISO9001:2015 certified"), Some("2015".to_string()));
        assert_eq!(scan_year("year 1850 predates"), None);
    }

    #[test]
    fn test_date_year_scan_window_limit() {
        let padding = "x ".repeat(700); // 1400 chars, pushes the year out of the window
        let body = format!("<html><body><p>{}2020</p></body></html>", padding);
        let page = test_page(&body);
        assert_eq!(extract_metadata(&page).date, "");
    }

    #[test]
    fn test_exec_summary_from_heading_siblings() {
        let page = test_page(
            r#"<html><body>
                <h2>Executive Summary</h2>
                <p>First paragraph.</p>
                <p></p>
                <p>Second paragraph.</p>
            </body></html>"#,
        );
        let metadata = extract_metadata(&page);
        assert_eq!(metadata.exec_summary, "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn test_exec_summary_standalone_summary_heading() {
        let page = test_page(
            r#"<html><body>
                <h3>Summary</h3>
                <p>Condensed overview.</p>
            </body></html>"#,
        );
        assert_eq!(extract_metadata(&page).exec_summary, "Condensed overview.");
    }

    #[test]
    fn test_exec_summary_ignores_summary_inside_longer_heading() {
        // "Annual summary of events" contains the word but is neither the
        // standalone word nor the "executive summary" phrase
        let page = test_page(
            r#"<html><body>
                <h3>Annual summary of events</h3>
                <p>Not a summary block.</p>
            </body></html>"#,
        );
        assert_eq!(extract_metadata(&page).exec_summary, "");
    }

    #[test]
    fn test_exec_summary_sibling_cap() {
        let mut body = String::from("<html><body><h2>Executive Summary</h2>");
        for i in 1..=8 {
            body.push_str(&format!("<p>Para {}</p>", i));
        }
        body.push_str("</body></html>");
        let page = test_page(&body);

        let summary = extract_metadata(&page).exec_summary;
        assert!(summary.contains("Para 6"));
        assert!(!summary.contains("Para 7"));
    }

    #[test]
    fn test_exec_summary_truncated_to_4000_chars() {
        let chunk = "word ".repeat(200); // 1000 chars per paragraph
        let mut body = String::from("<html><body><h2>Executive Summary</h2>");
        for _ in 0..6 {
            body.push_str(&format!("<p>{}</p>", chunk));
        }
        body.push_str("</body></html>");
        let page = test_page(&body);

        let summary = extract_metadata(&page).exec_summary;
        assert_eq!(summary.chars().count(), 4000);

        let full = (0..6)
            .map(|_| chunk.trim().to_string())
            .collect::<Vec<_>>()
            .join("\n\n");
        assert!(full.starts_with(&summary));
    }

    #[test]
    fn test_exec_summary_paragraph_fallback() {
        let page = test_page(
            r#"<html><body>
                <article><p></p><p>Our environmental commitments.</p></article>
            </body></html>"#,
        );
        assert_eq!(
            extract_metadata(&page).exec_summary,
            "Our environmental commitments."
        );
    }

    #[test]
    fn test_exec_summary_content_region_fallback() {
        let page = test_page(
            r#"<html><body>
                <div class="content"><p>Report overview text.</p></div>
            </body></html>"#,
        );
        assert_eq!(extract_metadata(&page).exec_summary, "Report overview text.");
    }

    #[test]
    fn test_exec_summary_empty_when_nothing_matches() {
        let page = test_page("<html><body><div><p>Plain page.</p></div></body></html>");
        assert_eq!(extract_metadata(&page).exec_summary, "");
    }

    #[test]
    fn test_tags_from_keywords_and_body() {
        let page = test_page(
            r#"<html><head><meta name="keywords" content="ESG, esg, Sustainability"></head>
            <body><p>Our ESG strategy drives sustainability.</p></body></html>"#,
        );
        let tags = extract_metadata(&page).tags;

        // Exact-string dedup: case variants survive as distinct members
        let expected: std::collections::BTreeSet<String> =
            ["ESG", "esg", "Sustainability", "sustainability"]
                .iter()
                .map(|s| s.to_string())
                .collect();
        assert_eq!(tags, expected);
    }

    #[test]
    fn test_tags_without_keywords_meta() {
        let page = test_page("<html><body><p>Sustainability matters.</p></body></html>");
        let tags = extract_metadata(&page).tags;
        let expected: std::collections::BTreeSet<String> =
            ["sustainability"].iter().map(|s| s.to_string()).collect();
        assert_eq!(tags, expected);
    }

    #[test]
    fn test_tags_empty() {
        let page = test_page("<html><body><p>Nothing topical here.</p></body></html>");
        assert!(extract_metadata(&page).tags.is_empty());
    }
}
