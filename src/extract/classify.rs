//! Record classification
//!
//! Combines extracted metadata and the PDF candidate set into zero, one, or
//! several output records for one page. Pure function; the coordinator
//! forwards the result to the sink in order.

use crate::extract::{truncate_chars, PageDoc, PageMetadata};
use crate::sink::OutputRecord;

/// Maximum number of PDF-candidate records emitted per page
pub const MAX_PDF_RECORDS_PER_PAGE: usize = 5;

/// How many leading characters of page text the likely-report check considers
const KEYWORD_WINDOW: usize = 2000;

/// Keywords that mark a page as a likely report, matched case-insensitively
/// over the leading text window
const LIKELY_REPORT_KEYWORDS: &[&str] = &[
    "sustainability",
    "esg",
    "csr",
    "environmental",
    "social",
    "governance",
    "sustainability report",
    "esg report",
];

/// Decides which records a page yields
///
/// With PDF candidates present, one record per distinct candidate URL is
/// emitted, capped to the first 5 in discovery order. Otherwise a single
/// record with an empty pdf_url is emitted when the page looks like a report
/// (non-empty executive summary, or report keywords near the top of the
/// text); pages that look like neither yield nothing, which is a normal
/// outcome.
pub fn classify(
    metadata: &PageMetadata,
    pdf_candidates: &[String],
    page: &PageDoc,
) -> Vec<OutputRecord> {
    if !pdf_candidates.is_empty() {
        return pdf_candidates
            .iter()
            .take(MAX_PDF_RECORDS_PER_PAGE)
            .map(|pdf_url| build_record(metadata, page, pdf_url))
            .collect();
    }

    if is_likely_report(metadata, page.text()) {
        return vec![build_record(metadata, page, "")];
    }

    Vec::new()
}

fn build_record(metadata: &PageMetadata, page: &PageDoc, pdf_url: &str) -> OutputRecord {
    OutputRecord {
        company: metadata.company.clone(),
        title: metadata.title.clone(),
        date: metadata.date.clone(),
        pdf_url: pdf_url.to_string(),
        exec_summary: metadata.exec_summary.clone(),
        tags: metadata.tags.clone(),
        url: page.url().to_string(),
    }
}

fn is_likely_report(metadata: &PageMetadata, text: &str) -> bool {
    if !metadata.exec_summary.is_empty() {
        return true;
    }

    let window = truncate_chars(text, KEYWORD_WINDOW).to_lowercase();
    LIKELY_REPORT_KEYWORDS.iter().any(|k| window.contains(k))
}
