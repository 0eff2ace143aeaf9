//! Statistics generation from the record store
//!
//! This module provides functionality for extracting and displaying
//! dataset statistics from the sink layer.

use crate::sink::traits::DataSink;
use crate::sink::SinkResult;

/// Dataset statistics summary
#[derive(Debug, Clone)]
pub struct SinkStats {
    /// Total number of records emitted
    pub total_records: u64,

    /// Records pointing at a PDF/report document
    pub pdf_records: u64,

    /// Records describing the HTML page itself
    pub html_records: u64,

    /// Number of distinct page URLs that produced records
    pub distinct_pages: u64,

    /// Record counts per page host, most records first
    pub records_per_host: Vec<(String, u64)>,

    /// Most frequent tags, most frequent first
    pub top_tags: Vec<(String, u64)>,
}

/// Loads statistics from the sink
///
/// # Arguments
///
/// * `sink` - The record store to query
pub fn load_statistics(sink: &dyn DataSink) -> SinkResult<SinkStats> {
    let total_records = sink.count_records()?;
    let pdf_records = sink.count_pdf_records()?;
    let distinct_pages = sink.count_distinct_pages()?;
    let records_per_host = sink.records_per_host()?;
    let top_tags = sink.top_tags(15)?;

    Ok(SinkStats {
        total_records,
        pdf_records,
        html_records: total_records - pdf_records,
        distinct_pages,
        records_per_host,
        top_tags,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &SinkStats) {
    println!("=== Dataset Statistics ===\n");

    println!("Overview:");
    println!("  Total records: {}", stats.total_records);
    println!("  PDF/report links: {}", stats.pdf_records);
    println!("  HTML report pages: {}", stats.html_records);
    println!("  Distinct source pages: {}", stats.distinct_pages);
    println!();

    if !stats.records_per_host.is_empty() {
        println!("Records by Host:");
        for (host, count) in &stats.records_per_host {
            let percentage = if stats.total_records > 0 {
                (*count as f64 / stats.total_records as f64) * 100.0
            } else {
                0.0
            };
            let label = if host.is_empty() { "(unknown)" } else { host };
            println!("  {}: {} ({:.1}%)", label, count, percentage);
        }
        println!();
    }

    if !stats.top_tags.is_empty() {
        println!("Top Tags:");
        for (tag, count) in &stats.top_tags {
            println!("  {}: {}", tag, count);
        }
        println!();
    }
}
