//! Data sink trait and error types

use crate::sink::OutputRecord;
use thiserror::Error;

/// Errors that can occur during sink operations
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Trait for append-only record store implementations
///
/// The crawl core only ever appends; there are no update or delete paths.
/// The query methods serve the statistics mode and tests.
pub trait DataSink {
    /// Appends one record, attributed to the given run
    fn append(&mut self, record: &OutputRecord, run_id: i64) -> SinkResult<()>;

    /// Total number of records in the store
    fn count_records(&self) -> SinkResult<u64>;

    /// Number of records carrying a non-empty pdf_url
    fn count_pdf_records(&self) -> SinkResult<u64>;

    /// Number of distinct page URLs that produced records
    fn count_distinct_pages(&self) -> SinkResult<u64>;

    /// Record counts grouped by page host, most records first
    fn records_per_host(&self) -> SinkResult<Vec<(String, u64)>>;

    /// The most frequent tags across all records, most frequent first
    fn top_tags(&self, limit: usize) -> SinkResult<Vec<(String, u64)>>;

    /// Loads all records with their tags, in insertion order
    fn load_records(&self) -> SinkResult<Vec<OutputRecord>>;
}
