//! Data sink module for persisting classified records
//!
//! This module handles the append-only record store, including:
//! - SQLite database initialization and schema management
//! - Appending output records with their tags
//! - Run tracking (start/finish timestamps, config hash)
//! - Dataset statistics for the `--stats` mode

mod schema;
mod sqlite;
mod stats;
mod traits;

pub use sqlite::SqliteSink;
pub use stats::{load_statistics, print_statistics, SinkStats};
pub use traits::{DataSink, SinkError, SinkResult};

use std::collections::BTreeSet;

/// A classified record describing a likely sustainability/ESG disclosure
///
/// One page yields zero or more of these. `pdf_url` is the empty string when
/// the record describes the HTML page itself rather than a linked document.
/// Records are immutable once emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    pub company: String,
    pub title: String,
    pub date: String,
    pub pdf_url: String,
    pub exec_summary: String,
    /// Topical tags, case as found on the page. Deduplication is by exact
    /// string equality only, so "ESG" and "esg" are distinct members.
    pub tags: BTreeSet<String>,
    pub url: String,
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
