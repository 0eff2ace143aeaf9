//! Crawler module for web page fetching and crawl scoping
//!
//! This module contains the crawl machinery, including:
//! - Frontier admission control (cap, dedup, host scope)
//! - HTTP fetching with retry logic
//! - Link discovery
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod links;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_page, FetchOutcome, FetchedPage};
pub use frontier::{CrawlRequest, Frontier};
pub use links::discover_links;

use crate::config::Config;
use crate::ScoutError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Initialize the record store and register a run
/// 2. Seed the frontier from the configured start URLs
/// 3. Fetch and process pages with a bounded worker pool
/// 4. Emit classified records to the sink
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `config_hash` - Hash of the configuration file, recorded on the run
pub async fn crawl(config: Config, config_hash: &str) -> Result<(), ScoutError> {
    run_crawl(config, config_hash).await
}
