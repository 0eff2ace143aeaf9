//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates all aspects of the
//! crawling process, including:
//! - Initializing the sink and the frontier
//! - Seeding root requests
//! - Running the worker pool
//! - Per-page failure isolation
//!
//! Each request is processed as one unit of work: fetch, then a synchronous
//! pipeline of link discovery, metadata extraction, PDF detection,
//! classification, and emission. Fetching is the only suspension point.

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchOutcome, FetchedPage};
use crate::crawler::frontier::{CrawlRequest, Frontier};
use crate::crawler::links::discover_links;
use crate::extract::{classify, detect_report_links, extract_metadata, PageDoc};
use crate::sink::{DataSink, SqliteSink};
use crate::ScoutError;
use reqwest::Client;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::task::JoinSet;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    frontier: Arc<Frontier>,
    sink: Arc<Mutex<SqliteSink>>,
    client: Client,
    run_id: i64,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Opens the record store, registers a new run with the given config
    /// hash, and seeds the frontier from the configured start URLs.
    pub fn new(config: Config, config_hash: &str) -> Result<Self, ScoutError> {
        let mut sink = SqliteSink::new(Path::new(&config.output.database_path))?;
        let run_id = sink.create_run(config_hash)?;

        let client = build_http_client(&config.user_agent)?;

        let frontier = Arc::new(Frontier::new(&config.crawler));
        for seed in &config.crawler.start_urls {
            if frontier.seed(seed) {
                tracing::debug!("Seeded {}", seed);
            } else {
                tracing::warn!("Seed not admitted (duplicate or cap reached): {}", seed);
            }
        }

        Ok(Self {
            config: Arc::new(config),
            frontier,
            sink: Arc::new(Mutex::new(sink)),
            client,
            run_id,
        })
    }

    /// The frontier controller backing this crawl
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// The run ID registered for this crawl
    pub fn run_id(&self) -> i64 {
        self.run_id
    }

    /// Runs the main crawl loop
    ///
    /// A pool of workers pulls pending requests from the frontier until it
    /// drains. Once the admission cap is reached no new requests join, but
    /// requests already in flight are allowed to finish.
    pub async fn run(&mut self) -> Result<(), ScoutError> {
        tracing::info!("Starting crawl run {}", self.run_id);

        let max_workers = self.config.crawler.max_concurrent_pages_open as usize;
        let mut tasks: JoinSet<()> = JoinSet::new();
        let mut pages_processed: u64 = 0;
        let start_time = std::time::Instant::now();

        loop {
            // Fill free worker slots from the frontier
            while tasks.len() < max_workers {
                let Some(request) = self.frontier.next() else {
                    break;
                };

                let client = self.client.clone();
                let frontier = Arc::clone(&self.frontier);
                let sink = Arc::clone(&self.sink);
                let config = Arc::clone(&self.config);
                let run_id = self.run_id;

                tasks.spawn(async move {
                    process_request(request, &client, &frontier, &sink, &config, run_id).await;
                });
            }

            // Nothing in flight and nothing pending: the crawl is done
            match tasks.join_next().await {
                Some(Ok(())) => {
                    pages_processed += 1;

                    if pages_processed % 10 == 0 {
                        let elapsed = start_time.elapsed();
                        let rate = pages_processed as f64 / elapsed.as_secs_f64();
                        tracing::info!(
                            "Progress: {} pages processed, {} pending, {} admitted, {:.2} pages/sec",
                            pages_processed,
                            self.frontier.pending(),
                            self.frontier.admitted_count(),
                            rate
                        );
                    }
                }
                Some(Err(e)) => {
                    tracing::error!("Worker task failed: {}", e);
                }
                None => break,
            }
        }

        {
            let mut sink = self.sink.lock().unwrap();
            sink.complete_run(self.run_id)?;
        }

        tracing::info!(
            "Crawl completed: {} pages processed, {} requests admitted, in {:?}",
            pages_processed,
            self.frontier.admitted_count(),
            start_time.elapsed()
        );

        Ok(())
    }
}

/// Processes a single request end-to-end
///
/// Fetch failures and per-page pipeline failures are logged at page
/// granularity and never abort the crawl or other in-flight workers.
async fn process_request(
    request: CrawlRequest,
    client: &Client,
    frontier: &Frontier,
    sink: &Mutex<SqliteSink>,
    config: &Config,
    run_id: i64,
) {
    tracing::debug!("Processing {}", request.url);

    match fetch_page(client, &request.url).await {
        FetchOutcome::Success(fetched) => {
            let url = fetched.url.clone();
            if let Err(e) = handle_page(&fetched, &request, frontier, sink, config, run_id) {
                tracing::warn!("Failed to process {}: {}", url, e);
            }
        }

        FetchOutcome::ContentMismatch { content_type } => {
            tracing::debug!("Skipping non-HTML {} ({})", request.url, content_type);
        }

        FetchOutcome::HttpError { status_code } => {
            tracing::warn!("HTTP {} for {}, abandoning", status_code, request.url);
        }

        FetchOutcome::NetworkError { error } => {
            tracing::warn!("Network error for {}: {}, abandoning", request.url, error);
        }

        FetchOutcome::InvalidUrl { error } => {
            tracing::debug!("Abandoning malformed URL {}: {}", request.url, error);
        }
    }
}

/// Runs the synchronous per-page pipeline: parse, discover links, extract,
/// detect, classify, emit
fn handle_page(
    fetched: &FetchedPage,
    request: &CrawlRequest,
    frontier: &Frontier,
    sink: &Mutex<SqliteSink>,
    config: &Config,
    run_id: i64,
) -> Result<(), ScoutError> {
    let page = PageDoc::parse(&fetched.body, fetched.url.clone());

    let admitted = discover_links(&page, request, frontier);
    tracing::debug!("{} new requests admitted from {}", admitted, page.url());

    let metadata = extract_metadata(&page);
    let pdf_candidates = if config.crawler.detect_pdf_links {
        detect_report_links(&page)
    } else {
        Vec::new()
    };

    let records = classify(&metadata, &pdf_candidates, &page);
    if records.is_empty() {
        tracing::debug!("No report signals on {}", page.url());
        return Ok(());
    }

    tracing::info!("Emitting {} record(s) for {}", records.len(), page.url());
    let mut sink = sink.lock().unwrap();
    for record in &records {
        sink.append(record, run_id)?;
    }

    Ok(())
}

/// Runs the main crawl operation
///
/// This function orchestrates the entire crawl process:
///
/// 1. Initialize the record store and register a run
/// 2. Build the HTTP client
/// 3. Seed the frontier from the configured start URLs
/// 4. Worker loop, per request:
///    a. Fetch the page (redirects followed, retries applied)
///    b. Discover links and submit them for admission
///    c. Extract metadata and detect PDF/report links
///    d. Classify and emit records to the sink
/// 5. Mark the run as completed
///
/// # Example
///
/// ```no_run
/// use disclosure_scout::config::load_config_with_hash;
/// use disclosure_scout::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("config.toml"))?;
/// run_crawl(config, &hash).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, config_hash: &str) -> Result<(), ScoutError> {
    let mut coordinator = Coordinator::new(config, config_hash)?;
    coordinator.run().await
}
