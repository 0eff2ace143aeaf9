//! Disclosure-Scout main entry point
//!
//! This is the command-line interface for the Disclosure-Scout focused crawler.

use clap::Parser;
use disclosure_scout::config::load_config_with_hash;
use disclosure_scout::crawler::crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Disclosure-Scout: a focused crawler for corporate sustainability disclosures
///
/// Disclosure-Scout crawls corporate websites from configured seed pages,
/// follows links within the configured scope, and classifies visited pages
/// into structured records about likely ESG/sustainability reports.
#[derive(Parser, Debug)]
#[command(name = "disclosure-scout")]
#[command(version = "0.1.0")]
#[command(about = "A focused crawler for sustainability disclosures", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the record store and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("disclosure_scout=info,warn"),
            1 => EnvFilter::new("disclosure_scout=debug,info"),
            2 => EnvFilter::new("disclosure_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(
    config: &disclosure_scout::config::Config,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Disclosure-Scout Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max requests per crawl: {}",
        config.crawler.max_requests_per_crawl
    );
    println!(
        "  Max concurrent pages: {}",
        config.crawler.max_concurrent_pages_open
    );
    println!("  Detect PDF links: {}", config.crawler.detect_pdf_links);
    println!(
        "  Follow internal only: {}",
        config.crawler.follow_internal_only
    );
    println!(
        "  Admit malformed URLs: {}",
        config.crawler.admit_malformed_urls
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\nStart URLs ({}):", config.crawler.start_urls.len());
    for seed in &config.crawler.start_urls {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling with {} seed URLs",
        config.crawler.start_urls.len()
    );

    Ok(())
}

/// Handles the --stats mode: shows statistics from the record store
fn handle_stats(
    config: &disclosure_scout::config::Config,
) -> Result<(), Box<dyn std::error::Error>> {
    use disclosure_scout::sink::{load_statistics, print_statistics, SqliteSink};
    use std::path::Path;

    println!("Database: {}\n", config.output.database_path);

    // Open the database
    let sink = SqliteSink::new(Path::new(&config.output.database_path))?;

    // Load statistics
    let stats = load_statistics(&sink)?;

    // Print statistics
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: disclosure_scout::config::Config,
    config_hash: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Seeds: {}, request cap: {}, host scope: {}",
        config.crawler.start_urls.len(),
        config.crawler.max_requests_per_crawl,
        config.crawler.follow_internal_only
    );

    // Run the crawler
    match crawl(config, config_hash).await {
        Ok(()) => {
            tracing::info!("Crawl completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
