//! Configuration module for Disclosure-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use disclosure_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Request cap: {}", config.crawler.max_requests_per_crawl);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Builds a config with the given seeds and permissive defaults
    pub(crate) fn make_config(start_urls: Vec<String>) -> Config {
        Config {
            crawler: CrawlerConfig {
                start_urls,
                max_requests_per_crawl: 100,
                detect_pdf_links: true,
                follow_internal_only: false,
                max_concurrent_pages_open: 4,
                admit_malformed_urls: true,
            },
            user_agent: UserAgentConfig {
                crawler_name: "TestScout".to_string(),
                crawler_version: "1.0".to_string(),
                contact_url: "https://example.com/about".to_string(),
                contact_email: "admin@example.com".to_string(),
            },
            output: OutputConfig {
                database_path: ":memory:".to_string(),
            },
        }
    }
}
