//! Disclosure-Scout: a focused crawler for corporate sustainability disclosures
//!
//! This crate implements a focused crawler that starts from seed pages, follows
//! links within a configurable host scope, and classifies visited pages into
//! structured records describing likely ESG/sustainability report documents.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod sink;
pub mod url;

use thiserror::Error;

/// Main error type for Disclosure-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Extraction error for {url}: {message}")]
    Extraction { url: String, message: String },

    #[error("Sink error: {0}")]
    Sink(#[from] sink::SinkError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Disclosure-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlRequest, Frontier};
pub use extract::{PageDoc, PageMetadata};
pub use sink::OutputRecord;
