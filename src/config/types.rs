use serde::Deserialize;

/// Main configuration structure for Disclosure-Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Seed URLs; each seeds one root request tagged with its own host
    #[serde(rename = "start-urls")]
    pub start_urls: Vec<String>,

    /// Global cap on the number of requests ever admitted to the frontier
    #[serde(rename = "max-requests-per-crawl")]
    pub max_requests_per_crawl: u32,

    /// Whether the PDF/report-link detector runs at all
    #[serde(rename = "detect-pdf-links", default = "default_true")]
    pub detect_pdf_links: bool,

    /// Restrict followed links to the start host of the originating seed
    #[serde(rename = "follow-internal-only", default)]
    pub follow_internal_only: bool,

    /// Maximum number of pages processed concurrently
    #[serde(rename = "max-concurrent-pages-open", default = "default_concurrency")]
    pub max_concurrent_pages_open: u32,

    /// Whether candidates that fail to parse pass the host-scope filter.
    /// Defaults to true, matching the source system's observed behavior.
    #[serde(rename = "admit-malformed-urls", default = "default_true")]
    pub admit_malformed_urls: bool,
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> u32 {
    8
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file holding emitted records
    #[serde(rename = "database-path")]
    pub database_path: String,
}
