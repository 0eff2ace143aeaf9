//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests with redirect following
//! - Retry logic for transient failures
//! - Error classification per fetch outcome

use crate::config::UserAgentConfig;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum attempts for transient failures (5xx, timeout)
const MAX_ATTEMPTS: u32 = 3;

/// Delay between retry attempts
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// A successfully fetched page, before parsing
#[derive(Debug)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: Url,

    /// Raw HTML body
    pub body: String,
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched an HTML page
    Success(FetchedPage),

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Non-success HTTP status after retries were exhausted
    HttpError { status_code: u16 },

    /// Network error (connection refused, timeout, etc.)
    NetworkError { error: String },

    /// The request URL does not parse; it was admitted under the
    /// malformed-URL policy and is abandoned here
    InvalidUrl { error: String },
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use disclosure_scout::config::UserAgentConfig;
/// use disclosure_scout::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "DisclosureScout".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// Follows redirects (the returned page carries the final URL), retries 5xx
/// responses and timeouts up to 3 attempts with a short delay, and only
/// yields pages whose Content-Type is HTML.
pub async fn fetch_page(client: &Client, url: &str) -> FetchOutcome {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            return FetchOutcome::InvalidUrl {
                error: e.to_string(),
            }
        }
    };

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return FetchOutcome::InvalidUrl {
            error: format!("unsupported scheme: {}", parsed.scheme()),
        };
    }

    let mut attempt = 0;
    loop {
        attempt += 1;

        match client.get(parsed.clone()).send().await {
            Ok(response) => {
                let status = response.status();

                if status.is_server_error() && attempt < MAX_ATTEMPTS {
                    tracing::debug!(
                        "HTTP {} for {}, retrying (attempt {}/{})",
                        status.as_u16(),
                        url,
                        attempt,
                        MAX_ATTEMPTS
                    );
                    tokio::time::sleep(RETRY_DELAY).await;
                    continue;
                }

                if !status.is_success() {
                    return FetchOutcome::HttpError {
                        status_code: status.as_u16(),
                    };
                }

                let final_url = response.url().clone();

                let content_type = response
                    .headers()
                    .get("content-type")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string();

                if !content_type.contains("text/html") {
                    return FetchOutcome::ContentMismatch { content_type };
                }

                return match response.text().await {
                    Ok(body) => FetchOutcome::Success(FetchedPage {
                        url: final_url,
                        body,
                    }),
                    Err(e) => FetchOutcome::NetworkError {
                        error: e.to_string(),
                    },
                };
            }

            Err(e) if e.is_timeout() && attempt < MAX_ATTEMPTS => {
                tracing::debug!(
                    "Timeout for {}, retrying (attempt {}/{})",
                    url,
                    attempt,
                    MAX_ATTEMPTS
                );
                tokio::time::sleep(RETRY_DELAY).await;
            }

            Err(e) => {
                let error = if e.is_timeout() {
                    "Request timeout".to_string()
                } else if e.is_connect() {
                    "Connection refused".to_string()
                } else {
                    e.to_string()
                };
                return FetchOutcome::NetworkError { error };
            }
        }
    }
}
