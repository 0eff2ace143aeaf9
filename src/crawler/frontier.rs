//! Frontier controller - admission control for the crawl frontier
//!
//! This module decides whether a discovered link may join the crawl:
//! - A global admission cap shared by all workers
//! - First-seen-wins URL deduplication
//! - An optional host-scope restriction tied to each request's start host
//!
//! The admission counter is reserved with a compare-exchange so racing
//! workers can never admit past the cap; requests already in flight when the
//! cap is hit are allowed to finish.

use crate::config::CrawlerConfig;
use crate::url::host_of;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use url::Url;

/// A request admitted to the crawl frontier
///
/// The URL stays a string so candidates admitted under the malformed-URL
/// policy survive until fetch time, where they fail and are abandoned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    pub url: String,

    /// Host of the originating seed, propagated along the crawl tree.
    /// Not recomputed from this request's own URL.
    pub start_host: Option<String>,
}

impl CrawlRequest {
    /// Host used for scope checks: the start-host tag, falling back to this
    /// request's own URL host
    pub fn scope_host(&self) -> Option<String> {
        self.start_host.clone().or_else(|| host_of(&self.url))
    }
}

/// Frontier controller shared by all crawl workers
pub struct Frontier {
    max_requests: usize,
    internal_only: bool,
    admit_malformed: bool,
    admitted: AtomicUsize,
    inner: Mutex<Inner>,
}

struct Inner {
    seen: HashSet<String>,
    queue: VecDeque<CrawlRequest>,
}

impl Frontier {
    /// Creates a frontier enforcing the configured limits
    pub fn new(config: &CrawlerConfig) -> Self {
        Self {
            max_requests: config.max_requests_per_crawl as usize,
            internal_only: config.follow_internal_only,
            admit_malformed: config.admit_malformed_urls,
            admitted: AtomicUsize::new(0),
            inner: Mutex::new(Inner {
                seen: HashSet::new(),
                queue: VecDeque::new(),
            }),
        }
    }

    /// Seeds a root request; its start host is the seed's own host
    ///
    /// Seeds count toward the admission cap like any other request.
    pub fn seed(&self, url: &str) -> bool {
        self.enqueue(CrawlRequest {
            url: url.to_string(),
            start_host: host_of(url),
        })
    }

    /// Decides whether a discovered candidate may join the frontier
    ///
    /// Refuses when the admission cap is reached, when host scope is enabled
    /// and the candidate's host differs from the origin's scope host, or when
    /// the URL was already admitted (first-seen wins). On admission the
    /// candidate is enqueued with the origin's start host copied forward.
    ///
    /// A candidate that fails to parse bypasses the scope check when
    /// `admit-malformed-urls` is set (the default, matching the source
    /// system); it is abandoned later at fetch time.
    pub fn admit(&self, candidate: &str, origin: &CrawlRequest) -> bool {
        if self.admitted.load(Ordering::SeqCst) >= self.max_requests {
            return false;
        }

        if self.internal_only && !self.in_scope(candidate, origin) {
            return false;
        }

        self.enqueue(CrawlRequest {
            url: candidate.to_string(),
            start_host: origin.start_host.clone(),
        })
    }

    fn in_scope(&self, candidate: &str, origin: &CrawlRequest) -> bool {
        let candidate_host = match Url::parse(candidate) {
            Ok(url) => url.host_str().map(|h| h.to_lowercase()),
            // Unparseable candidates pass or fail scope by policy
            Err(_) => return self.admit_malformed,
        };

        match (candidate_host, origin.scope_host()) {
            (Some(host), Some(scope)) => host == scope,
            _ => false,
        }
    }

    fn enqueue(&self, request: CrawlRequest) -> bool {
        let mut inner = self.inner.lock().unwrap();

        if inner.seen.contains(&request.url) {
            return false;
        }

        // Reserve an admission slot; refused duplicates above never consume one
        let reserved = self
            .admitted
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < self.max_requests).then_some(n + 1)
            });
        if reserved.is_err() {
            return false;
        }

        inner.seen.insert(request.url.clone());
        inner.queue.push_back(request);
        true
    }

    /// Takes the next pending request, if any
    pub fn next(&self) -> Option<CrawlRequest> {
        self.inner.lock().unwrap().queue.pop_front()
    }

    /// Number of requests ever admitted (including seeds)
    pub fn admitted_count(&self) -> usize {
        self.admitted.load(Ordering::SeqCst)
    }

    /// Number of requests waiting to be fetched
    pub fn pending(&self) -> usize {
        self.inner.lock().unwrap().queue.len()
    }
}
