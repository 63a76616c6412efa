//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] is constructed explicitly and passed into every adapter
//! and fetcher call — there is no process-wide client or agent. The defaults
//! are tuned for the evidence pipeline: five aggregated results, 10 s per
//! engine request, 15 s per page fetch.

use crate::error::SearchError;
use crate::types::SearchEngine;

/// Configuration for evidence gathering.
///
/// Use [`Default::default()`] for the standard pipeline settings, or
/// construct with field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Which engines to query, in registration order. Engines are queried
    /// concurrently but merged results always follow this order.
    pub engines: Vec<SearchEngine>,
    /// Maximum number of aggregated results after deduplication.
    pub max_results: usize,
    /// Per-engine HTTP request timeout in seconds.
    pub search_timeout_secs: u64,
    /// Per-page content fetch timeout in seconds.
    pub fetch_timeout_secs: u64,
    /// Whether to request safe-search filtering from engines that support it.
    pub safe_search: bool,
    /// Accept TLS certificates the default trust store would reject.
    ///
    /// Some scraped surfaces present certificates that fail default
    /// verification at scrape time. Enabling this keeps those pages readable
    /// at the cost of TLS authenticity for the scraping connection only —
    /// a documented risk tradeoff for this crate, not a general
    /// recommendation.
    pub accept_invalid_certs: bool,
    /// How long to cache aggregated results in seconds. 0 disables caching.
    pub cache_ttl_seconds: u64,
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            engines: vec![SearchEngine::Google, SearchEngine::DuckDuckGo],
            max_results: 5,
            search_timeout_secs: 10,
            fetch_timeout_secs: 15,
            safe_search: true,
            accept_invalid_certs: true,
            cache_ttl_seconds: 600,
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_results` must be greater than 0
    /// - `search_timeout_secs` and `fetch_timeout_secs` must be greater than 0
    /// - `engines` must not be empty
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.search_timeout_secs == 0 {
            return Err(SearchError::Config(
                "search_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(SearchError::Config(
                "fetch_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.engines.is_empty() {
            return Err(SearchError::Config(
                "at least one engine must be enabled".into(),
            ));
        }
        Ok(())
    }
}
