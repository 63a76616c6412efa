//! Trait definition for pluggable search engine backends.
//!
//! Each search surface (Google, DuckDuckGo) implements [`SearchEngineTrait`]
//! to provide a uniform interface for querying and parsing results.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::{SearchEngine, SearchResult};

/// A pluggable search engine backend.
///
/// Implementors scrape a specific engine's HTML response and extract
/// structured [`SearchResult`] values. Each engine handles its own:
///
/// - request URL and query-parameter construction
/// - HTTP GET with appropriate headers
/// - HTML parsing via CSS selectors, including engine-specific redirect
///   wrappers around result hrefs
/// - diagnostic detection of anti-scraping interstitials
///
/// Errors are returned, not swallowed — the aggregator decides that an
/// engine failure degrades the merged result instead of propagating.
/// All implementations must be `Send + Sync` for concurrent engine queries.
pub trait SearchEngineTrait: Send + Sync {
    /// Perform a web search and return parsed results.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the HTTP request fails, returns a non-2xx
    /// status, or the response cannot be parsed.
    fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> impl std::future::Future<Output = Result<Vec<SearchResult>, SearchError>> + Send;

    /// Returns which [`SearchEngine`] variant this implementation represents.
    fn engine_type(&self) -> SearchEngine;
}
