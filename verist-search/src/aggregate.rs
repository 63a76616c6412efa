//! Fail-soft concurrent aggregation across search engines.
//!
//! Queries every configured engine concurrently, absorbs individual engine
//! failures, concatenates successful results in engine-registration order,
//! deduplicates by canonical URL keeping the first occurrence, and truncates
//! to the configured maximum. Output ordering is deterministic even though
//! execution is concurrent: concatenation follows registration order, never
//! completion time.

use std::collections::HashSet;

use crate::cache::{CacheKey, ResultCache};
use crate::config::SearchConfig;
use crate::engine::SearchEngineTrait;
use crate::engines::{DuckDuckGoEngine, GoogleEngine};
use crate::error::{Result, SearchError};
use crate::types::{SearchEngine, SearchResult};

/// Concurrent multi-engine search aggregator.
///
/// Holds a validated [`SearchConfig`] and, when caching is enabled, an
/// explicitly constructed [`ResultCache`]. One aggregator is typically
/// created per pipeline and reused across requests.
#[derive(Debug)]
pub struct Aggregator {
    config: SearchConfig,
    cache: Option<ResultCache>,
}

impl Aggregator {
    /// Create an aggregator from the given configuration.
    ///
    /// A result cache is built here when `config.cache_ttl_seconds > 0`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let cache = (config.cache_ttl_seconds > 0)
            .then(|| ResultCache::new(config.cache_ttl_seconds));
        Ok(Self { config, cache })
    }

    /// The configuration this aggregator was built from.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search all configured engines concurrently and merge their results.
    ///
    /// Engine failures are logged and absorbed — the merged sequence simply
    /// lacks that engine's segment. If every engine fails the result is an
    /// empty vector, never an error.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        let key = CacheKey::new(query, &self.config.engines);
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key).await {
                tracing::debug!(count = hit.len(), "aggregated results served from cache");
                return hit;
            }
        }

        // Fan out to all engines concurrently; every branch's outcome is
        // captured, none can abort the others.
        let futures: Vec<_> = self
            .config
            .engines
            .iter()
            .map(|&engine| {
                let config = &self.config;
                async move { (engine, query_engine(engine, query, config).await) }
            })
            .collect();

        let outcomes = futures::future::join_all(futures).await;

        // Concatenate in registration order, preserving per-engine order.
        let mut merged: Vec<SearchResult> = Vec::new();
        for (engine, outcome) in outcomes {
            match outcome {
                Ok(results) => {
                    tracing::debug!(%engine, count = results.len(), "engine returned results");
                    merged.extend(results);
                }
                Err(err) => {
                    tracing::warn!(%engine, error = %err, "engine query failed");
                }
            }
        }

        let mut results = dedup_stable(merged);
        results.truncate(self.config.max_results);

        if let Some(cache) = &self.cache {
            cache.insert(key, results.clone()).await;
        }

        results
    }
}

/// Query a single engine, dispatching to the concrete implementation.
async fn query_engine(
    engine: SearchEngine,
    query: &str,
    config: &SearchConfig,
) -> std::result::Result<Vec<SearchResult>, SearchError> {
    match engine {
        SearchEngine::Google => GoogleEngine.search(query, config).await,
        SearchEngine::DuckDuckGo => DuckDuckGoEngine.search(query, config).await,
    }
}

/// Stable first-occurrence deduplication by canonical URL.
///
/// Entries with an empty URL are always dropped; for each URL only the
/// first-seen entry (and its fields) survives.
pub(crate) fn dedup_stable(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen: HashSet<String> = HashSet::new();
    results
        .into_iter()
        .filter(|r| !r.url.is_empty() && seen.insert(r.url.clone()))
        .collect()
}
