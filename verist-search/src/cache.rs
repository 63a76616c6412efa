//! In-memory cache for aggregated search results.
//!
//! Caches the final deduplicated, truncated result sequence keyed by the
//! (lowercased query, engine set) pair. Uses [`moka`] for async-friendly
//! caching with TTL and automatic eviction. The cache is owned by the
//! [`crate::aggregate::Aggregator`] that created it — there is no
//! process-wide cache state.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use moka::future::Cache;

use crate::types::{SearchEngine, SearchResult};

/// Maximum number of cached result sets.
const MAX_CACHE_ENTRIES: u64 = 100;

/// Composite cache key: normalised query + engine set hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Lowercased, trimmed query string.
    query: String,
    /// Hash of the sorted engine set, so different engine configs
    /// produce different cache entries.
    engine_hash: u64,
}

impl CacheKey {
    /// Build a deterministic cache key from a query and engine list.
    ///
    /// The query is lowercased and trimmed. The engine list is sorted by
    /// name and hashed so that `[Google, DuckDuckGo]` and
    /// `[DuckDuckGo, Google]` produce the same key.
    pub fn new(query: &str, engines: &[SearchEngine]) -> Self {
        Self {
            query: query.trim().to_lowercase(),
            engine_hash: hash_engines(engines),
        }
    }
}

/// An explicitly constructed result cache with a fixed TTL.
#[derive(Debug, Clone)]
pub struct ResultCache {
    inner: Cache<CacheKey, Vec<SearchResult>>,
}

impl ResultCache {
    /// Create a cache whose entries live for `ttl_seconds`.
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(MAX_CACHE_ENTRIES)
                .time_to_live(Duration::from_secs(ttl_seconds))
                .build(),
        }
    }

    /// Look up cached results, `None` on miss.
    pub async fn get(&self, key: &CacheKey) -> Option<Vec<SearchResult>> {
        self.inner.get(key).await
    }

    /// Insert aggregated results for the given key.
    pub async fn insert(&self, key: CacheKey, results: Vec<SearchResult>) {
        self.inner.insert(key, results).await;
    }
}

/// Compute a deterministic, order-independent hash of an engine set.
fn hash_engines(engines: &[SearchEngine]) -> u64 {
    let mut sorted: Vec<&SearchEngine> = engines.iter().collect();
    sorted.sort_by_key(|e| e.name());
    let mut hasher = DefaultHasher::new();
    for engine in sorted {
        engine.name().hash(&mut hasher);
    }
    hasher.finish()
}
