//! # verist-search
//!
//! Scraped web evidence for verist — no API keys, no external search
//! services. This crate queries public search surfaces directly and captures
//! readable page content for downstream fact checking. It compiles into the
//! verist binary as a library dependency.
//!
//! ## Design
//!
//! - Scrapes Google and DuckDuckGo using CSS selectors on HTML responses
//! - Queries engines concurrently; individual engine failures degrade the
//!   merged result instead of propagating (fail-soft aggregation)
//! - Merged ordering is deterministic: engine-registration order with stable
//!   first-occurrence deduplication by canonical URL
//! - Page capture extracts main-content text plus a best-effort
//!   "last updated" timestamp, and never fails
//! - All clients are built from an explicit [`SearchConfig`] passed into
//!   every call — no process-wide agents or singletons
//! - Optional in-memory TTL cache for aggregated results, owned by the
//!   [`Aggregator`] that created it
//!
//! ## Security
//!
//! - No API keys or secrets to leak
//! - No network listeners — this is a library, not a server
//! - Queries are logged only at trace level
//! - TLS verification toward scraped targets is relaxed only when
//!   [`SearchConfig::accept_invalid_certs`] is set (see its documentation
//!   for the tradeoff)

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod content;
pub mod engine;
pub mod engines;
pub mod error;
pub mod http;
pub mod types;
pub mod url_normalize;

pub use aggregate::Aggregator;
pub use config::SearchConfig;
pub use content::{fetch_page_capture, MAX_CONTENT_CHARS};
pub use engine::SearchEngineTrait;
pub use error::{Result, SearchError};
pub use types::{PageCapture, SearchEngine, SearchResult};
pub use url_normalize::normalize_href;
