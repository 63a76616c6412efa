//! # verist
//!
//! Evidence-backed fact checking for natural-language statements.
//!
//! Given a statement, verist concurrently scrapes public search surfaces,
//! deduplicates and caps the results, captures readable content (with
//! freshness metadata) from the top pages, embeds that evidence into a
//! prompt for a generative model, and parses the reply through a layered
//! fallback chain into a canonical [`VerdictRecord`] with re-indexed
//! citations.
//!
//! ## Design
//!
//! - The evidence layer never fails: engine and page-fetch failures degrade
//!   to less (or no) evidence, and the synthesizer falls back to a
//!   general-knowledge prompt when the bundle is empty
//! - Provider failures (auth, rate limit, timeout) and reply-parse
//!   exhaustion surface as typed [`CheckError`]s with stable codes — nothing
//!   is retried internally and no verdict is ever fabricated
//! - The model is a black box behind [`provider::ModelProvider`]; the
//!   bundled [`provider::GeminiProvider`] speaks the Gemini REST API
//! - All configuration is explicit and constructor-injected; there is no
//!   process-wide mutable state
//!
//! ## Example
//!
//! ```no_run
//! # async fn example() -> verist::Result<()> {
//! use std::sync::Arc;
//! use verist::provider::{GeminiConfig, GeminiProvider};
//! use verist::FactChecker;
//!
//! let provider = GeminiProvider::new(GeminiConfig::new("api-key"))
//!     .map_err(verist::CheckError::from)?;
//! let checker = FactChecker::with_defaults(Arc::new(provider))?;
//! let record = checker.check_fact("The Great Wall is visible from space").await?;
//! println!("{}: {}", record.verdict, record.explanation);
//! # Ok(())
//! # }
//! ```

pub mod checker;
pub mod error;
pub mod evidence;
pub mod provider;
pub mod synthesis;
pub mod topics;
pub mod types;

pub use checker::{FactChecker, MIN_STATEMENT_CHARS};
pub use error::{CheckError, Result};
pub use evidence::{EvidenceGatherer, FreshnessPolicy, CONTENT_FETCH_LIMIT};
pub use synthesis::synthesize;
pub use topics::suggest_topics;
pub use types::{ContentDetail, EvidenceBundle, Source, Verdict, VerdictRecord};

// Re-export the search layer so callers can tune it without a direct
// dependency on the sub-crate.
pub use verist_search::{SearchConfig, SearchEngine, SearchResult};
