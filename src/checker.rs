//! The inbound fact-checking API.
//!
//! [`FactChecker`] wires the evidence pipeline to the verdict synthesizer
//! behind a single `check_fact` call. Statements are validated before any
//! network work; evidence-layer failures degrade silently; provider and
//! parse failures surface as typed [`CheckError`]s.

use std::sync::Arc;

use verist_search::SearchConfig;

use crate::error::{CheckError, Result};
use crate::evidence::{EvidenceGatherer, FreshnessPolicy};
use crate::provider::ModelProvider;
use crate::synthesis;
use crate::types::VerdictRecord;

/// Minimum trimmed statement length accepted by [`FactChecker::check_fact`].
pub const MIN_STATEMENT_CHARS: usize = 3;

/// Checks natural-language statements against web evidence.
pub struct FactChecker {
    provider: Arc<dyn ModelProvider>,
    evidence: EvidenceGatherer,
}

impl std::fmt::Debug for FactChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactChecker")
            .field("evidence", &self.evidence)
            .finish_non_exhaustive()
    }
}

impl FactChecker {
    /// Create a checker over the given provider and search configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Config`] if the search configuration is invalid.
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        search: SearchConfig,
        policy: FreshnessPolicy,
    ) -> Result<Self> {
        let evidence = EvidenceGatherer::new(search, policy)?;
        Ok(Self { provider, evidence })
    }

    /// Create a checker with the default search configuration and policy.
    ///
    /// # Errors
    ///
    /// Same as [`FactChecker::new`].
    pub fn with_defaults(provider: Arc<dyn ModelProvider>) -> Result<Self> {
        Self::new(provider, SearchConfig::default(), FreshnessPolicy::default())
    }

    /// Check a statement and return its verdict.
    ///
    /// Statements under [`MIN_STATEMENT_CHARS`] trimmed characters are
    /// rejected locally — no network calls are issued for them.
    ///
    /// # Errors
    ///
    /// - [`CheckError::InvalidStatement`] for too-short input
    /// - [`CheckError::Auth`] / [`CheckError::RateLimited`] /
    ///   [`CheckError::Timeout`] / [`CheckError::Provider`] for provider
    ///   failures
    /// - [`CheckError::ResponseParse`] when the reply defeats every parsing
    ///   strategy
    ///
    /// None of these are retried internally; retry policy belongs to the
    /// caller.
    pub async fn check_fact(&self, statement: &str) -> Result<VerdictRecord> {
        let trimmed = statement.trim();
        if trimmed.chars().count() < MIN_STATEMENT_CHARS {
            return Err(CheckError::InvalidStatement(format!(
                "please provide a statement of at least {MIN_STATEMENT_CHARS} characters"
            )));
        }

        tracing::debug!(chars = trimmed.chars().count(), "checking statement");

        let evidence = self.evidence.gather(trimmed).await;
        tracing::debug!(
            results = evidence.search_results.len(),
            captures = evidence.content_details.len(),
            "evidence gathered"
        );

        synthesis::synthesize(self.provider.as_ref(), trimmed, &evidence).await
    }

    /// Suggest fact-check-worthy topics, optionally themed by `query`.
    ///
    /// # Errors
    ///
    /// Same provider and parse failure modes as [`FactChecker::check_fact`].
    pub async fn suggest_topics(&self, query: Option<&str>) -> Result<Vec<String>> {
        crate::topics::suggest_topics(self.provider.as_ref(), query).await
    }
}
