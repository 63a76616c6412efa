//! Evidence pipeline orchestration: aggregate searches, then capture pages.
//!
//! Sequences the search aggregation and content fetching stages for one
//! fact-check request. Degrades to an empty [`EvidenceBundle`] on total
//! failure — nothing in this module raises.

use futures::future::join_all;
use verist_search::{fetch_page_capture, Aggregator, SearchConfig};

use crate::error::CheckError;
use crate::types::{ContentDetail, EvidenceBundle};

/// How many aggregated results have their pages fetched.
pub const CONTENT_FETCH_LIMIT: usize = 3;

/// What to do with captured content whose modification date is unknown.
///
/// The observed production behaviour discards undated evidence and sorts
/// the rest most-recent-first, which silently drops successfully fetched
/// pages; [`FreshnessPolicy::KeepAll`] restores the earlier keep-everything
/// behaviour. The policy is an explicit constructor parameter rather than a
/// fixed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FreshnessPolicy {
    /// Keep only details with a resolved `last_updated`, sorted most
    /// recent first.
    #[default]
    RequireDated,
    /// Keep every fetched detail in aggregation order, dated or not.
    KeepAll,
}

/// Gathers web evidence for fact-check statements.
pub struct EvidenceGatherer {
    aggregator: Aggregator,
    policy: FreshnessPolicy,
}

impl std::fmt::Debug for EvidenceGatherer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvidenceGatherer")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl EvidenceGatherer {
    /// Create a gatherer from a search configuration and freshness policy.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Config`] if the search configuration is invalid.
    pub fn new(config: SearchConfig, policy: FreshnessPolicy) -> Result<Self, CheckError> {
        let aggregator =
            Aggregator::new(config).map_err(|e| CheckError::Config(e.to_string()))?;
        Ok(Self { aggregator, policy })
    }

    /// The freshness policy in effect.
    pub fn policy(&self) -> FreshnessPolicy {
        self.policy
    }

    /// Gather search results and page content for `statement`.
    ///
    /// Never fails: an empty bundle is returned when every engine fails, and
    /// individual page-fetch failures are absorbed by the capture layer.
    pub async fn gather(&self, statement: &str) -> EvidenceBundle {
        let search_results = self.aggregator.search(statement).await;

        if search_results.is_empty() {
            tracing::debug!("no search results; returning empty evidence bundle");
            return EvidenceBundle::default();
        }

        tracing::debug!(count = search_results.len(), "search results aggregated");

        let config = self.aggregator.config();
        let targets = &search_results[..search_results.len().min(CONTENT_FETCH_LIMIT)];
        let captures = join_all(
            targets
                .iter()
                .map(|result| fetch_page_capture(config, &result.url)),
        )
        .await;

        let mut content_details: Vec<ContentDetail> = targets
            .iter()
            .cloned()
            .zip(captures)
            .map(|(result, capture)| ContentDetail {
                result,
                content: capture.content,
                last_updated: capture.last_updated,
            })
            .collect();

        match self.policy {
            FreshnessPolicy::KeepAll => {}
            FreshnessPolicy::RequireDated => {
                let before = content_details.len();
                content_details.retain(|detail| detail.last_updated.is_some());
                if content_details.len() < before {
                    tracing::debug!(
                        dropped = before - content_details.len(),
                        "undated evidence discarded by freshness policy"
                    );
                }
                content_details.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
            }
        }

        EvidenceBundle {
            search_results,
            content_details,
        }
    }
}
