//! Output-facing types of the fact-checking pipeline.
//!
//! [`VerdictRecord`] serializes in camelCase — the wire shape consumed by
//! presentation layers. Evidence types compose the search crate's
//! [`SearchResult`] with captured page content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use verist_search::SearchResult;

/// The verdict classes a fact check can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    True,
    False,
    PartiallyTrue,
    ContextNotClear,
    Unknown,
}

impl Verdict {
    /// Parse a model-supplied verdict token.
    ///
    /// Coerces to uppercase and normalises separators, so `"partially true"`,
    /// `"PARTIALLY-TRUE"` and `"PARTIALLY_TRUE"` all resolve. Unrecognised
    /// tokens coerce to [`Verdict::Unknown`].
    pub fn parse(raw: &str) -> Self {
        let token: String = raw
            .trim()
            .to_uppercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();
        match token.as_str() {
            "TRUE" => Self::True,
            "FALSE" => Self::False,
            "PARTIALLY_TRUE" => Self::PartiallyTrue,
            "CONTEXT_NOT_CLEAR" => Self::ContextNotClear,
            "UNKNOWN" => Self::Unknown,
            _ => Self::Unknown,
        }
    }

    /// The canonical token for this verdict.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::PartiallyTrue => "PARTIALLY_TRUE",
            Self::ContextNotClear => "CONTEXT_NOT_CLEAR",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cited source in a verdict.
///
/// `index` is assigned sequentially at output time, starting at 1, and is
/// stable only within one response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Sequential output index, starting at 1.
    pub index: usize,
    /// Human-readable source name (may be empty).
    pub name: String,
    /// Source URL.
    pub url: String,
}

/// The canonical result of one fact-check request.
///
/// Constructed once by the synthesizer and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerdictRecord {
    /// The verdict class.
    pub verdict: Verdict,
    /// Explanation text; may contain bracketed citation markers like `[2]`
    /// referring to `sources` by output index.
    pub explanation: String,
    /// Cited sources, ordered by output index.
    pub sources: Vec<Source>,
    /// Model confidence in `[0, 1]`.
    pub confidence: f64,
    /// Whether web evidence was embedded in the prompt — independent of
    /// whether the model actually cited any of it.
    pub used_web_scraping: bool,
}

/// A search result enriched with captured page content.
///
/// `content` is empty and `last_updated` is `None` when the fetch failed;
/// the record is still retained unless a freshness policy discards it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentDetail {
    /// The originating search result.
    #[serde(flatten)]
    pub result: SearchResult,
    /// Extracted page text (≤ 2000 chars, whitespace-collapsed).
    pub content: String,
    /// Best-effort page modification timestamp.
    pub last_updated: Option<DateTime<Utc>>,
}

/// All evidence assembled for one fact-check request.
///
/// `content_details` is a subset (by identity) of `search_results`, bounded
/// to the first fetched results. Lives for one request and is discarded
/// after the synthesizer consumes it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvidenceBundle {
    /// Aggregated, deduplicated search results.
    pub search_results: Vec<SearchResult>,
    /// Captured content for the fetched subset of `search_results`.
    pub content_details: Vec<ContentDetail>,
}

impl EvidenceBundle {
    /// Whether the bundle carries no evidence at all.
    pub fn is_empty(&self) -> bool {
        self.search_results.is_empty() && self.content_details.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verist_search::SearchEngine;

    #[test]
    fn verdict_parse_canonical_tokens() {
        assert_eq!(Verdict::parse("TRUE"), Verdict::True);
        assert_eq!(Verdict::parse("FALSE"), Verdict::False);
        assert_eq!(Verdict::parse("PARTIALLY_TRUE"), Verdict::PartiallyTrue);
        assert_eq!(Verdict::parse("CONTEXT_NOT_CLEAR"), Verdict::ContextNotClear);
        assert_eq!(Verdict::parse("UNKNOWN"), Verdict::Unknown);
    }

    #[test]
    fn verdict_parse_coerces_case_and_separators() {
        assert_eq!(Verdict::parse("true"), Verdict::True);
        assert_eq!(Verdict::parse("Partially True"), Verdict::PartiallyTrue);
        assert_eq!(Verdict::parse("partially-true"), Verdict::PartiallyTrue);
        assert_eq!(Verdict::parse(" context not clear "), Verdict::ContextNotClear);
    }

    #[test]
    fn verdict_parse_unrecognised_is_unknown() {
        assert_eq!(Verdict::parse("MOSTLY TRUE"), Verdict::Unknown);
        assert_eq!(Verdict::parse(""), Verdict::Unknown);
        assert_eq!(Verdict::parse("42"), Verdict::Unknown);
    }

    #[test]
    fn verdict_display_round_trips() {
        for v in [
            Verdict::True,
            Verdict::False,
            Verdict::PartiallyTrue,
            Verdict::ContextNotClear,
            Verdict::Unknown,
        ] {
            assert_eq!(Verdict::parse(v.as_str()), v);
        }
    }

    #[test]
    fn verdict_serializes_as_screaming_snake() {
        let json = serde_json::to_string(&Verdict::PartiallyTrue).expect("serialize");
        assert_eq!(json, "\"PARTIALLY_TRUE\"");
    }

    #[test]
    fn record_serializes_camel_case() {
        let record = VerdictRecord {
            verdict: Verdict::True,
            explanation: "Confirmed [1].".into(),
            sources: vec![Source {
                index: 1,
                name: "X".into(),
                url: "https://x".into(),
            }],
            confidence: 0.9,
            used_web_scraping: true,
        };
        let json = serde_json::to_string(&record).expect("serialize");
        assert!(json.contains("\"usedWebScraping\":true"));
        assert!(json.contains("\"verdict\":\"TRUE\""));
    }

    #[test]
    fn empty_bundle_is_empty() {
        assert!(EvidenceBundle::default().is_empty());
    }

    #[test]
    fn bundle_with_results_not_empty() {
        let bundle = EvidenceBundle {
            search_results: vec![SearchResult {
                title: "t".into(),
                url: "https://a".into(),
                snippet: "s".into(),
                source: SearchEngine::DuckDuckGo,
            }],
            content_details: vec![],
        };
        assert!(!bundle.is_empty());
    }

    #[test]
    fn content_detail_flattens_result_fields() {
        let detail = ContentDetail {
            result: SearchResult {
                title: "Title".into(),
                url: "https://a".into(),
                snippet: "snip".into(),
                source: SearchEngine::Google,
            },
            content: "body".into(),
            last_updated: None,
        };
        let json = serde_json::to_value(&detail).expect("serialize");
        assert_eq!(json["title"], "Title");
        assert_eq!(json["content"], "body");
    }
}
