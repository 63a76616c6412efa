//! Core types for scraped search results and captured page content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Search surfaces that verist-search can scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchEngine {
    /// Google — best coverage but aggressive bot detection.
    Google,
    /// DuckDuckGo HTML endpoint — most scraper-friendly.
    DuckDuckGo,
}

impl SearchEngine {
    /// Returns the human-readable name of this engine.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::DuckDuckGo => "DuckDuckGo",
        }
    }

    /// Returns all available engine variants in default registration order.
    pub fn all() -> &'static [SearchEngine] {
        &[Self::Google, Self::DuckDuckGo]
    }
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single search result scraped from an engine's results page.
///
/// The `url` is canonical and absolute — the adapter runs every raw href
/// through [`crate::url_normalize::normalize_href`] before constructing a
/// result, and entries whose href cannot be resolved are dropped. Within one
/// aggregation run the canonical URL uniquely identifies a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result page (may be empty if the markup omitted it).
    pub title: String,
    /// Canonical absolute URL of the result.
    pub url: String,
    /// Text snippet from the results page (may be empty).
    pub snippet: String,
    /// Which search engine produced this result.
    pub source: SearchEngine,
}

/// Readable content captured from a fetched web page.
///
/// `content` is whitespace-collapsed and capped at
/// [`crate::content::MAX_CONTENT_CHARS`] characters. Both fields take their
/// empty/absent values when the fetch or extraction fails — a failed capture
/// is represented, not raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCapture {
    /// Extracted main-content text, empty on fetch failure.
    pub content: String,
    /// Best-effort "last updated" timestamp, `None` when the page carries no
    /// parseable modification date (or the fetch failed).
    pub last_updated: Option<DateTime<Utc>>,
}

impl PageCapture {
    /// The capture recorded for a failed fetch.
    pub fn empty() -> Self {
        Self::default()
    }
}
