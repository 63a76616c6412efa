//! DuckDuckGo search engine — most scraper-friendly surface.
//!
//! Uses the HTML-only version at `https://html.duckduckgo.com/html/`
//! which requires no JavaScript and is tolerant of automated requests.
//! Result hrefs arrive wrapped in DuckDuckGo's `/l/?uddg=` redirect, which
//! the shared URL normaliser unwraps.

use crate::config::SearchConfig;
use crate::engine::SearchEngineTrait;
use crate::error::SearchError;
use crate::http;
use crate::types::{SearchEngine, SearchResult};
use crate::url_normalize::normalize_href;
use scraper::{Html, Selector};
use std::time::Duration;

/// DuckDuckGo HTML search engine scraper.
pub struct DuckDuckGoEngine;

impl SearchEngineTrait for DuckDuckGoEngine {
    async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "DuckDuckGo search");

        let client = http::build_client(config, Duration::from_secs(config.search_timeout_secs))?;

        let mut params = vec![("q", query)];
        if config.safe_search {
            params.push(("kp", "1"));
        }

        let response = client
            .get("https://html.duckduckgo.com/html/")
            .query(&params)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("DuckDuckGo request failed", e))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("DuckDuckGo HTTP error: {e}")))?;

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest("DuckDuckGo response read failed", e))?;

        tracing::trace!(bytes = html.len(), "DuckDuckGo response received");

        parse_duckduckgo_html(&html, config.max_results)
    }

    fn engine_type(&self) -> SearchEngine {
        SearchEngine::DuckDuckGo
    }
}

/// Parse DuckDuckGo HTML response into search results.
///
/// Extracted as a separate function for testability with mock HTML.
/// Entries with a missing title or snippet keep empty strings for those
/// fields; entries whose href cannot be resolved to an absolute URL are
/// dropped.
pub(crate) fn parse_duckduckgo_html(
    html: &str,
    max_results: usize,
) -> Result<Vec<SearchResult>, SearchError> {
    if detect_interstitial(html) {
        tracing::warn!("DuckDuckGo anti-scraping interstitial detected; attempting extraction anyway");
    }

    let document = Html::parse_document(html);

    let result_sel = Selector::parse(".result:not(.result--ad), .web-result:not(.result--ad)")
        .map_err(|e| SearchError::Parse(format!("invalid result selector: {e:?}")))?;
    let title_sel = Selector::parse(".result__title, .result__a")
        .map_err(|e| SearchError::Parse(format!("invalid title selector: {e:?}")))?;
    let link_sel = Selector::parse(".result__title a, a.result__a")
        .map_err(|e| SearchError::Parse(format!("invalid link selector: {e:?}")))?;
    let snippet_sel = Selector::parse(".result__snippet")
        .map_err(|e| SearchError::Parse(format!("invalid snippet selector: {e:?}")))?;

    let mut results = Vec::new();

    for element in document.select(&result_sel) {
        if results.len() >= max_results {
            break;
        }

        let title = element
            .select(&title_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        let href = element
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"));

        // An entry with no resolvable URL is useless as evidence.
        let url = match href.and_then(normalize_href) {
            Some(u) => u,
            None => continue,
        };

        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        results.push(SearchResult {
            title,
            url,
            snippet,
            source: SearchEngine::DuckDuckGo,
        });
    }

    tracing::debug!(count = results.len(), "DuckDuckGo results parsed");
    Ok(results)
}

/// Detect DuckDuckGo's anti-automation challenge page.
///
/// Diagnostic signal only — the caller still attempts extraction.
fn detect_interstitial(html: &str) -> bool {
    html.contains("anomaly-modal") || html.contains("challenge-form")
}
