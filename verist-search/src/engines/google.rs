//! Google search engine — widest coverage, most aggressive bot detection.
//!
//! Scrapes the classic HTML results page. Google frequently serves CAPTCHA
//! or cookie-consent interstitials to automated clients; these are logged as
//! diagnostics while extraction proceeds on whatever organic results are
//! present. Result hrefs sometimes arrive wrapped as `/url?q=<target>&...`,
//! which is unwrapped here before the shared normaliser runs.

use crate::config::SearchConfig;
use crate::engine::SearchEngineTrait;
use crate::error::SearchError;
use crate::http;
use crate::types::{SearchEngine, SearchResult};
use crate::url_normalize::normalize_href;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

/// Google HTML search scraper.
pub struct GoogleEngine;

impl SearchEngineTrait for GoogleEngine {
    async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "Google search");

        let client = http::build_client(config, Duration::from_secs(config.search_timeout_secs))?;

        let num = (config.max_results + 2).to_string();
        let mut params = vec![("q", query), ("hl", "en"), ("num", num.as_str())];
        if config.safe_search {
            params.push(("safe", "active"));
        }

        let response = client
            .get("https://www.google.com/search")
            .query(&params)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("Google request failed", e))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("Google HTTP error: {e}")))?;

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest("Google response read failed", e))?;

        tracing::trace!(bytes = html.len(), "Google response received");

        parse_google_html(&html, config.max_results)
    }

    fn engine_type(&self) -> SearchEngine {
        SearchEngine::Google
    }
}

/// Parse Google HTML response into search results.
///
/// Extracted as a separate function for testability with mock HTML.
/// Entries missing a title or snippet keep empty strings; entries with no
/// resolvable URL are dropped.
pub(crate) fn parse_google_html(
    html: &str,
    max_results: usize,
) -> Result<Vec<SearchResult>, SearchError> {
    if detect_interstitial(html) {
        tracing::warn!("Google anti-scraping interstitial detected; attempting extraction anyway");
    }

    let document = Html::parse_document(html);

    let result_sel = Selector::parse("div.g, div.MjjYud")
        .map_err(|e| SearchError::Parse(format!("invalid result selector: {e:?}")))?;
    let title_sel = Selector::parse("h3")
        .map_err(|e| SearchError::Parse(format!("invalid title selector: {e:?}")))?;
    let link_sel = Selector::parse("a[href]")
        .map_err(|e| SearchError::Parse(format!("invalid link selector: {e:?}")))?;
    let snippet_sel = Selector::parse("div.VwiC3b, .IsZvec, .st")
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

        let url = match href.map(unwrap_result_href).and_then(|h| normalize_href(&h)) {
            Some(u) => u,
            None => continue,
        };

        // Nested containers can yield the same organic hit twice.
        if results.iter().any(|r: &SearchResult| r.url == url) {
            continue;
        }

        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        results.push(SearchResult {
            title,
            url,
            snippet,
            source: SearchEngine::Google,
        });
    }

    tracing::debug!(count = results.len(), "Google results parsed");
    Ok(results)
}

/// Unwrap Google's `/url?q=<target>&sa=...` result redirect.
///
/// Hrefs that are not wrapped pass through unchanged.
fn unwrap_result_href(href: &str) -> String {
    if href.starts_with("/url?") {
        if let Ok(parsed) = Url::parse(&format!("https://www.google.com{href}")) {
            if let Some((_, target)) = parsed.query_pairs().find(|(key, _)| key == "q") {
                return target.into_owned();
            }
        }
    }
    href.to_string()
}

/// Detect Google's CAPTCHA and consent interstitials.
///
/// Diagnostic signal only — the caller still attempts extraction.
fn detect_interstitial(html: &str) -> bool {
    html.contains("detected unusual traffic")
        || html.contains("captcha-form")
        || html.contains("consent.google.com")
}
