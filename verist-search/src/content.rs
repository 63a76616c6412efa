//! Page content capture — readable text plus freshness metadata.
//!
//! Fetches a result page, strips boilerplate markup, extracts the main
//! content area (capped at [`MAX_CONTENT_CHARS`]), and records a best-effort
//! "last updated" timestamp. The fetch never fails: any error degrades to an
//! empty [`PageCapture`] with a warn log.

use std::sync::LazyLock;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use regex::Regex;
use scraper::{Html, Selector};

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::http;
use crate::types::PageCapture;
use crate::url_normalize::normalize_href;

/// Maximum characters of extracted content returned to the caller.
pub const MAX_CONTENT_CHARS: usize = 2000;

/// A main-content container must exceed this many characters of collapsed
/// text to be used; otherwise extraction falls back to the full body.
const MIN_MAIN_CONTENT_CHARS: usize = 100;

/// Elements removed before main-content extraction.
const BOILERPLATE_TAGS: &[&str] = &["script", "style", "nav", "footer", "header", "aside"];

/// Main-content containers, checked in priority order.
const CONTENT_SELECTORS: &[&str] = &["main", "article", ".content", "#content", ".main", "#main"];

/// Structured metadata fields carrying a modification date, in priority order.
const META_DATE_SELECTORS: &[&str] = &[
    "meta[property=\"article:modified_time\"]",
    "meta[property=\"og:updated_time\"]",
    "meta[itemprop=\"dateModified\"]",
    "meta[name=\"last-modified\"]",
];

/// Textual labels that commonly precede an update date.
const UPDATED_LABELS: &[&str] = &[
    "last updated",
    "updated on",
    "updated:",
    "last modified",
    "modified on",
    "modified:",
];

/// ISO (`YYYY-MM-DD`) or slash-form (`MM/DD/YYYY`) date occurrences, in
/// text order.
static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b|\b(\d{1,2}/\d{1,2}/\d{4})\b")
        .expect("invalid date pattern")
});

/// Fetch a page and capture its readable content and freshness metadata.
///
/// Never fails: network errors, non-2xx responses, unresolvable URLs, and
/// extraction failures all degrade to [`PageCapture::empty`] with a warn log.
pub async fn fetch_page_capture(config: &SearchConfig, raw_url: &str) -> PageCapture {
    match try_fetch(config, raw_url).await {
        Ok(capture) => capture,
        Err(err) => {
            tracing::warn!(url = raw_url, error = %err, "page capture failed");
            PageCapture::empty()
        }
    }
}

async fn try_fetch(config: &SearchConfig, raw_url: &str) -> Result<PageCapture> {
    let url = normalize_href(raw_url)
        .ok_or_else(|| SearchError::Parse("unresolvable page URL".into()))?;

    tracing::trace!(%url, "fetching page content");

    let client = http::build_client(config, Duration::from_secs(config.fetch_timeout_secs))?;

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| SearchError::from_reqwest("page request failed", e))?
        .error_for_status()
        .map_err(|e| SearchError::Http(format!("page HTTP error: {e}")))?;

    let html = response
        .text()
        .await
        .map_err(|e| SearchError::from_reqwest("page read failed", e))?;

    Ok(extract_capture(&html))
}

/// Extract content and freshness metadata from raw HTML.
///
/// Exposed for testability with fixture HTML.
pub fn extract_capture(html: &str) -> PageCapture {
    // Dates are scanned with scripts/styles removed but chrome kept —
    // "last updated" labels usually live in footers.
    let date_html = strip_tags(html, &["script", "style"]);
    let date_document = Html::parse_document(&date_html);
    let last_updated = extract_last_updated(&date_document);

    let content_html = strip_tags(html, BOILERPLATE_TAGS);
    let content_document = Html::parse_document(&content_html);
    let content = truncate_chars(&extract_main_content(&content_document), MAX_CONTENT_CHARS);

    PageCapture {
        content,
        last_updated,
    }
}

/// Best-effort extraction of the page's last-modification timestamp.
///
/// Checks, in priority order: structured metadata fields, a machine-readable
/// `<time datetime>` element, textual "updated/modified" labels, and finally
/// any ISO or slash-form date in the visible text. The first candidate that
/// parses to a valid date wins; otherwise `None`.
fn extract_last_updated(document: &Html) -> Option<DateTime<Utc>> {
    for selector_str in META_DATE_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(parsed) = document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .and_then(parse_date_str)
        {
            return Some(parsed);
        }
    }

    if let Ok(selector) = Selector::parse("time[datetime]") {
        if let Some(parsed) = document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("datetime"))
            .and_then(parse_date_str)
        {
            return Some(parsed);
        }
    }

    let body_text = visible_text(document);
    let lowered = body_text.to_lowercase();
    for label in UPDATED_LABELS {
        if let Some(pos) = lowered.find(label) {
            let window_start = pos + label.len();
            let window_end = (window_start + 64).min(body_text.len());
            if let Some(window) = slice_on_boundaries(&body_text, window_start, window_end) {
                if let Some(parsed) = find_date_in(window) {
                    return Some(parsed);
                }
            }
        }
    }

    find_date_in(&body_text)
}

/// First ISO or slash-form date in `text` that parses to a valid date.
fn find_date_in(text: &str) -> Option<DateTime<Utc>> {
    DATE_PATTERN
        .find_iter(text)
        .find_map(|m| parse_date_str(m.as_str()))
}

/// Parse a date string in any of the accepted shapes into UTC.
fn parse_date_str(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%m/%d/%Y"))
        .ok()?;
    date.and_hms_opt(0, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Extract text from the main content area of the document.
///
/// Tries content containers in priority order; the first whose
/// collapsed-whitespace text exceeds [`MIN_MAIN_CONTENT_CHARS`] wins,
/// otherwise the full body text is used.
fn extract_main_content(document: &Html) -> String {
    for selector_str in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        for element in document.select(&selector) {
            let text = collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "));
            if text.chars().count() > MIN_MAIN_CONTENT_CHARS {
                return text;
            }
        }
    }

    visible_text(document)
}

/// Collapsed text of the document body (or the whole document if no body).
fn visible_text(document: &Html) -> String {
    let Ok(selector) = Selector::parse("body") else {
        return String::new();
    };
    match document.select(&selector).next() {
        Some(body) => collapse_whitespace(&body.text().collect::<Vec<_>>().join(" ")),
        None => collapse_whitespace(&document.root_element().text().collect::<Vec<_>>().join(" ")),
    }
}

/// Collapse all whitespace runs to single spaces and trim.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max` characters, respecting char boundaries.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Clamp a byte range to char boundaries and slice, `None` if degenerate.
fn slice_on_boundaries(text: &str, start: usize, end: usize) -> Option<&str> {
    let mut start = start.min(text.len());
    while start < text.len() && !text.is_char_boundary(start) {
        start += 1;
    }
    let mut end = end.min(text.len());
    while end > start && !text.is_char_boundary(end) {
        end -= 1;
    }
    (end > start).then(|| &text[start..end])
}

/// Remove all instances of the given HTML tags and their content.
fn strip_tags(html: &str, tags: &[&str]) -> String {
    let mut result = html.to_owned();
    for tag in tags {
        result = strip_tag(&result, tag);
    }
    result
}

/// Remove all instances of a specific HTML tag and its content.
fn strip_tag(html: &str, tag: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let lower = html.to_lowercase();
    let open_tag = format!("<{tag}");
    let close_tag = format!("</{tag}>");

    let mut pos = 0;
    loop {
        // Find the next opening tag (case-insensitive).
        let start = match lower[pos..].find(&open_tag) {
            Some(offset) => pos + offset,
            None => {
                result.push_str(&html[pos..]);
                break;
            }
        };

        // Verify this is actually the target tag (not e.g. <header> for <head>).
        let after_tag = start + open_tag.len();
        if after_tag < lower.len() {
            let next_byte = lower.as_bytes()[after_tag];
            if next_byte != b' '
                && next_byte != b'>'
                && next_byte != b'/'
                && next_byte != b'\n'
                && next_byte != b'\r'
                && next_byte != b'\t'
            {
                result.push_str(&html[pos..after_tag]);
                pos = after_tag;
                continue;
            }
        }

        // Add everything before this tag.
        result.push_str(&html[pos..start]);

        // Find the matching closing tag.
        let end = match lower[start..].find(&close_tag) {
            Some(offset) => start + offset + close_tag.len(),
            None => {
                // No closing tag — skip to end of the opening tag.
                match lower[start..].find('>') {
                    Some(offset) => start + offset + 1,
                    None => html.len(),
                }
            }
        };

        pos = end;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).single().expect("valid date")
    }

    // ── Date extraction ─────────────────────────────────────────────────

    #[test]
    fn meta_modified_time_wins() {
        let html = r#"<html><head>
            <meta property="article:modified_time" content="2024-03-05T12:30:00+00:00">
        </head><body><p>Updated: 2020-01-01</p></body></html>"#;
        let capture = extract_capture(html);
        assert_eq!(
            capture.last_updated,
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 12, 30, 0).unwrap())
        );
    }

    #[test]
    fn og_updated_time_used_when_no_article_meta() {
        let html = r#"<html><head>
            <meta property="og:updated_time" content="2023-11-20">
        </head><body>text</body></html>"#;
        let capture = extract_capture(html);
        assert_eq!(capture.last_updated, Some(ymd(2023, 11, 20)));
    }

    #[test]
    fn time_element_used_when_no_meta() {
        let html = r#"<html><body>
            <time datetime="2022-07-14">July 14th</time>
        </body></html>"#;
        let capture = extract_capture(html);
        assert_eq!(capture.last_updated, Some(ymd(2022, 7, 14)));
    }

    #[test]
    fn updated_label_scanned_for_date() {
        let html = r#"<html><body>
            <p>Some article text.</p>
            <p>Last updated: 2021-09-30 by the editorial team.</p>
        </body></html>"#;
        let capture = extract_capture(html);
        assert_eq!(capture.last_updated, Some(ymd(2021, 9, 30)));
    }

    #[test]
    fn label_in_footer_still_found() {
        let html = r#"<html><body>
            <main><p>Body text without any dates in it at all.</p></main>
            <footer>Modified: 03/15/2023</footer>
        </body></html>"#;
        let capture = extract_capture(html);
        assert_eq!(capture.last_updated, Some(ymd(2023, 3, 15)));
    }

    #[test]
    fn body_scan_finds_iso_date() {
        let html = "<html><body><p>Published 2020-12-25 during the holidays.</p></body></html>";
        let capture = extract_capture(html);
        assert_eq!(capture.last_updated, Some(ymd(2020, 12, 25)));
    }

    #[test]
    fn body_scan_finds_slash_date() {
        let html = "<html><body><p>As reported on 6/4/2019 by the press.</p></body></html>";
        let capture = extract_capture(html);
        assert_eq!(capture.last_updated, Some(ymd(2019, 6, 4)));
    }

    #[test]
    fn invalid_date_skipped_for_next_match() {
        let html = "<html><body><p>Codes 2024-13-45 and then 2024-02-29 appear.</p></body></html>";
        let capture = extract_capture(html);
        assert_eq!(capture.last_updated, Some(ymd(2024, 2, 29)));
    }

    #[test]
    fn no_date_yields_none() {
        let html = "<html><body><p>Nothing dated in here whatsoever.</p></body></html>";
        let capture = extract_capture(html);
        assert!(capture.last_updated.is_none());
    }

    #[test]
    fn unparseable_meta_falls_through_to_body() {
        let html = r#"<html><head>
            <meta property="article:modified_time" content="not a date">
        </head><body><p>Updated on 2018-01-02.</p></body></html>"#;
        let capture = extract_capture(html);
        assert_eq!(capture.last_updated, Some(ymd(2018, 1, 2)));
    }

    #[test]
    fn script_dates_not_scanned() {
        let html = r#"<html><body>
            <script>var build = "2001-01-01";</script>
            <p>No visible dates.</p>
        </body></html>"#;
        let capture = extract_capture(html);
        assert!(capture.last_updated.is_none());
    }

    #[test]
    fn parse_date_str_rfc3339() {
        let parsed = parse_date_str("2024-05-01T08:00:00Z").expect("parses");
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn parse_date_str_rejects_garbage() {
        assert!(parse_date_str("yesterday").is_none());
        assert!(parse_date_str("").is_none());
        assert!(parse_date_str("2024-99-99").is_none());
    }

    // ── Content extraction ──────────────────────────────────────────────

    fn long_text(label: &str) -> String {
        format!("{label} {}", "lorem ipsum dolor sit amet ".repeat(8))
    }

    #[test]
    fn main_container_preferred_over_body() {
        let html = format!(
            "<html><body><div>outer chrome</div><main>{}</main></body></html>",
            long_text("MAIN CONTENT")
        );
        let capture = extract_capture(&html);
        assert!(capture.content.starts_with("MAIN CONTENT"));
        assert!(!capture.content.contains("outer chrome"));
    }

    #[test]
    fn article_used_when_no_main() {
        let html = format!(
            "<html><body><article>{}</article></body></html>",
            long_text("ARTICLE CONTENT")
        );
        let capture = extract_capture(&html);
        assert!(capture.content.starts_with("ARTICLE CONTENT"));
    }

    #[test]
    fn content_class_container_recognised() {
        let html = format!(
            r#"<html><body><div class="content">{}</div></body></html>"#,
            long_text("CLASSED CONTENT")
        );
        let capture = extract_capture(&html);
        assert!(capture.content.starts_with("CLASSED CONTENT"));
    }

    #[test]
    fn short_main_falls_back_to_body() {
        let html = format!(
            "<html><body><main>tiny</main><p>{}</p></body></html>",
            long_text("BODY FALLBACK")
        );
        let capture = extract_capture(&html);
        assert!(capture.content.contains("tiny"));
        assert!(capture.content.contains("BODY FALLBACK"));
    }

    #[test]
    fn boilerplate_stripped_from_content() {
        let html = format!(
            r#"<html><body>
            <nav>Navigation links</nav>
            <header>Site header</header>
            <main>{}</main>
            <aside>Sidebar ads</aside>
            <footer>Footer legal</footer>
            <script>alert('x');</script>
            <style>.a {{ color: red; }}</style>
            </body></html>"#,
            long_text("REAL TEXT")
        );
        let capture = extract_capture(&html);
        assert!(capture.content.contains("REAL TEXT"));
        for noise in ["Navigation links", "Site header", "Sidebar ads", "Footer legal", "alert", "color: red"] {
            assert!(!capture.content.contains(noise), "leaked: {noise}");
        }
    }

    #[test]
    fn whitespace_collapsed() {
        let html = format!(
            "<html><body><main>{}   spaced\n\n\nout</main></body></html>",
            long_text("START")
        );
        let capture = extract_capture(&html);
        assert!(!capture.content.contains("  "));
        assert!(!capture.content.contains('\n'));
    }

    #[test]
    fn content_truncated_to_limit() {
        let body = "word ".repeat(2000);
        let html = format!("<html><body><main>{body}</main></body></html>");
        let capture = extract_capture(&html);
        assert!(capture.content.chars().count() <= MAX_CONTENT_CHARS);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let body = "é".repeat(MAX_CONTENT_CHARS + 500);
        let html = format!("<html><body><main>{body}</main></body></html>");
        let capture = extract_capture(&html);
        assert_eq!(capture.content.chars().count(), MAX_CONTENT_CHARS);
    }

    #[test]
    fn empty_html_yields_empty_capture() {
        let capture = extract_capture("");
        assert!(capture.content.is_empty());
        assert!(capture.last_updated.is_none());
    }

    #[test]
    fn header_tag_not_confused_with_head() {
        let html = format!(
            "<html><head><title>Kept Title</title></head><body><main>{}</main></body></html>",
            long_text("CONTENT")
        );
        // If <head> were stripped by the <header> rule the parse would break.
        let capture = extract_capture(&html);
        assert!(capture.content.contains("CONTENT"));
    }

    #[test]
    fn strip_tag_handles_unclosed_tag() {
        // An unclosed tag consumes only its opening tag; trailing text stays.
        let stripped = strip_tag("<p>before</p><script>never closed", "script");
        assert_eq!(stripped, "<p>before</p>never closed");
    }

    #[test]
    fn truncate_chars_short_text_untouched() {
        assert_eq!(truncate_chars("short", 2000), "short");
    }

    // ── Fetch (mock server) ─────────────────────────────────────────────

    #[tokio::test]
    async fn fetch_page_capture_from_mock_server() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        let page = format!(
            r#"<html><head><meta property="article:modified_time" content="2024-01-15"></head>
            <body><main>{}</main></body></html>"#,
            long_text("SERVED")
        );
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page))
            .mount(&server)
            .await;

        let config = SearchConfig {
            accept_invalid_certs: false,
            ..Default::default()
        };
        let capture = fetch_page_capture(&config, &server.uri()).await;
        assert!(capture.content.starts_with("SERVED"));
        assert_eq!(capture.last_updated, Some(ymd(2024, 1, 15)));
    }

    #[tokio::test]
    async fn fetch_failure_yields_empty_capture() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let config = SearchConfig::default();
        let capture = fetch_page_capture(&config, &server.uri()).await;
        assert_eq!(capture, PageCapture::empty());
    }

    #[tokio::test]
    async fn unresolvable_url_yields_empty_capture() {
        let config = SearchConfig::default();
        let capture = fetch_page_capture(&config, "   ").await;
        assert_eq!(capture, PageCapture::empty());
    }
}
