//! Canonicalisation of raw hrefs scraped from search-result pages.
//!
//! Result pages hand us hrefs in several shapes: protocol-relative
//! (`//example.com/...`), scheme-less (`example.com/...`), and DuckDuckGo's
//! redirect wrapper (`//duckduckgo.com/l/?uddg=<encoded target>&rut=...`).
//! [`normalize_href`] resolves all of them to an absolute URL, which then
//! serves as the deduplication key for the aggregator.

use url::Url;

/// Canonicalise a raw href into an absolute URL.
///
/// Rules, applied in order:
///
/// 1. Empty (after trimming) → `None`.
/// 2. Protocol-relative `//…` → `https:` is prepended.
/// 3. Missing scheme → `https://` is prepended.
/// 4. DuckDuckGo redirect wrapper carrying a `uddg` query parameter → the
///    parameter's URL-decoded value is substituted as the target (itself
///    scheme-fixed). Failure to decode the wrapper is non-fatal: the
///    scheme-fixed href is returned instead.
///
/// The returned URL is always absolute.
pub fn normalize_href(raw: &str) -> Option<String> {
    let href = raw.trim();
    if href.is_empty() {
        return None;
    }

    let href = ensure_scheme(href);

    if href.contains("duckduckgo.com/l/") {
        if let Ok(parsed) = Url::parse(&href) {
            if let Some((_, target)) = parsed.query_pairs().find(|(key, _)| key == "uddg") {
                return Some(ensure_scheme(&target));
            }
        }
        // Unparseable wrapper or missing uddg parameter: keep the href.
    }

    Some(href)
}

/// Prepend `https:` / `https://` so the href carries a scheme.
fn ensure_scheme(href: &str) -> String {
    if let Some(rest) = href.strip_prefix("//") {
        format!("https://{rest}")
    } else if !href.starts_with("http://") && !href.starts_with("https://") {
        format!("https://{href}")
    } else {
        href.to_string()
    }
}
