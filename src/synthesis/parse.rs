//! Layered parsing of model replies.
//!
//! Replies are supposed to be JSON but arrive in every imaginable shape:
//! fenced, wrapped in prose, truncated, or free text. Strategies are tried
//! in strict order — direct JSON parse, embedded-object extraction, manual
//! field extraction — and the first success wins. Exhaustion produces
//! [`CheckError::ResponseParse`] carrying the raw reply.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CheckError;
use crate::types::Verdict;

/// Explanation substituted when the reply carried none.
pub(crate) const DEFAULT_EXPLANATION: &str =
    "The model analyzed the statement but did not provide a detailed explanation.";

/// Confidence substituted when the reply carried none.
pub(crate) const DEFAULT_CONFIDENCE: f64 = 0.5;

/// A source as the model supplied it, before citation re-indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawSource {
    /// The model-supplied index, if any.
    pub index: Option<usize>,
    pub name: String,
    pub url: String,
}

/// A reply after parsing, before citation re-indexing.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedReply {
    pub verdict: Verdict,
    pub explanation: String,
    pub sources: Vec<RawSource>,
    pub confidence: f64,
}

static VERDICT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)verdict["'\s:]+([a-z_ ]+)"#).expect("invalid verdict pattern")
});

static EXPLANATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)explanation["'\s:]+([^"]+?)(?:,|\n|source)"#)
        .expect("invalid explanation pattern")
});

static SOURCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(?:index["'\s:]+(\d+)["',\s]+)?name["'\s:]+([^"',}]+)["',\s]+url["'\s:]+([^"'\s,}]+)"#,
    )
    .expect("invalid source pattern")
});

static CONFIDENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)confidence["'\s:]+([0-9]*\.?[0-9]+)"#).expect("invalid confidence pattern")
});

/// Run the reply through the fallback chain.
///
/// # Errors
///
/// Returns [`CheckError::ResponseParse`] with the raw reply when every
/// strategy fails. This is terminal — callers must not retry it away.
pub(crate) fn parse_reply(text: &str) -> Result<ParsedReply, CheckError> {
    if let Some(reply) = parse_json_object(text) {
        tracing::trace!("reply parsed directly as JSON");
        return Ok(reply);
    }

    if let Some(span) = embedded_object_span(text) {
        if let Some(reply) = parse_json_object(span) {
            tracing::trace!("reply parsed from embedded JSON span");
            return Ok(reply);
        }
    }

    if let Some(reply) = extract_fields(text) {
        tracing::debug!("reply recovered via manual field extraction");
        return Ok(reply);
    }

    tracing::warn!("model reply defeated all parsing strategies");
    Err(CheckError::ResponseParse {
        raw: text.to_string(),
    })
}

/// Strategy 1: treat the whole (trimmed) text as a JSON object.
fn parse_json_object(text: &str) -> Option<ParsedReply> {
    let value: serde_json::Value = serde_json::from_str(text.trim()).ok()?;
    let obj = value.as_object()?;
    Some(reply_from_object(obj))
}

/// Strategy 2: locate the outermost `{…}` span (first `{` to last `}`).
fn embedded_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Convert a parsed JSON object, substituting defaults for missing fields.
fn reply_from_object(obj: &serde_json::Map<String, serde_json::Value>) -> ParsedReply {
    let verdict = obj
        .get("verdict")
        .and_then(|v| v.as_str())
        .map(Verdict::parse)
        .unwrap_or(Verdict::Unknown);

    let explanation = obj
        .get("explanation")
        .and_then(|v| v.as_str())
        .unwrap_or(DEFAULT_EXPLANATION)
        .to_string();

    let confidence = obj
        .get("confidence")
        .and_then(|v| v.as_f64())
        .unwrap_or(DEFAULT_CONFIDENCE)
        .clamp(0.0, 1.0);

    let sources = obj
        .get("sources")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_object())
                .map(|src| RawSource {
                    index: src.get("index").and_then(|i| i.as_u64()).map(|i| i as usize),
                    name: src
                        .get("name")
                        .and_then(|n| n.as_str())
                        .unwrap_or_default()
                        .to_string(),
                    url: src
                        .get("url")
                        .and_then(|u| u.as_str())
                        .unwrap_or_default()
                        .to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    ParsedReply {
        verdict,
        explanation,
        sources,
        confidence,
    }
}

/// Strategy 3: regex extraction of individual fields from free text.
///
/// Fails (returns `None`) only when no verdict token can be located; a
/// located-but-unrecognised token coerces to [`Verdict::Unknown`].
fn extract_fields(text: &str) -> Option<ParsedReply> {
    let verdict_caps = VERDICT_RE.captures(text)?;
    let verdict = Verdict::parse(verdict_caps.get(1)?.as_str());

    let explanation = EXPLANATION_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_EXPLANATION.to_string());

    let mut sources = Vec::new();
    let mut next_seq = 1usize;
    for caps in SOURCE_RE.captures_iter(text) {
        let (Some(name), Some(url)) = (caps.get(2), caps.get(3)) else {
            continue;
        };
        let index = match caps.get(1).and_then(|m| m.as_str().parse::<usize>().ok()) {
            Some(explicit) => Some(explicit),
            None => {
                let assigned = next_seq;
                next_seq += 1;
                Some(assigned)
            }
        };
        sources.push(RawSource {
            index,
            name: name.as_str().trim().to_string(),
            url: url.as_str().trim().to_string(),
        });
    }

    let confidence = CONFIDENCE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(DEFAULT_CONFIDENCE)
        .clamp(0.0, 1.0);

    Some(ParsedReply {
        verdict,
        explanation,
        sources,
        confidence,
    })
}
