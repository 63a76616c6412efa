//! Fact-check-worthy topic suggestions.
//!
//! Asks the model for a short list of statements worth verifying, optionally
//! themed around a query. The reply should be a JSON array of strings but is
//! parsed through its own fallback ladder, mirroring how verdict replies are
//! handled: direct array parse, bracket-span extraction, line-based array
//! reconstruction, and finally a question-harvesting regex.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CheckError, Result};
use crate::provider::ModelProvider;
use crate::synthesis::MODEL_RACE_TIMEOUT;

/// Quoted questions (`"…?"`) or bare capitalised questions in free text.
static QUESTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"]+\?)"|\b([A-Z][^?"\n]+\?)"#).expect("invalid question pattern")
});

/// Suggest fact-check-worthy topics, optionally themed by `query`.
///
/// The model call is raced against the same 12 s window as the no-evidence
/// verdict flow; a slower reply is discarded.
///
/// # Errors
///
/// Provider failures map onto [`CheckError`] per their kind; a reply that
/// yields no topics through any strategy becomes
/// [`CheckError::ResponseParse`] with the raw text.
pub async fn suggest_topics(
    provider: &dyn ModelProvider,
    query: Option<&str>,
) -> Result<Vec<String>> {
    let prompt = build_topics_prompt(query);

    let reply = match tokio::time::timeout(MODEL_RACE_TIMEOUT, provider.generate(&prompt, None))
        .await
    {
        Ok(outcome) => outcome?,
        Err(_) => {
            return Err(CheckError::Timeout(format!(
                "model did not answer within {}s",
                MODEL_RACE_TIMEOUT.as_secs()
            )));
        }
    };

    match parse_topic_list(&reply) {
        Some(topics) => Ok(topics),
        None => Err(CheckError::ResponseParse { raw: reply }),
    }
}

/// Build the topic-suggestion prompt.
pub(crate) fn build_topics_prompt(query: Option<&str>) -> String {
    match query {
        Some(query) => format!(
            "Generate 5-8 fact-check worthy statements or questions related to \"{query}\" \
             that might be trending or of interest.\n\
             Focus on topics whose factual accuracy people might want to verify.\n\
             Return ONLY a valid JSON array of strings, without ANY additional text, \
             explanation or formatting.\n\
             IMPORTANT: the response must be a parseable JSON array like: \
             [\"Question 1?\", \"Question 2?\", \"Is claim X true?\"]"
        ),
        None => "Generate 8-10 fact-check worthy statements or questions that are currently \
             trending or would be of high interest.\n\
             Include a mix of science, health, politics, technology, and general knowledge.\n\
             Focus on topics whose factual accuracy people might want to verify.\n\
             Return ONLY a valid JSON array of strings, without ANY additional text, \
             explanation or formatting.\n\
             IMPORTANT: the response must be a parseable JSON array like: \
             [\"Question 1?\", \"Question 2?\", \"Is claim X true?\"]"
            .to_string(),
    }
}

/// Parse the reply into a topic list, trying each strategy in order.
pub(crate) fn parse_topic_list(text: &str) -> Option<Vec<String>> {
    if let Some(topics) = parse_string_array(text) {
        return Some(topics);
    }

    if let Some(span) = embedded_array_span(text) {
        if let Some(topics) = parse_string_array(span) {
            return Some(topics);
        }
    }

    if let Some(topics) = reconstruct_array_from_lines(text) {
        return Some(topics);
    }

    harvest_questions(text)
}

/// Strategy 1: the whole (trimmed) text is a JSON array of strings.
fn parse_string_array(text: &str) -> Option<Vec<String>> {
    let value: serde_json::Value = serde_json::from_str(text.trim()).ok()?;
    let items = value.as_array()?;
    let topics: Vec<String> = items
        .iter()
        .filter_map(|item| item.as_str())
        .map(str::to_string)
        .collect();
    (!topics.is_empty()).then_some(topics)
}

/// Strategy 2: outermost `[…]` span (first `[` to last `]`).
fn embedded_array_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

/// Strategy 3: rebuild the array from quote/bracket lines, repairing a
/// trailing comma before the closing bracket.
fn reconstruct_array_from_lines(text: &str) -> Option<Vec<String>> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('"') || line.starts_with('[') || line.starts_with(']'))
        .collect();
    if lines.is_empty() {
        return None;
    }

    let joined = lines.join("").replace(",]", "]");
    parse_string_array(&joined)
}

/// Strategy 4: harvest question-shaped fragments from free text.
fn harvest_questions(text: &str) -> Option<Vec<String>> {
    let mut questions: Vec<String> = Vec::new();
    for caps in QUESTION_RE.captures_iter(text) {
        let question = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().trim().to_string());
        if let Some(question) = question {
            if !questions.contains(&question) {
                questions.push(question);
            }
        }
    }
    (!questions.is_empty()).then_some(questions)
}
