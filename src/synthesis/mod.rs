//! Verdict synthesis: prompt assembly, model invocation, reply parsing.
//!
//! Builds a prompt around the gathered evidence (or a general-knowledge
//! prompt when there is none), asks the model for a structured verdict, runs
//! the reply through the parse fallback chain, and re-indexes citations into
//! a clean [`VerdictRecord`].

pub(crate) mod citations;
pub(crate) mod parse;

use std::time::Duration;

use crate::error::{CheckError, Result};
use crate::provider::ModelProvider;
use crate::types::{EvidenceBundle, VerdictRecord};

/// Outer race applied to model calls that carry no web evidence — a
/// general-knowledge answer that takes longer than this is abandoned and the
/// in-flight request is dropped, not awaited. Evidence-enriched calls are
/// bounded by the provider's own timeout instead.
pub(crate) const MODEL_RACE_TIMEOUT: Duration = Duration::from_secs(12);

/// Synthesize a verdict for `statement` from the gathered evidence.
///
/// `used_web_scraping` on the result reflects whether the bundle carried any
/// evidence, independent of whether the model cited it.
///
/// # Errors
///
/// Provider failures map onto [`CheckError`] per their kind; a reply that
/// defeats every parsing strategy yields [`CheckError::ResponseParse`] with
/// the raw text.
pub async fn synthesize(
    provider: &dyn ModelProvider,
    statement: &str,
    evidence: &EvidenceBundle,
) -> Result<VerdictRecord> {
    synthesize_with_race(provider, statement, evidence, MODEL_RACE_TIMEOUT).await
}

/// [`synthesize`] with an explicit no-evidence race window (testable).
pub(crate) async fn synthesize_with_race(
    provider: &dyn ModelProvider,
    statement: &str,
    evidence: &EvidenceBundle,
    race: Duration,
) -> Result<VerdictRecord> {
    let used_web_scraping = !evidence.is_empty();
    let prompt = build_prompt(statement, evidence);
    let schema = verdict_schema();

    let reply = if used_web_scraping {
        provider.generate(&prompt, Some(&schema)).await?
    } else {
        match tokio::time::timeout(race, provider.generate(&prompt, Some(&schema))).await {
            Ok(outcome) => outcome?,
            Err(_) => {
                return Err(CheckError::Timeout(format!(
                    "model did not answer within {}s",
                    race.as_secs()
                )));
            }
        }
    };

    let parsed = parse::parse_reply(&reply)?;
    let (sources, explanation) = citations::remap(parsed.sources, parsed.explanation);

    Ok(VerdictRecord {
        verdict: parsed.verdict,
        explanation,
        sources,
        confidence: parsed.confidence,
        used_web_scraping,
    })
}

/// Build the fact-checking prompt.
///
/// With evidence: a numbered evidence block (search snippets first, then
/// per-source extracted content under the same numbering) plus an
/// instruction to answer from that evidence only, citing `[n]` markers.
/// Without evidence: a general-knowledge prompt with no evidence block.
pub(crate) fn build_prompt(statement: &str, evidence: &EvidenceBundle) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "Act as a fact-checking expert. Analyze this statement and determine whether it is \
         TRUE, FALSE, PARTIALLY_TRUE, CONTEXT_NOT_CLEAR, or UNKNOWN:\n\n",
    );
    prompt.push_str(&format!("Statement: \"{statement}\"\n"));

    if !evidence.is_empty() {
        prompt.push_str("\nWeb evidence gathered for this statement:\n\nSearch results:\n");
        for (position, result) in evidence.search_results.iter().enumerate() {
            let number = position + 1;
            prompt.push_str(&format!("[{number}] {} — {}\n", result.title, result.url));
            if !result.snippet.is_empty() {
                prompt.push_str(&format!("    {}\n", result.snippet));
            }
        }

        if !evidence.content_details.is_empty() {
            prompt.push_str("\nExtracted page content:\n");
            for detail in &evidence.content_details {
                let number = evidence
                    .search_results
                    .iter()
                    .position(|r| r.url == detail.result.url)
                    .map(|p| p + 1);
                match number {
                    Some(number) => prompt.push_str(&format!("[{number}] {}", detail.result.url)),
                    None => prompt.push_str(&format!("[-] {}", detail.result.url)),
                }
                if let Some(updated) = detail.last_updated {
                    prompt.push_str(&format!(" (last updated {})", updated.format("%Y-%m-%d")));
                }
                prompt.push('\n');
                if !detail.content.is_empty() {
                    prompt.push_str(&detail.content);
                    prompt.push('\n');
                }
            }
        }

        prompt.push_str(
            "\nAnswer using only the evidence above. Cite supporting sources with bracket \
             markers like [2] matching the evidence numbering.\n",
        );
    } else {
        prompt.push_str("\nAnswer from your general knowledge.\n");
    }

    prompt.push_str(
        "\nProvide:\n\
         1. A verdict (TRUE, FALSE, PARTIALLY_TRUE, CONTEXT_NOT_CLEAR, or UNKNOWN)\n\
         2. A detailed explanation of your reasoning\n\
         3. The sources that support your conclusion, with URLs\n\
         4. A confidence between 0 and 1\n\
         \n\
         Format the response as a JSON object with the following structure:\n\
         {\n\
         \x20 \"verdict\": \"TRUE\",\n\
         \x20 \"explanation\": \"detailed explanation citing sources like [1]...\",\n\
         \x20 \"sources\": [\n\
         \x20   {\"index\": 1, \"name\": \"Source Name\", \"url\": \"https://source.url\"}\n\
         \x20 ],\n\
         \x20 \"confidence\": 0.8\n\
         }\n",
    );

    prompt
}

/// JSON schema for the verdict object, passed to structured generation.
pub(crate) fn verdict_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "verdict": {
                "type": "string",
                "enum": ["TRUE", "FALSE", "PARTIALLY_TRUE", "CONTEXT_NOT_CLEAR", "UNKNOWN"]
            },
            "explanation": { "type": "string" },
            "sources": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "index": { "type": "integer" },
                        "name": { "type": "string" },
                        "url": { "type": "string" }
                    },
                    "required": ["name", "url"]
                }
            },
            "confidence": { "type": "number" }
        },
        "required": ["verdict", "explanation", "sources", "confidence"]
    })
}
