//! End-to-end pipeline tests with a scripted model provider.
//!
//! These cover the contract scenarios: local rejection of too-short
//! statements, the no-evidence prompt shape, citation re-indexing of a
//! prose-wrapped JSON reply, and terminal parse failure. No network calls
//! are made — the provider is scripted and the evidence bundle synthetic.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use verist::provider::{ModelProvider, ProviderError};
use verist::types::{ContentDetail, EvidenceBundle};
use verist::{synthesize, CheckError, FactChecker, Verdict};
use verist_search::{SearchEngine, SearchResult};

/// Scripted provider that records the prompts it receives.
struct RecordingProvider {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl RecordingProvider {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn last_prompt(&self) -> String {
        self.prompts
            .lock()
            .expect("prompt lock")
            .last()
            .cloned()
            .expect("a prompt was recorded")
    }
}

#[async_trait]
impl ModelProvider for RecordingProvider {
    fn name(&self) -> &str {
        "recording"
    }

    async fn generate(
        &self,
        prompt: &str,
        _schema: Option<&serde_json::Value>,
    ) -> Result<String, ProviderError> {
        self.prompts.lock().expect("prompt lock").push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// Provider that panics when reached — used to prove no model call happens.
struct UnreachableProvider;

#[async_trait]
impl ModelProvider for UnreachableProvider {
    fn name(&self) -> &str {
        "unreachable"
    }

    async fn generate(
        &self,
        _prompt: &str,
        _schema: Option<&serde_json::Value>,
    ) -> Result<String, ProviderError> {
        panic!("no model call expected");
    }
}

fn result(url: &str, title: &str) -> SearchResult {
    SearchResult {
        title: title.into(),
        url: url.into(),
        snippet: format!("snippet for {title}"),
        source: SearchEngine::DuckDuckGo,
    }
}

// ── Scenario: too-short statement ───────────────────────────────────────

#[tokio::test]
async fn two_char_statement_fails_validation_without_any_calls() {
    let checker = FactChecker::with_defaults(Arc::new(UnreachableProvider)).expect("defaults");
    let err = checker.check_fact("ab").await.unwrap_err();
    assert_eq!(err.code(), "INVALID_INPUT");
    assert!(err.to_string().contains("at least 3 characters"));
}

// ── Scenario: empty evidence ────────────────────────────────────────────

#[tokio::test]
async fn empty_evidence_uses_general_knowledge_prompt() {
    let provider = RecordingProvider::new(
        r#"{"verdict":"UNKNOWN","explanation":"From general knowledge.","sources":[],"confidence":0.5}"#,
    );

    let record = synthesize(&provider, "some statement", &EvidenceBundle::default())
        .await
        .expect("parses");

    assert!(!record.used_web_scraping);
    let prompt = provider.last_prompt();
    assert!(!prompt.contains("Search results:"));
    assert!(!prompt.contains("Extracted page content:"));
    assert!(prompt.contains("general knowledge"));
}

#[tokio::test]
async fn evidence_bundle_flows_into_prompt() {
    let provider = RecordingProvider::new(
        r#"{"verdict":"TRUE","explanation":"Supported [1].","sources":[{"index":1,"name":"A","url":"https://a"}],"confidence":0.8}"#,
    );

    let evidence = EvidenceBundle {
        search_results: vec![result("https://a.example/", "Alpha"), result("https://b.example/", "Beta")],
        content_details: vec![ContentDetail {
            result: result("https://a.example/", "Alpha"),
            content: "Alpha page content.".into(),
            last_updated: None,
        }],
    };

    let record = synthesize(&provider, "some statement", &evidence)
        .await
        .expect("parses");

    assert!(record.used_web_scraping);
    let prompt = provider.last_prompt();
    assert!(prompt.contains("[1] Alpha — https://a.example/"));
    assert!(prompt.contains("[2] Beta — https://b.example/"));
    assert!(prompt.contains("Alpha page content."));
}

// ── Scenario: prose-wrapped JSON with citation remap ────────────────────

#[tokio::test]
async fn prose_wrapped_json_reply_is_recovered_and_reindexed() {
    let provider = RecordingProvider::new(
        "Sure! {\"verdict\":\"TRUE\",\"explanation\":\"Confirmed [1].\",\"sources\":[{\"index\":7,\"name\":\"X\",\"url\":\"https://x\"}],\"confidence\":0.9}",
    );

    let record = synthesize(&provider, "some statement", &EvidenceBundle::default())
        .await
        .expect("parses");

    assert_eq!(record.verdict, Verdict::True);
    assert_eq!(record.explanation, "Confirmed [1].");
    assert_eq!(record.sources.len(), 1);
    assert_eq!(record.sources[0].index, 1);
    assert_eq!(record.sources[0].name, "X");
    assert_eq!(record.sources[0].url, "https://x");
    assert!((record.confidence - 0.9).abs() < f64::EPSILON);
}

// ── Scenario: terminal parse failure ────────────────────────────────────

#[tokio::test]
async fn unparseable_prose_is_a_terminal_parse_failure() {
    let provider =
        RecordingProvider::new("I looked into it and things are complicated, honestly.");

    let err = synthesize(&provider, "some statement", &EvidenceBundle::default())
        .await
        .unwrap_err();

    match err {
        CheckError::ResponseParse { raw } => {
            assert_eq!(raw, "I looked into it and things are complicated, honestly.");
        }
        other => panic!("expected ResponseParse, got {other:?}"),
    }
}

// ── Parse precedence ────────────────────────────────────────────────────

#[tokio::test]
async fn valid_json_reply_uses_direct_parse_untouched() {
    // The explanation contains text the regex fallbacks would truncate at
    // the first comma; a direct JSON parse must keep it intact.
    let provider = RecordingProvider::new(
        r#"{"verdict":"PARTIALLY_TRUE","explanation":"True for A, false for B, unclear for C.","sources":[],"confidence":0.7}"#,
    );

    let record = synthesize(&provider, "some statement", &EvidenceBundle::default())
        .await
        .expect("parses");

    assert_eq!(record.verdict, Verdict::PartiallyTrue);
    assert_eq!(record.explanation, "True for A, false for B, unclear for C.");
}

#[tokio::test]
async fn provider_errors_surface_with_distinct_codes() {
    struct FailingProvider(fn() -> ProviderError);

    #[async_trait]
    impl ModelProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }
        async fn generate(
            &self,
            _prompt: &str,
            _schema: Option<&serde_json::Value>,
        ) -> Result<String, ProviderError> {
            Err((self.0)())
        }
    }

    let cases: Vec<(fn() -> ProviderError, &str)> = vec![
        (|| ProviderError::InvalidKey("nope".into()), "AUTH_FAILED"),
        (|| ProviderError::RateLimited("slow down".into()), "RATE_LIMITED"),
        (|| ProviderError::Timeout("too slow".into()), "TIMEOUT_ERROR"),
        (|| ProviderError::Other("boom".into()), "PROVIDER_ERROR"),
    ];

    for (make, expected_code) in cases {
        let provider = FailingProvider(make);
        let err = synthesize(&provider, "some statement", &EvidenceBundle::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), expected_code);
    }
}
