//! Google Gemini `generateContent` adapter.
//!
//! Implements [`ModelProvider`] over the Gemini REST API. Structured output
//! is requested via `generationConfig.responseMimeType` +
//! `generationConfig.responseSchema` when the caller supplies a schema.

use async_trait::async_trait;
use std::time::Duration;

use super::{ModelProvider, ProviderError};

/// Configuration for the Gemini adapter.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Gemini API key.
    pub api_key: String,
    /// Base URL for the API (defaults to the public endpoint).
    pub base_url: String,
    /// Model identifier (e.g. `"gemini-2.0-flash"`).
    pub model: String,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Create a new Gemini config with the default endpoint and model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.0-flash".to_string(),
            timeout_secs: 30,
        }
    }

    /// Set the base URL (useful for testing with mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Gemini REST API provider.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a provider from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Other`] if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }
}

/// Build a `generateContent` request body.
pub(crate) fn build_generate_request(
    prompt: &str,
    schema: Option<&serde_json::Value>,
) -> serde_json::Value {
    let mut body = serde_json::json!({
        "contents": [{
            "parts": [{ "text": prompt }]
        }]
    });

    if let Some(schema) = schema {
        body["generationConfig"] = serde_json::json!({
            "responseMimeType": "application/json",
            "responseSchema": schema,
        });
    }

    body
}

/// Map a non-success HTTP status to a typed provider error.
pub(crate) fn map_http_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
    let detail = format!("HTTP {status}: {body}");
    match status.as_u16() {
        401 | 403 => ProviderError::InvalidKey(detail),
        // Gemini reports bad keys as 400 with an "API key" message.
        400 if body.contains("API key") => ProviderError::InvalidKey(detail),
        429 => ProviderError::RateLimited(detail),
        _ => ProviderError::Other(detail),
    }
}

/// Extract the concatenated candidate text from a `generateContent` reply.
pub(crate) fn extract_text(value: &serde_json::Value) -> Option<String> {
    let parts = value
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect::<Vec<_>>()
        .join("");

    (!text.is_empty()).then_some(text)
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(
        &self,
        prompt: &str,
        schema: Option<&serde_json::Value>,
    ) -> Result<String, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        let body = build_generate_request(prompt, schema);

        tracing::trace!(model = %self.config.model, structured = schema.is_some(), "Gemini request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(format!("Gemini request timed out: {e}"))
                } else {
                    ProviderError::Other(format!("Gemini request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, "Gemini request returned error");
            return Err(map_http_error(status, &body));
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Other(format!("Gemini reply read failed: {e}")))?;

        extract_text(&value)
            .ok_or_else(|| ProviderError::Other("Gemini reply carried no candidate text".into()))
    }
}
