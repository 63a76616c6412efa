//! Model provider boundary.
//!
//! The generative model is a black-box capability behind [`ModelProvider`]:
//! it accepts a prompt plus an optional structured-output schema and returns
//! text or a typed failure. Provider failures are distinguished so callers
//! can react differently to auth, rate-limit, and timeout conditions.

pub mod gemini;

pub use gemini::{GeminiConfig, GeminiProvider};

use async_trait::async_trait;

/// Failures at the model provider boundary.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider did not answer within its request timeout.
    #[error("provider timeout: {0}")]
    Timeout(String),

    /// The provider is rate limiting requests.
    #[error("provider rate limited: {0}")]
    RateLimited(String),

    /// The API key was rejected.
    #[error("provider rejected API key: {0}")]
    InvalidKey(String),

    /// Any other provider failure.
    #[error("provider error: {0}")]
    Other(String),
}

/// A generative model provider.
///
/// Implementations must be `Send + Sync`; the pipeline shares one provider
/// across concurrent requests.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Returns the provider name (e.g. `"gemini"`).
    fn name(&self) -> &str;

    /// Generate text for `prompt`.
    ///
    /// When `schema` is given, the provider is asked to produce output
    /// conforming to that JSON schema; providers without structured-output
    /// support may ignore it.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] distinguishing timeouts, rate limits, and
    /// authentication failures from other conditions.
    async fn generate(
        &self,
        prompt: &str,
        schema: Option<&serde_json::Value>,
    ) -> Result<String, ProviderError>;
}
