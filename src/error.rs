//! Error types for the verist crate.
//!
//! Each error variant carries a stable error code (SCREAMING_SNAKE_CASE)
//! that is included in the Display output and accessible via
//! [`CheckError::code()`]. Codes are part of the public API contract and
//! will not change.

use crate::provider::ProviderError;

/// Stable error codes for programmatic error handling.
///
/// These codes never change and form part of the public API contract.
/// Use these for distinguishing errors rather than parsing Display output.
pub mod error_codes {
    /// The statement failed validation before any pipeline work.
    pub const INVALID_INPUT: &str = "INVALID_INPUT";

    /// Invalid configuration.
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";

    /// Authentication with the model provider failed (invalid/missing key).
    pub const AUTH_FAILED: &str = "AUTH_FAILED";

    /// The model provider is rate limiting requests.
    pub const RATE_LIMITED: &str = "RATE_LIMITED";

    /// A model request timed out.
    pub const TIMEOUT_ERROR: &str = "TIMEOUT_ERROR";

    /// Provider-specific failure not covered by other variants.
    pub const PROVIDER_ERROR: &str = "PROVIDER_ERROR";

    /// The model reply defeated every parsing strategy.
    pub const PARSE_FAILED: &str = "PARSE_FAILED";
}

/// Errors produced by the fact-checking pipeline.
///
/// Evidence-layer failures never appear here — they degrade to an empty or
/// partial evidence bundle inside the pipeline. Only input validation,
/// provider failures, and reply-parse exhaustion reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The statement failed validation; no network work was performed.
    #[error("[{}] {}", error_codes::INVALID_INPUT, .0)]
    InvalidStatement(String),

    /// Invalid pipeline configuration.
    #[error("[{}] {}", error_codes::CONFIG_INVALID, .0)]
    Config(String),

    /// Authentication failed — check the provider API key.
    #[error("[{}] {}", error_codes::AUTH_FAILED, .0)]
    Auth(String),

    /// The provider is rate limiting — retry after a backoff.
    #[error("[{}] {}", error_codes::RATE_LIMITED, .0)]
    RateLimited(String),

    /// The model did not answer in time — retrying is at the caller's
    /// discretion.
    #[error("[{}] {}", error_codes::TIMEOUT_ERROR, .0)]
    Timeout(String),

    /// Any other provider-side failure.
    #[error("[{}] {}", error_codes::PROVIDER_ERROR, .0)]
    Provider(String),

    /// Every parsing strategy failed; `raw` carries the unmodified model
    /// reply for diagnostics. Never silently replaced with a fabricated
    /// verdict.
    #[error("[{}] model reply could not be parsed", error_codes::PARSE_FAILED)]
    ResponseParse {
        /// The raw model reply text.
        raw: String,
    },
}

impl CheckError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidStatement(_) => error_codes::INVALID_INPUT,
            Self::Config(_) => error_codes::CONFIG_INVALID,
            Self::Auth(_) => error_codes::AUTH_FAILED,
            Self::RateLimited(_) => error_codes::RATE_LIMITED,
            Self::Timeout(_) => error_codes::TIMEOUT_ERROR,
            Self::Provider(_) => error_codes::PROVIDER_ERROR,
            Self::ResponseParse { .. } => error_codes::PARSE_FAILED,
        }
    }

    /// Returns true if this error represents a transient failure that the
    /// caller may reasonably retry. The pipeline itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::InvalidStatement(_) | Self::Config(_) | Self::Auth(_) => false,
            Self::RateLimited(_) | Self::Timeout(_) | Self::Provider(_) => true,
            Self::ResponseParse { .. } => false,
        }
    }
}

impl From<ProviderError> for CheckError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::InvalidKey(msg) => Self::Auth(format!(
                "invalid API key — check your provider credentials: {msg}"
            )),
            ProviderError::RateLimited(msg) => Self::RateLimited(format!(
                "provider rate limit exceeded — try again later: {msg}"
            )),
            ProviderError::Timeout(msg) => Self::Timeout(format!("model request timed out: {msg}")),
            ProviderError::Other(msg) => Self::Provider(msg),
        }
    }
}

/// Convenience alias for verist results.
pub type Result<T> = std::result::Result<T, CheckError>;
