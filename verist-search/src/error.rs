//! Error types for the verist-search crate.
//!
//! All errors use stable string messages suitable for logging and
//! programmatic handling. No query text or credentials appear in error
//! messages.

/// Errors that can occur while gathering web evidence.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// An HTTP request to a search engine or result page failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A request exceeded its configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Failed to parse a response into structured results.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Classify a reqwest failure, keeping timeouts distinct from other
    /// transport errors.
    pub(crate) fn from_reqwest(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(format!("{context}: {err}"))
        } else {
            Self::Http(format!("{context}: {err}"))
        }
    }
}

/// Convenience type alias for verist-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
