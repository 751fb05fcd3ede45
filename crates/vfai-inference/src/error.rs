//! Error types for remote classification.

use thiserror::Error;

/// Result type for a single endpoint invocation.
pub type InvokeResult<T> = Result<T, InvokeError>;

/// Failure of one classification call against one candidate model.
///
/// These never escape the dispatcher: every variant means "try the next
/// candidate", and the distinctions exist for logging and tests.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("request timed out")]
    Timeout,

    #[error("model unavailable after loading retry")]
    Unavailable,

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("endpoint unreachable: {0}")]
    Unreachable(String),
}

impl InvokeError {
    /// Create a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }
}

/// Fatal configuration errors raised at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("HUGGINGFACE_API_KEY is not set")]
    MissingApiToken,
}
