//! Error types for LLM operations

use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LLMError {
    /// Transport succeeded but the provider reported a failure
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// API key rejected (401/403)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Quota or rate limit hit (429)
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Request rejected by the provider or by local validation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// The prompt was refused before generation, with the provider's reason
    #[error("Prompt blocked: {0}")]
    Blocked(String),

    /// The provider answered without any candidate content
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Response body did not match the provider's wire format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl LLMError {
    /// Whether the same request might succeed if sent again later
    pub fn is_transient(&self) -> bool {
        match self {
            LLMError::RateLimitExceeded(_) | LLMError::RequestFailed(_) => true,
            #[cfg(feature = "gemini")]
            LLMError::HttpError(err) => err.is_timeout() || err.is_connect(),
            _ => false,
        }
    }
}

impl From<agent_utils::ConfigError> for LLMError {
    fn from(err: agent_utils::ConfigError) -> Self {
        LLMError::ConfigurationError(err.to_string())
    }
}
