//! Error types for stock analysis operations

use crate::engine::AgentKind;
use agent_llm::{LLMError, SchemaViolation};
use thiserror::Error;

/// Failure of a single remote analysis task
#[derive(Debug, Error)]
pub enum TaskError {
    /// Transport, status or provider-side failure
    #[error("LLM error: {0}")]
    Llm(#[from] LLMError),

    /// Response text was not valid JSON
    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Response JSON did not match the expected shape
    #[error("schema violation at {0}")]
    SchemaViolation(#[from] SchemaViolation),

    /// The model returned no usable text
    #[error("empty response from model")]
    EmptyResponse,

    /// A prompt template failed to render
    #[error("prompt error: {0}")]
    Prompt(#[from] minijinja::Error),

    /// The response extraction pattern failed to compile
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

impl TaskError {
    /// Whether the failure came from the provider and may clear on a rerun
    pub fn is_transient(&self) -> bool {
        matches!(self, TaskError::Llm(err) if err.is_transient())
    }
}

/// Stock analysis specific errors
#[derive(Debug, Error)]
pub enum StockError {
    /// Caller input rejected before any work started
    #[error("Validation error: {0}")]
    Validation(String),

    /// An analyst task failed
    #[error("{kind} analysis failed: {source}")]
    RemoteTask {
        kind: AgentKind,
        #[source]
        source: TaskError,
    },

    /// The manager synthesis task failed
    #[error("manager synthesis failed: {0}")]
    ManagerTask(#[source] TaskError),

    /// Missing or unusable credential
    #[error("Startup error: {0}")]
    Startup(String),

    /// The provider could not be constructed for a non-configuration reason
    #[error("Provider setup failed: {0}")]
    ProviderSetup(#[source] LLMError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A prompt template failed to render
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;

impl From<agent_utils::ConfigError> for StockError {
    fn from(err: agent_utils::ConfigError) -> Self {
        StockError::Config(err.to_string())
    }
}

impl StockError {
    /// Attach the analyst kind to a task failure
    pub fn remote(kind: AgentKind, source: TaskError) -> Self {
        StockError::RemoteTask { kind, source }
    }

    /// Classify a failure to construct the provider
    ///
    /// Only configuration problems (missing key, bad endpoint) are startup
    /// errors. Anything else keeps its provider error.
    pub fn provider_setup(err: LLMError) -> Self {
        match err {
            LLMError::ConfigurationError(msg) => StockError::Startup(msg),
            other => StockError::ProviderSetup(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StockError::Validation("ticker must not be empty".to_string());
        assert_eq!(err.to_string(), "Validation error: ticker must not be empty");

        let err = StockError::remote(AgentKind::Chip, TaskError::EmptyResponse);
        assert_eq!(err.to_string(), "chip analysis failed: empty response from model");
    }

    #[test]
    fn test_transient_task_errors() {
        assert!(TaskError::Llm(LLMError::RateLimitExceeded("quota".to_string())).is_transient());
        assert!(!TaskError::EmptyResponse.is_transient());
    }

    #[test]
    fn test_missing_key_is_startup_error() {
        let err = StockError::provider_setup(LLMError::ConfigurationError(
            "API key not set".to_string(),
        ));
        assert!(matches!(err, StockError::Startup(msg) if msg == "API key not set"));
    }

    #[test]
    fn test_other_provider_errors_are_not_startup() {
        let err = StockError::provider_setup(LLMError::RateLimitExceeded("quota".to_string()));
        assert!(matches!(
            err,
            StockError::ProviderSetup(LLMError::RateLimitExceeded(_))
        ));
        assert_eq!(err.to_string(), "Provider setup failed: Rate limit exceeded: quota");
    }

    #[test]
    fn test_task_error_source_chain() {
        let err = StockError::ManagerTask(TaskError::Llm(LLMError::AuthenticationFailed(
            "API key not valid".to_string(),
        )));
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(
            source.as_deref(),
            Some("LLM error: Authentication failed: API key not valid")
        );
    }
}
