//! Completion request and response types

use crate::{GroundingChunk, LLMError, Message, Result, Tool};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request for LLM completion with full conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier (provider-specific)
    pub model: String,

    /// Conversation history (alternating user/assistant messages)
    pub messages: Vec<Message>,

    /// Optional system prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Maximum tokens to generate (provider default when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0-2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Provider-side tools enabled for this request
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,

    /// Shape constraint on the generated text
    #[serde(default)]
    pub response_format: ResponseFormat,
}

/// Output constraint for a completion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free-form text
    #[default]
    Text,

    /// A JSON document conforming to `schema`
    Json {
        /// Schema built with [`crate::schema`]
        schema: Value,
    },
}

/// Response from LLM completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated message from the assistant
    pub message: Message,

    /// Stop reason (completed, max_tokens, safety, etc.)
    pub stop_reason: StopReason,

    /// Token usage statistics
    pub usage: TokenUsage,

    /// Citations reported by provider-side tools, in provider order
    #[serde(default)]
    pub grounding: Vec<GroundingChunk>,
}

impl CompletionResponse {
    /// Text of the generated message
    pub fn text(&self) -> &str {
        self.message.text()
    }
}

/// Reason the LLM stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural completion (end of turn)
    EndTurn,

    /// Hit max tokens limit
    MaxTokens,

    /// Output withheld by safety filters
    Safety,

    /// Any other provider-reported reason
    Other,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of input tokens
    pub input_tokens: usize,

    /// Number of output tokens
    pub output_tokens: usize,
}

impl TokenUsage {
    /// Total tokens used (input + output)
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}

impl CompletionRequest {
    /// Create a builder for completion requests
    pub fn builder(model: impl Into<String>) -> CompletionRequestBuilder {
        CompletionRequestBuilder::new(model)
    }

    /// Check the request is something a provider can serve
    ///
    /// Structured output cannot be combined with provider-side tools.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(LLMError::InvalidRequest("model must not be empty".to_string()));
        }
        if self.messages.is_empty() {
            return Err(LLMError::InvalidRequest(
                "at least one message is required".to_string(),
            ));
        }
        if !self.tools.is_empty() && matches!(self.response_format, ResponseFormat::Json { .. }) {
            return Err(LLMError::InvalidRequest(
                "a response schema cannot be combined with tools".to_string(),
            ));
        }
        Ok(())
    }

    /// True if the request asks for search grounding
    pub fn uses_search(&self) -> bool {
        self.tools.contains(&Tool::GoogleSearch)
    }
}

/// Builder for CompletionRequest
pub struct CompletionRequestBuilder {
    model: String,
    messages: Vec<Message>,
    system: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    tools: Vec<Tool>,
    response_format: ResponseFormat,
}

impl CompletionRequestBuilder {
    /// Create a new builder
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            system: None,
            max_tokens: None,
            temperature: None,
            tools: Vec::new(),
            response_format: ResponseFormat::Text,
        }
    }

    /// Add a single message
    pub fn add_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the maximum tokens
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Enable a provider-side tool
    pub fn tool(mut self, tool: Tool) -> Self {
        if !self.tools.contains(&tool) {
            self.tools.push(tool);
        }
        self
    }

    /// Constrain the output to a JSON document matching `schema`
    pub fn json_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_format = ResponseFormat::Json { schema };
        self
    }

    /// Build the completion request
    pub fn build(self) -> CompletionRequest {
        CompletionRequest {
            model: self.model,
            messages: self.messages,
            system: self.system,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            tools: self.tools,
            response_format: self.response_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Message, schema};
    use serde_json::json;

    #[test]
    fn test_builder() {
        let request = CompletionRequest::builder("gemini-2.5-flash")
            .add_message(Message::user("Hello"))
            .system("You are a helpful assistant")
            .max_tokens(2048)
            .temperature(0.7)
            .tool(Tool::GoogleSearch)
            .tool(Tool::GoogleSearch)
            .build();

        assert_eq!(request.model, "gemini-2.5-flash");
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.max_tokens, Some(2048));
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.tools, vec![Tool::GoogleSearch]);
        assert!(request.uses_search());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_schema_with_tools_is_rejected() {
        let request = CompletionRequest::builder("gemini-2.5-flash")
            .add_message(Message::user("Hello"))
            .tool(Tool::GoogleSearch)
            .json_schema(schema::object(json!({ "a": schema::string("a") }), vec!["a"]))
            .build();

        assert!(matches!(request.validate(), Err(LLMError::InvalidRequest(_))));
    }

    #[test]
    fn test_empty_messages_rejected() {
        let request = CompletionRequest::builder("gemini-2.5-flash").build();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_token_usage() {
        let usage = TokenUsage {
            input_tokens: 100,
            output_tokens: 50,
        };
        assert_eq!(usage.total(), 150);
    }
}
