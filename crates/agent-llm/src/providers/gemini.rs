//! Google Gemini provider implementation
//!
//! This module implements the LLMProvider trait for the Gemini
//! `generateContent` REST endpoint.
//! See: https://ai.google.dev/api/generate-content
//!
//! Two request shapes matter to callers:
//!
//! - search-grounded: `tools: [{ "googleSearch": {} }]`, free-form text back,
//!   citations in `groundingMetadata.groundingChunks`
//! - structured: `generationConfig.responseMimeType = "application/json"` plus
//!   `responseSchema`, no tools
//!
//! The API rejects the two combined, so [`CompletionRequest::validate`] is
//! checked before anything is sent.
//!
//! # Example
//!
//! ```no_run
//! use agent_llm::{CompletionRequest, LLMProvider, Message, Tool};
//! use agent_llm::providers::GeminiProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads GEMINI_API_KEY (or API_KEY)
//!     let provider = GeminiProvider::from_env()?;
//!
//!     let request = CompletionRequest::builder("gemini-2.5-flash")
//!         .add_message(Message::user("Latest headlines for 2330.TW?"))
//!         .tool(Tool::GoogleSearch)
//!         .build();
//!
//!     let response = provider.complete(request).await?;
//!     println!("{}", response.text());
//!     for chunk in &response.grounding {
//!         println!("{:?}", chunk.uri);
//!     }
//!     Ok(())
//! }
//! ```

use crate::{
    CompletionRequest, CompletionResponse, GroundingChunk, LLMError, LLMProvider, Message,
    ResponseFormat, Result, Role, StopReason, TokenUsage, Tool,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const TIMEOUT_VAR: &str = "GEMINI_TIMEOUT_SECS";

/// Environment variables checked, in order, for the API key
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Configuration for Gemini provider
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL for the API (default: "https://generativelanguage.googleapis.com/v1beta")
    pub api_base: String,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create config from environment variables
    ///
    /// Reads the API key from `GEMINI_API_KEY`, falling back to `API_KEY`.
    /// Optionally reads the base URL from `GEMINI_API_BASE` and the request
    /// timeout from `GEMINI_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let api_key = API_KEY_VARS
            .iter()
            .find_map(|name| agent_utils::optional_env(name))
            .ok_or_else(|| agent_utils::ConfigError::Missing(API_KEY_VARS.join(" or ")))?;

        let mut config = Self::new(api_key);
        if let Some(api_base) = agent_utils::optional_env("GEMINI_API_BASE") {
            config = config.with_api_base(api_base);
        }
        if let Some(raw) = agent_utils::optional_env(TIMEOUT_VAR) {
            config = config.with_timeout(parse_timeout(&raw)?);
        }
        Ok(config)
    }

    /// Set custom API base URL (proxies, regional endpoints, test servers)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(LLMError::ConfigurationError("API key is empty".to_string()));
        }
        url::Url::parse(&self.api_base).map_err(|e| {
            LLMError::ConfigurationError(format!("invalid api_base '{}': {e}", self.api_base))
        })?;
        Ok(())
    }
}

fn parse_timeout(raw: &str) -> Result<u64> {
    raw.parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .ok_or_else(|| {
            agent_utils::ConfigError::Invalid {
                key: TIMEOUT_VAR.to_string(),
                reason: format!("expected a positive number of seconds, got '{raw}'"),
            }
            .into()
        })
}

/// Gemini provider
///
/// Works with any `generateContent`-capable model, e.g.:
/// - gemini-2.5-flash
/// - gemini-2.5-pro
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a provider with just an API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(GeminiConfig::new(api_key))
    }

    /// Create a provider with custom configuration
    pub fn with_config(config: GeminiConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(GeminiConfig::from_env()?)
    }

    /// Get the provider configuration
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{model}:generateContent",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    #[instrument(skip(self, request), fields(model = %request.model, search = request.uses_search()))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        request.validate()?;
        debug!("Sending request to Gemini API");

        let body = build_request(&request);

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", &self.config.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        // Handle errors
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;

            return Err(match status.as_u16() {
                401 | 403 => LLMError::AuthenticationFailed(error_text),
                429 => LLMError::RateLimitExceeded(error_text),
                400 => LLMError::InvalidRequest(error_text),
                404 => LLMError::ModelNotFound(request.model),
                _ => LLMError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        let converted = convert_response(gemini_response)?;
        debug!(
            "Received response - stop_reason: {:?}, tokens: {}/{}, grounding chunks: {}",
            converted.stop_reason,
            converted.usage.input_tokens,
            converted.usage.output_tokens,
            converted.grounding.len()
        );
        Ok(converted)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

fn build_request(request: &CompletionRequest) -> GeminiRequest {
    let contents = request
        .messages
        .iter()
        .map(|message| GeminiContent {
            role: Some(
                match message.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                }
                .to_string(),
            ),
            parts: vec![GeminiPart::text(&message.content)],
        })
        .collect();

    let system_instruction = request.system.as_ref().map(|system| GeminiContent {
        role: None,
        parts: vec![GeminiPart::text(system)],
    });

    let tools = request
        .tools
        .iter()
        .map(|tool| match tool {
            Tool::GoogleSearch => GeminiTool {
                google_search: GoogleSearch {},
            },
        })
        .collect();

    let (response_mime_type, response_schema) = match &request.response_format {
        ResponseFormat::Text => (None, None),
        ResponseFormat::Json { schema } => {
            (Some("application/json".to_string()), Some(schema.clone()))
        }
    };

    let generation_config = if request.temperature.is_some()
        || request.max_tokens.is_some()
        || response_mime_type.is_some()
    {
        Some(GeminiGenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
            response_mime_type,
            response_schema,
        })
    } else {
        None
    };

    GeminiRequest {
        contents,
        system_instruction,
        tools,
        generation_config,
    }
}

fn convert_response(response: GeminiResponse) -> Result<CompletionResponse> {
    let usage = response
        .usage_metadata
        .map(|meta| TokenUsage {
            input_tokens: meta.prompt_token_count,
            output_tokens: meta.candidates_token_count,
        })
        .unwrap_or_default();

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(
            match response.prompt_feedback.and_then(|feedback| feedback.block_reason) {
                Some(reason) => LLMError::Blocked(reason),
                None => LLMError::EmptyResponse("no candidates returned".to_string()),
            },
        );
    };

    // Grounded answers are often split across several text parts.
    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    let stop_reason = match candidate.finish_reason.as_deref() {
        None | Some("STOP") => StopReason::EndTurn,
        Some("MAX_TOKENS") => StopReason::MaxTokens,
        Some("SAFETY" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII") => StopReason::Safety,
        Some(other) => {
            warn!("Unmapped finish reason: {other}");
            StopReason::Other
        }
    };

    let grounding = candidate
        .grounding_metadata
        .map(|meta| {
            meta.grounding_chunks
                .into_iter()
                .map(|chunk| {
                    let web = chunk.web.unwrap_or_default();
                    GroundingChunk {
                        uri: web.uri,
                        title: web.title,
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(CompletionResponse {
        message: Message::assistant(text),
        stop_reason,
        usage,
        grounding,
    })
}

// Gemini-specific request/response types
// These match the generateContent wire format

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl GeminiPart {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<UsageMetadata>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<WireGroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct WireGroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Debug, Default, Deserialize)]
struct WebChunk {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use mockito::Matcher;
    use serde_json::json;

    const MODEL: &str = "gemini-2.5-flash";

    fn provider_for(server: &mockito::Server) -> GeminiProvider {
        GeminiProvider::with_config(GeminiConfig::new("test-key").with_api_base(server.url()))
            .unwrap()
    }

    fn search_request() -> CompletionRequest {
        CompletionRequest::builder(MODEL)
            .system("You are a news analyst.")
            .add_message(Message::user("Analyze 2330.TW"))
            .tool(Tool::GoogleSearch)
            .build()
    }

    #[test]
    fn test_provider_creation() {
        let provider = tokio_test::assert_ok!(GeminiProvider::new("test-key"));
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(GeminiProvider::new("  ").is_err());
    }

    #[test]
    fn test_timeout_parsing() {
        assert_eq!(parse_timeout("30").unwrap(), 30);
        for raw in ["0", "-5", "soon"] {
            assert!(
                matches!(parse_timeout(raw), Err(LLMError::ConfigurationError(msg)) if msg.contains(TIMEOUT_VAR)),
                "{raw} accepted"
            );
        }
        assert_eq!(GeminiConfig::new("k").with_timeout(30).timeout_secs, 30);
    }

    #[test]
    fn test_invalid_api_base_rejected() {
        let config = GeminiConfig::new("k").with_api_base("not a url");
        assert!(matches!(
            GeminiProvider::with_config(config),
            Err(LLMError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_search_request_shape() {
        let body = serde_json::to_value(build_request(&search_request())).unwrap();

        assert_eq!(body["tools"], json!([{ "googleSearch": {} }]));
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "You are a news analyst.");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Analyze 2330.TW");
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_structured_request_shape() {
        let shape = schema::object(json!({ "summary": schema::string("s") }), vec!["summary"]);
        let request = CompletionRequest::builder(MODEL)
            .add_message(Message::user("Summarize"))
            .json_schema(shape.clone())
            .temperature(0.2)
            .build();

        let body = serde_json::to_value(build_request(&request)).unwrap();

        assert!(body.get("tools").is_none());
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"], shape);
        assert!((body["generationConfig"]["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_convert_joins_parts_and_keeps_chunk_order() {
        let wire: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] },
                "finishReason": "STOP",
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://a.example", "title": "A" } },
                        { "web": { "uri": "https://b.example" } },
                        { "retrievedContext": {} }
                    ]
                }
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 5 }
        }))
        .unwrap();

        let response = convert_response(wire).unwrap();
        assert_eq!(response.text(), "{\"a\":1}");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.usage.total(), 17);
        assert_eq!(response.grounding.len(), 3);
        assert_eq!(response.grounding[0], GroundingChunk::web("https://a.example", "A"));
        assert_eq!(response.grounding[1].title, None);
        assert_eq!(response.grounding[2], GroundingChunk::default());
    }

    #[test]
    fn test_convert_blocked_prompt() {
        let wire: GeminiResponse = serde_json::from_value(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();

        match convert_response(wire) {
            Err(LLMError::Blocked(reason)) => assert_eq!(reason, "SAFETY"),
            other => panic!("expected Blocked, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_against_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({ "tools": [{ "googleSearch": {} }] })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "candidates": [{
                        "content": { "parts": [{ "text": "```json\n{}\n```" }] },
                        "finishReason": "STOP",
                        "groundingMetadata": {
                            "groundingChunks": [{ "web": { "uri": "https://n.example", "title": "N" } }]
                        }
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let response = provider_for(&server).complete(search_request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.text(), "```json\n{}\n```");
        assert_eq!(response.grounding, vec![GroundingChunk::web("https://n.example", "N")]);
    }

    #[tokio::test]
    async fn test_status_code_mapping() {
        let mut server = mockito::Server::new_async().await;
        let provider = provider_for(&server);

        let cases = [
            (401, "auth"),
            (429, "rate"),
            (404, "model"),
            (500, "other"),
        ];

        for (status, label) in cases {
            let mock = server
                .mock("POST", "/models/gemini-2.5-flash:generateContent")
                .with_status(status)
                .with_body("boom")
                .create_async()
                .await;

            let err = provider.complete(search_request()).await.unwrap_err();
            match (label, err) {
                ("auth", LLMError::AuthenticationFailed(_))
                | ("rate", LLMError::RateLimitExceeded(_))
                | ("model", LLMError::ModelNotFound(_))
                | ("other", LLMError::RequestFailed(_)) => {}
                (label, err) => panic!("{label}: unexpected error {err:?}"),
            }

            mock.remove_async().await;
        }
    }

    #[tokio::test]
    async fn test_invalid_request_never_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let request = CompletionRequest::builder(MODEL)
            .add_message(Message::user("x"))
            .tool(Tool::GoogleSearch)
            .json_schema(schema::string("s"))
            .build();

        let err = provider_for(&server).complete(request).await.unwrap_err();
        assert!(matches!(err, LLMError::InvalidRequest(_)));
        mock.assert_async().await;
    }
}
