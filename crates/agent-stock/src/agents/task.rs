//! Remote analysis task execution
//!
//! A task is one request/response round trip against the LLM provider.
//! Two modes exist:
//!
//! - [`TaskMode::Search`]: Google Search grounding on, output unconstrained.
//!   The expected shape is embedded in the prompt and the JSON is pulled out
//!   of the reply text. Citations are collected from the grounding chunks.
//! - [`TaskMode::Synthesis`]: no tools, output constrained to the schema
//!   through the provider. No citations.
//!
//! Either way the decoded JSON is validated against the schema before it is
//! turned into the typed report.

use crate::config::StockConfig;
use crate::engine::{AgentKind, GroundingSource};
use crate::error::TaskError;
use crate::prompts;
use agent_llm::{CompletionRequest, CompletionResponse, LLMProvider, Message, Tool, schema};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

/// How a task talks to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskMode {
    /// Search-grounded, shape described in the prompt
    Search,
    /// Structured output over data already in the prompt
    Synthesis,
}

/// Everything needed to run one remote task
#[derive(Debug, Clone)]
pub struct AnalysisTask {
    pub kind: AgentKind,
    pub instructions: String,
    pub prompt: String,
    pub schema: Value,
    pub mode: TaskMode,
}

impl AnalysisTask {
    /// Search-grounded task
    pub fn search(
        kind: AgentKind,
        instructions: impl Into<String>,
        prompt: impl Into<String>,
        schema: Value,
    ) -> Self {
        Self {
            kind,
            instructions: instructions.into(),
            prompt: prompt.into(),
            schema,
            mode: TaskMode::Search,
        }
    }

    /// Structured synthesis task
    pub fn synthesis(
        kind: AgentKind,
        instructions: impl Into<String>,
        prompt: impl Into<String>,
        schema: Value,
    ) -> Self {
        Self {
            kind,
            instructions: instructions.into(),
            prompt: prompt.into(),
            schema,
            mode: TaskMode::Synthesis,
        }
    }
}

/// Decoded report plus the sources it was grounded on
#[derive(Debug, Clone)]
pub struct TaskOutput<T> {
    pub value: T,
    pub sources: Vec<GroundingSource>,
}

/// Runs [`AnalysisTask`]s against a provider
pub struct TaskRunner<'a> {
    provider: &'a dyn LLMProvider,
    config: &'a StockConfig,
}

impl<'a> TaskRunner<'a> {
    pub fn new(provider: &'a dyn LLMProvider, config: &'a StockConfig) -> Self {
        Self { provider, config }
    }

    /// Run `task` once and decode the reply into `T`
    #[instrument(skip(self, task), fields(agent = %task.kind, mode = ?task.mode))]
    pub async fn execute<T: DeserializeOwned>(
        &self,
        task: &AnalysisTask,
    ) -> Result<TaskOutput<T>, TaskError> {
        let request = self.build_request(task)?;
        let response = self.provider.complete(request).await?;

        debug!(
            tokens = response.usage.total(),
            chunks = response.grounding.len(),
            "task response received"
        );

        match task.mode {
            TaskMode::Search => {
                let json = extract_json(response.text())?;
                let value = decode(json, &task.schema)?;
                Ok(TaskOutput {
                    value,
                    sources: collect_sources(&response),
                })
            }
            TaskMode::Synthesis => {
                if response.message.is_blank() {
                    return Err(TaskError::EmptyResponse);
                }
                let value = decode(response.text().trim(), &task.schema)?;
                Ok(TaskOutput {
                    value,
                    sources: Vec::new(),
                })
            }
        }
    }

    fn build_request(&self, task: &AnalysisTask) -> Result<CompletionRequest, TaskError> {
        let lang = self.config.response_language;

        let mut builder = CompletionRequest::builder(&self.config.model).system(&task.instructions);
        if let Some(temperature) = self.config.temperature {
            builder = builder.temperature(temperature);
        }
        if let Some(max_tokens) = self.config.max_output_tokens {
            builder = builder.max_tokens(max_tokens);
        }

        let builder = match task.mode {
            TaskMode::Search => builder
                .add_message(Message::user(prompts::search_prompt(
                    &task.prompt,
                    &task.schema,
                    lang,
                )?))
                .tool(Tool::GoogleSearch),
            TaskMode::Synthesis => builder
                .add_message(Message::user(&task.prompt))
                .json_schema(task.schema.clone()),
        };

        Ok(builder.build())
    }
}

/// Pull the JSON document out of a search reply
///
/// The model is asked for bare JSON but sometimes wraps it in a
/// ```` ```json ```` fence; the first fenced block wins when present.
pub fn extract_json(text: &str) -> Result<&str, TaskError> {
    let fence = Regex::new(r"```json\n([\s\S]*?)\n```")?;
    let json = fence
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or(text, |m| m.as_str());
    Ok(json.trim())
}

fn decode<T: DeserializeOwned>(text: &str, shape: &Value) -> Result<T, TaskError> {
    let value: Value = serde_json::from_str(text)?;
    schema::validate(shape, &value)?;
    Ok(serde_json::from_value(value)?)
}

fn collect_sources(response: &CompletionResponse) -> Vec<GroundingSource> {
    response
        .grounding
        .iter()
        .filter_map(GroundingSource::from_chunk)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Script, ScriptedProvider};
    use agent_llm::{GroundingChunk, ResponseFormat};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Verdict {
        trend: String,
    }

    fn shape() -> Value {
        schema::object(json!({ "trend": schema::string("Trend") }), vec!["trend"])
    }

    fn search_task() -> AnalysisTask {
        AnalysisTask::search(AgentKind::Chip, "chip instructions", "Analyze 2330.TW", shape())
    }

    #[test]
    fn test_extract_fenced_json() {
        let text = "Here you go:\n```json\n{\"trend\": \"up\"}\n```\nDone.";
        assert_eq!(extract_json(text).unwrap(), "{\"trend\": \"up\"}");
    }

    #[test]
    fn test_extract_bare_json_is_trimmed() {
        assert_eq!(extract_json("  {\"trend\": \"up\"}\n").unwrap(), "{\"trend\": \"up\"}");
    }

    #[test]
    fn test_extract_takes_first_fence() {
        let text = "```json\n{\"a\":1}\n```\n```json\n{\"a\":2}\n```";
        assert_eq!(extract_json(text).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_search_request_shape() {
        let config = StockConfig::default();
        let provider = ScriptedProvider::new(config.response_language);
        let runner = TaskRunner::new(&provider, &config);

        let request = runner.build_request(&search_task()).unwrap();
        assert!(request.uses_search());
        assert_eq!(request.response_format, ResponseFormat::Text);
        assert_eq!(request.system.as_deref(), Some("chip instructions"));
        assert!(request.messages[0].text().contains("```json"));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_synthesis_request_shape() {
        let config = StockConfig::builder().temperature(0.2).build().unwrap();
        let provider = ScriptedProvider::new(config.response_language);
        let runner = TaskRunner::new(&provider, &config);
        let task = AnalysisTask::synthesis(AgentKind::Manager, "m", "reports", shape());

        let request = runner.build_request(&task).unwrap();
        assert!(request.tools.is_empty());
        assert_eq!(request.response_format, ResponseFormat::Json { schema: shape() });
        assert_eq!(request.messages[0].text(), "reports");
        assert_eq!(request.temperature, Some(0.2));
    }

    #[tokio::test]
    async fn test_search_task_filters_sources() {
        let config = StockConfig::default();
        let provider = ScriptedProvider::new(config.response_language).with_system(
            "chip instructions",
            Script::reply_with_sources(
                "```json\n{\"trend\": \"concentrating\"}\n```",
                vec![
                    GroundingChunk::web("https://a", "A"),
                    GroundingChunk {
                        uri: Some("https://no-title".to_string()),
                        title: None,
                    },
                ],
            ),
        );
        let runner = TaskRunner::new(&provider, &config);

        let output: TaskOutput<Verdict> = runner.execute(&search_task()).await.unwrap();
        assert_eq!(output.value.trend, "concentrating");
        assert_eq!(output.sources, vec![GroundingSource::new("https://a", "A")]);
    }

    #[tokio::test]
    async fn test_shape_mismatch_is_schema_violation() {
        let config = StockConfig::default();
        let provider = ScriptedProvider::new(config.response_language)
            .with_system("chip instructions", Script::reply("{\"direction\": \"up\"}"));
        let runner = TaskRunner::new(&provider, &config);

        let err = runner.execute::<Verdict>(&search_task()).await.unwrap_err();
        assert!(matches!(err, TaskError::SchemaViolation(_)));
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_decode_error() {
        let config = StockConfig::default();
        let provider = ScriptedProvider::new(config.response_language)
            .with_system("chip instructions", Script::reply("I could not find data."));
        let runner = TaskRunner::new(&provider, &config);

        let err = runner.execute::<Verdict>(&search_task()).await.unwrap_err();
        assert!(matches!(err, TaskError::Decode(_)));
    }

    #[tokio::test]
    async fn test_empty_synthesis_reply_fails() {
        let config = StockConfig::default();
        let provider =
            ScriptedProvider::new(config.response_language).with_system("m", Script::reply("  "));
        let runner = TaskRunner::new(&provider, &config);
        let task = AnalysisTask::synthesis(AgentKind::Manager, "m", "reports", shape());

        let err = runner.execute::<Verdict>(&task).await.unwrap_err();
        assert!(matches!(err, TaskError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let config = StockConfig::default();
        let provider = ScriptedProvider::new(config.response_language)
            .with_system("chip instructions", Script::fail());
        let runner = TaskRunner::new(&provider, &config);

        let err = runner.execute::<Verdict>(&search_task()).await.unwrap_err();
        assert!(matches!(err, TaskError::Llm(_)));
    }
}
