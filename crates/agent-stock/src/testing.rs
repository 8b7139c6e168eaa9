//! In-process provider fake for engine and task tests

use crate::config::ResponseLanguage;
use crate::engine::AgentKind;
use crate::prompts;
use agent_llm::{
    CompletionRequest, CompletionResponse, GroundingChunk, LLMError, LLMProvider, Message,
    Result, StopReason, TokenUsage,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Canned behavior for one system instruction
#[derive(Debug, Clone)]
pub(crate) struct Script {
    outcome: std::result::Result<(String, Vec<GroundingChunk>), String>,
    delay: Duration,
}

impl Script {
    pub(crate) fn reply(text: impl Into<String>) -> Self {
        Self::reply_with_sources(text, Vec::new())
    }

    pub(crate) fn reply_with_sources(text: impl Into<String>, chunks: Vec<GroundingChunk>) -> Self {
        Self {
            outcome: Ok((text.into(), chunks)),
            delay: Duration::ZERO,
        }
    }

    pub(crate) fn fail() -> Self {
        Self {
            outcome: Err("scripted failure".to_string()),
            delay: Duration::ZERO,
        }
    }

    /// Settle only after `ms` milliseconds
    pub(crate) fn after_ms(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }
}

/// Provider answering from scripts keyed by system instruction
///
/// Requests with an unscripted instruction fail.
pub(crate) struct ScriptedProvider {
    lang: ResponseLanguage,
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub(crate) fn new(lang: ResponseLanguage) -> Self {
        Self {
            lang,
            scripts: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_system(mut self, system: &str, script: Script) -> Self {
        self.scripts.insert(system.to_string(), script);
        self
    }

    pub(crate) fn with_agent(self, kind: AgentKind, script: Script) -> Self {
        let system = prompts::system_prompt(kind, self.lang);
        self.with_system(system, script)
    }

    /// Every request received so far
    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Requests made by `kind`
    pub(crate) fn calls_for(&self, kind: AgentKind) -> usize {
        let system = prompts::system_prompt(kind, self.lang);
        self.requests()
            .iter()
            .filter(|r| r.system.as_deref() == Some(system))
            .count()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        request.validate()?;
        self.calls.lock().unwrap().push(request.clone());

        let script = request
            .system
            .as_deref()
            .and_then(|system| self.scripts.get(system))
            .cloned()
            .unwrap_or_else(Script::fail);

        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }

        let (text, grounding) = script.outcome.map_err(LLMError::RequestFailed)?;
        Ok(CompletionResponse {
            message: Message::assistant(text),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
            grounding,
        })
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
