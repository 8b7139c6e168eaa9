//! Configuration for stock analysis runs

use crate::error::{Result, StockError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default Gemini model used by every analyst and the manager
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Language that prompts are written in and reports come back in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseLanguage {
    /// Traditional Chinese, Taiwan market conventions
    #[default]
    TraditionalChinese,
    /// English
    English,
}

impl ResponseLanguage {
    /// Pick the variant of a bilingual string
    pub fn pick<'a>(self, zh: &'a str, en: &'a str) -> &'a str {
        match self {
            Self::TraditionalChinese => zh,
            Self::English => en,
        }
    }

    /// Short language code
    pub fn code(self) -> &'static str {
        match self {
            Self::TraditionalChinese => "zh-TW",
            Self::English => "en",
        }
    }
}

impl fmt::Display for ResponseLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ResponseLanguage {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zh" | "zh-tw" | "zh_tw" | "zh-hant" | "tc" | "chinese" => Ok(Self::TraditionalChinese),
            "en" | "en-us" | "english" => Ok(Self::English),
            other => Err(StockError::Config(format!(
                "unknown response language '{other}' (expected zh or en)"
            ))),
        }
    }
}

/// Configuration for stock analysis runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockConfig {
    /// Model identifier passed to the provider
    pub model: String,

    /// Prompt and report language
    pub response_language: ResponseLanguage,

    /// Sampling temperature (provider default when unset)
    pub temperature: Option<f32>,

    /// Output token cap per task (provider default when unset)
    pub max_output_tokens: Option<u32>,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            response_language: ResponseLanguage::default(),
            temperature: None,
            max_output_tokens: None,
        }
    }
}

impl StockConfig {
    /// Create a new configuration builder
    pub fn builder() -> StockConfigBuilder {
        StockConfigBuilder::default()
    }

    /// Load from `STOCK_MODEL` and `STOCK_LANGUAGE`, defaulting unset keys
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::builder();
        if let Some(model) = agent_utils::optional_env("STOCK_MODEL") {
            builder = builder.model(model);
        }
        if let Some(language) = agent_utils::optional_env("STOCK_LANGUAGE") {
            builder = builder.response_language(language.parse()?);
        }
        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(StockError::Config("model must not be empty".to_string()));
        }

        if let Some(temperature) = self.temperature.filter(|t| !(0.0..=2.0).contains(t)) {
            return Err(StockError::Config(format!(
                "temperature must be within 0.0..=2.0, got {temperature}"
            )));
        }

        if self.max_output_tokens == Some(0) {
            return Err(StockError::Config(
                "max_output_tokens must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for StockConfig
#[derive(Debug, Default)]
pub struct StockConfigBuilder {
    model: Option<String>,
    response_language: Option<ResponseLanguage>,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
}

impl StockConfigBuilder {
    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the response language
    pub fn response_language(mut self, language: ResponseLanguage) -> Self {
        self.response_language = Some(language);
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the output token cap
    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<StockConfig> {
        let defaults = StockConfig::default();

        let config = StockConfig {
            model: self.model.unwrap_or(defaults.model),
            response_language: self.response_language.unwrap_or(defaults.response_language),
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StockConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.response_language, ResponseLanguage::TraditionalChinese);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = StockConfig::builder()
            .model("gemini-2.5-pro")
            .response_language(ResponseLanguage::English)
            .temperature(0.3)
            .max_output_tokens(4096)
            .build()
            .unwrap();

        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.response_language, ResponseLanguage::English);
        assert_eq!(config.max_output_tokens, Some(4096));
    }

    #[test]
    fn test_validation_failures() {
        assert!(StockConfig::builder().model("  ").build().is_err());
        assert!(StockConfig::builder().temperature(3.5).build().is_err());
        assert!(StockConfig::builder().max_output_tokens(0).build().is_err());
    }

    #[test]
    fn test_parse_language() {
        assert_eq!("en".parse::<ResponseLanguage>().unwrap(), ResponseLanguage::English);
        assert_eq!(
            "zh-TW".parse::<ResponseLanguage>().unwrap(),
            ResponseLanguage::TraditionalChinese
        );
        assert!(matches!(
            "fr".parse::<ResponseLanguage>(),
            Err(StockError::Config(_))
        ));
    }

    #[test]
    fn test_pick() {
        assert_eq!(ResponseLanguage::English.pick("中", "en"), "en");
        assert_eq!(ResponseLanguage::TraditionalChinese.pick("中", "en"), "中");
    }
}
