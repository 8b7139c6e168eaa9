//! Stock analysis agents
//!
//! Five independent analysts each produce one typed report from a
//! search-grounded task. The manager then synthesizes whichever reports
//! arrived into a [`ManagerReport`].

pub mod chip;
pub mod fundamental;
pub mod manager;
pub mod news;
pub mod sentiment;
pub mod task;
pub mod technical;

pub use chip::{ChipAnalysis, ChipAnalyst};
pub use fundamental::{FundamentalAnalysis, FundamentalAnalyst};
pub use manager::{AnalystReports, ManagerReport, ScoreBand};
pub use news::{NewsAnalysis, NewsAnalyst};
pub use sentiment::{PsyAnalysis, SentimentAnalysis, SentimentAnalyst};
pub use task::{AnalysisTask, TaskMode, TaskOutput, TaskRunner};
pub use technical::{ClosingPriceAnalysis, IndicatorAnalysis, TechnicalAnalysis, TechnicalAnalyst};

use crate::config::ResponseLanguage;
use crate::engine::AgentKind;
use crate::prompts;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// One of the five independent, search-grounded analysts
pub trait Analyst {
    /// Which agent this is
    const KIND: AgentKind;

    /// Report produced on success
    type Report: Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Output shape, with field descriptions in `lang`
    fn schema(lang: ResponseLanguage) -> Value;

    /// Task for analyzing `ticker`
    fn task(ticker: &str, lang: ResponseLanguage) -> Result<AnalysisTask, minijinja::Error> {
        Ok(AnalysisTask::search(
            Self::KIND,
            prompts::system_prompt(Self::KIND, lang),
            prompts::analyst_prompt(Self::KIND, ticker, lang)?,
            Self::schema(lang),
        ))
    }
}
