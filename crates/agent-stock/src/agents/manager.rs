//! Portfolio manager synthesis
//!
//! The manager reads whichever analyst reports arrived, scores each one,
//! combines the scores with fixed weights (technical 60%, the other four
//! 10% each, renormalized over the reports present) and writes a summary.
//! The arithmetic is delegated to the model through the prompt.

use super::task::AnalysisTask;
use super::{ChipAnalysis, FundamentalAnalysis, NewsAnalysis, SentimentAnalysis, TechnicalAnalysis};
use crate::config::ResponseLanguage;
use crate::engine::AgentKind;
use crate::prompts;
use agent_llm::schema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

/// Highest score a report may carry
pub const MAX_SCORE: u8 = 99;

/// Score used when no synthesis could be produced
pub const FALLBACK_SCORE: u8 = 50;

/// Final verdict over all analyst reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerReport {
    pub summary: String,
    /// 0 is a strong sell, 99 a strong buy
    pub final_score: u8,
}

impl ManagerReport {
    /// Report used when the manager is skipped or fails
    pub fn fallback(lang: ResponseLanguage) -> Self {
        Self {
            summary: prompts::fallback_summary(lang).to_string(),
            final_score: FALLBACK_SCORE,
        }
    }

    /// Build from the model's verdict, clamping the score into `0..=99`
    pub(crate) fn from_verdict(verdict: ManagerVerdict) -> Self {
        let rounded = verdict.final_score.round();
        let final_score = rounded.clamp(0.0, f64::from(MAX_SCORE)) as u8;
        if rounded != f64::from(final_score) {
            warn!(
                reported = verdict.final_score,
                clamped = final_score,
                "manager score out of range"
            );
        }
        Self {
            summary: verdict.summary,
            final_score,
        }
    }

    /// Rating band for the score
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.final_score)
    }
}

/// What the manager task decodes to before range checking
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ManagerVerdict {
    pub summary: String,
    pub final_score: f64,
}

/// Rating derived from a final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    StrongSell,
    Sell,
    Neutral,
    Buy,
    StrongBuy,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score.min(MAX_SCORE) {
            0..20 => ScoreBand::StrongSell,
            20..40 => ScoreBand::Sell,
            40..60 => ScoreBand::Neutral,
            60..80 => ScoreBand::Buy,
            _ => ScoreBand::StrongBuy,
        }
    }

    pub fn label(self, lang: ResponseLanguage) -> &'static str {
        match self {
            ScoreBand::StrongSell => lang.pick("強力賣出", "Strong Sell"),
            ScoreBand::Sell => lang.pick("賣出", "Sell"),
            ScoreBand::Neutral => lang.pick("中立", "Neutral"),
            ScoreBand::Buy => lang.pick("買進", "Buy"),
            ScoreBand::StrongBuy => lang.pick("強力買進", "Strong Buy"),
        }
    }
}

/// Analyst reports handed to the manager; `None` marks a failed analyst
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalystReports<'a> {
    pub fundamental: Option<&'a FundamentalAnalysis>,
    pub sentiment: Option<&'a SentimentAnalysis>,
    pub news: Option<&'a NewsAnalysis>,
    pub technical: Option<&'a TechnicalAnalysis>,
    pub chip: Option<&'a ChipAnalysis>,
}

impl AnalystReports<'_> {
    /// Number of reports present
    pub fn present(&self) -> usize {
        [
            self.fundamental.is_some(),
            self.sentiment.is_some(),
            self.news.is_some(),
            self.technical.is_some(),
            self.chip.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    fn pretty(&self) -> Result<Vec<(AgentKind, Option<String>)>, serde_json::Error> {
        fn render<T: Serialize>(report: Option<&T>) -> Result<Option<String>, serde_json::Error> {
            report.map(serde_json::to_string_pretty).transpose()
        }

        Ok(vec![
            (AgentKind::Fundamental, render(self.fundamental)?),
            (AgentKind::Sentiment, render(self.sentiment)?),
            (AgentKind::News, render(self.news)?),
            (AgentKind::Technical, render(self.technical)?),
            (AgentKind::Chip, render(self.chip)?),
        ])
    }
}

/// Output shape of the manager
pub fn schema(lang: ResponseLanguage) -> Value {
    schema::object(
        json!({
            "summary": schema::string(lang.pick(
                "最終的質化投資總結與建議。",
                "Final qualitative investment summary and recommendation.",
            )),
            "finalScore": schema::integer(lang.pick(
                "一個0到99之間的綜合評分，0代表強力賣出，99代表強力買進。",
                "Overall score between 0 and 99, where 0 is a strong sell and 99 a strong buy.",
            )),
        }),
        vec!["summary", "finalScore"],
    )
}

/// Synthesis task over `reports`
pub fn task(
    ticker: &str,
    reports: &AnalystReports<'_>,
    lang: ResponseLanguage,
) -> Result<AnalysisTask, crate::error::TaskError> {
    let prompt = prompts::manager_prompt(ticker, &reports.pretty()?, lang)?;
    Ok(AnalysisTask::synthesis(
        AgentKind::Manager,
        prompts::system_prompt(AgentKind::Manager, lang),
        prompt,
        schema(lang),
    ))
}
