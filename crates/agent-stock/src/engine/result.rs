//! Analysis result types

use super::sources::GroundingSource;
use super::status::{AgentKind, RunId};
use crate::agents::{
    ChipAnalysis, FundamentalAnalysis, ManagerReport, NewsAnalysis, SentimentAnalysis,
    TechnicalAnalysis,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything one run produced
///
/// An analyst that failed is `None` (serialized as `null`). The manager
/// report is always present, falling back to a neutral placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAnalysisResult {
    ticker: String,
    run_id: RunId,
    fundamental: Option<FundamentalAnalysis>,
    sentiment: Option<SentimentAnalysis>,
    news: Option<NewsAnalysis>,
    technical: Option<TechnicalAnalysis>,
    chip: Option<ChipAnalysis>,
    manager_report: ManagerReport,
    sources: Vec<GroundingSource>,
    analyzed_at: DateTime<Utc>,
}

/// Inputs for [`StockAnalysisResult::new`]
#[derive(Debug, Clone)]
pub(crate) struct ResultParts {
    pub ticker: String,
    pub run_id: RunId,
    pub fundamental: Option<FundamentalAnalysis>,
    pub sentiment: Option<SentimentAnalysis>,
    pub news: Option<NewsAnalysis>,
    pub technical: Option<TechnicalAnalysis>,
    pub chip: Option<ChipAnalysis>,
    pub manager_report: ManagerReport,
    pub sources: Vec<GroundingSource>,
}

impl StockAnalysisResult {
    pub(crate) fn new(parts: ResultParts) -> Self {
        Self {
            ticker: parts.ticker,
            run_id: parts.run_id,
            fundamental: parts.fundamental,
            sentiment: parts.sentiment,
            news: parts.news,
            technical: parts.technical,
            chip: parts.chip,
            manager_report: parts.manager_report,
            sources: parts.sources,
            analyzed_at: Utc::now(),
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn fundamental(&self) -> Option<&FundamentalAnalysis> {
        self.fundamental.as_ref()
    }

    pub fn sentiment(&self) -> Option<&SentimentAnalysis> {
        self.sentiment.as_ref()
    }

    pub fn news(&self) -> Option<&NewsAnalysis> {
        self.news.as_ref()
    }

    pub fn technical(&self) -> Option<&TechnicalAnalysis> {
        self.technical.as_ref()
    }

    pub fn chip(&self) -> Option<&ChipAnalysis> {
        self.chip.as_ref()
    }

    pub fn manager_report(&self) -> &ManagerReport {
        &self.manager_report
    }

    /// Deduplicated sources across all successful analysts
    pub fn sources(&self) -> &[GroundingSource] {
        &self.sources
    }

    pub fn analyzed_at(&self) -> DateTime<Utc> {
        self.analyzed_at
    }

    /// Whether the analyst `kind` produced a report
    ///
    /// Always `true` for the manager, whose report falls back rather than
    /// going missing.
    pub fn has_report(&self, kind: AgentKind) -> bool {
        match kind {
            AgentKind::Fundamental => self.fundamental.is_some(),
            AgentKind::Sentiment => self.sentiment.is_some(),
            AgentKind::News => self.news.is_some(),
            AgentKind::Technical => self.technical.is_some(),
            AgentKind::Chip => self.chip.is_some(),
            AgentKind::Manager => true,
        }
    }

    /// Number of analysts that produced a report
    pub fn reports_present(&self) -> usize {
        AgentKind::ANALYSTS
            .into_iter()
            .filter(|kind| self.has_report(*kind))
            .count()
    }
}
