//! Stock Analysis Engine - fans a ticker out to five analysts and a manager
//!
//! One run goes through these steps:
//!
//! 1. all six agents start `PENDING`
//! 2. the five analysts move to `WORKING` in a single update
//! 3. the analysts run concurrently; the engine waits for every one of them
//!    to settle, so one failure never cancels the others
//! 4. outcomes are processed in fixed order (fundamental, sentiment, news,
//!    technical, chip), each reported `DONE` or `ERROR`
//! 5. the manager moves to `WORKING` and, if at least one report arrived,
//!    synthesizes them; otherwise it is reported `ERROR` straight away
//! 6. sources are deduplicated and the result returned
//!
//! Once the ticker is accepted the run always produces a result.

use super::progress::ProgressReporter;
use super::result::{ResultParts, StockAnalysisResult};
use super::sources::{GroundingSource, dedupe};
use super::status::{AgentKind, AgentStatus, AnalysisStatusMap, RunId, StatusUpdate};
use crate::agents::manager::{self, ManagerVerdict};
use crate::agents::{
    AnalysisTask, Analyst, AnalystReports, ChipAnalyst, FundamentalAnalyst, ManagerReport,
    NewsAnalyst, SentimentAnalyst, TaskOutput, TaskRunner, TechnicalAnalyst,
};
use crate::config::{ResponseLanguage, StockConfig};
use crate::error::{Result, StockError, TaskError};
use agent_llm::LLMProvider;
use std::sync::Arc;
use tracing::{Instrument, debug, error, info, info_span, warn};

/// Runs analyses against one provider and configuration
///
/// Cheap to clone; every run owns its own state.
#[derive(Clone)]
pub struct StockAnalysisEngine {
    provider: Arc<dyn LLMProvider>,
    config: Arc<StockConfig>,
}

impl StockAnalysisEngine {
    pub fn new(provider: Arc<dyn LLMProvider>, config: StockConfig) -> Self {
        Self {
            provider,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &StockConfig {
        &self.config
    }

    /// Analyze `ticker`, pushing status changes into `progress`
    ///
    /// Fails only if the ticker is blank, before any update is sent, or if
    /// the analyst prompts cannot be rendered.
    pub async fn run_analysis(
        &self,
        ticker: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<StockAnalysisResult> {
        self.run_analysis_as(RunId::new(), ticker, progress).await
    }

    /// Same as [`run_analysis`](Self::run_analysis) under a caller-chosen run id
    pub async fn run_analysis_as(
        &self,
        run_id: RunId,
        ticker: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<StockAnalysisResult> {
        let ticker = normalize_ticker(ticker)?;
        let span = info_span!("analysis", ticker = %ticker, run_id = %run_id);
        self.run(run_id, ticker, progress).instrument(span).await
    }

    async fn run(
        &self,
        run_id: RunId,
        ticker: String,
        progress: &dyn ProgressReporter,
    ) -> Result<StockAnalysisResult> {
        let lang = self.config.response_language;
        let runner = TaskRunner::new(self.provider.as_ref(), &self.config);

        let fundamental_task = FundamentalAnalyst::task(&ticker, lang)?;
        let sentiment_task = SentimentAnalyst::task(&ticker, lang)?;
        let news_task = NewsAnalyst::task(&ticker, lang)?;
        let technical_task = TechnicalAnalyst::task(&ticker, lang)?;
        let chip_task = ChipAnalyst::task(&ticker, lang)?;

        let mut tracker = RunTracker::new(run_id, progress);
        tracker.set_all(&AgentKind::ANALYSTS, AgentStatus::Working);
        info!("dispatching analysts");

        let (fundamental, sentiment, news, technical, chip) = tokio::join!(
            run_analyst::<FundamentalAnalyst>(&runner, &fundamental_task),
            run_analyst::<SentimentAnalyst>(&runner, &sentiment_task),
            run_analyst::<NewsAnalyst>(&runner, &news_task),
            run_analyst::<TechnicalAnalyst>(&runner, &technical_task),
            run_analyst::<ChipAnalyst>(&runner, &chip_task),
        );

        let mut sources = Vec::new();
        let fundamental = tracker.settle(AgentKind::Fundamental, fundamental, &mut sources);
        let sentiment = tracker.settle(AgentKind::Sentiment, sentiment, &mut sources);
        let news = tracker.settle(AgentKind::News, news, &mut sources);
        let technical = tracker.settle(AgentKind::Technical, technical, &mut sources);
        let chip = tracker.settle(AgentKind::Chip, chip, &mut sources);

        let reports = AnalystReports {
            fundamental: fundamental.as_ref(),
            sentiment: sentiment.as_ref(),
            news: news.as_ref(),
            technical: technical.as_ref(),
            chip: chip.as_ref(),
        };

        tracker.set(AgentKind::Manager, AgentStatus::Working);
        let manager_report = if reports.present() == 0 {
            warn!("no analyst reports, skipping manager");
            tracker.set(AgentKind::Manager, AgentStatus::Error);
            ManagerReport::fallback(lang)
        } else {
            match run_manager(&runner, &ticker, &reports, lang).await {
                Ok(report) => {
                    tracker.set(AgentKind::Manager, AgentStatus::Done);
                    report
                }
                Err(err) => {
                    error!(error = %err, "manager synthesis failed, using fallback report");
                    tracker.set(AgentKind::Manager, AgentStatus::Error);
                    ManagerReport::fallback(lang)
                }
            }
        };

        let sources = dedupe(sources);
        info!(
            reports = reports.present(),
            score = manager_report.final_score,
            sources = sources.len(),
            "analysis complete"
        );
        debug!(status = ?tracker.status, "final status");

        Ok(StockAnalysisResult::new(ResultParts {
            ticker,
            run_id,
            fundamental,
            sentiment,
            news,
            technical,
            chip,
            manager_report,
            sources,
        }))
    }
}

/// Trim the ticker, rejecting blank input
fn normalize_ticker(ticker: &str) -> Result<String> {
    let ticker = ticker.trim();
    if ticker.is_empty() {
        return Err(StockError::Validation("ticker must not be empty".to_string()));
    }
    Ok(ticker.to_string())
}

async fn run_analyst<A: Analyst>(
    runner: &TaskRunner<'_>,
    task: &AnalysisTask,
) -> std::result::Result<TaskOutput<A::Report>, TaskError> {
    runner.execute::<A::Report>(task).await
}

async fn run_manager(
    runner: &TaskRunner<'_>,
    ticker: &str,
    reports: &AnalystReports<'_>,
    lang: ResponseLanguage,
) -> Result<ManagerReport> {
    let task = manager::task(ticker, reports, lang).map_err(StockError::ManagerTask)?;
    let output: TaskOutput<ManagerVerdict> = runner
        .execute(&task)
        .await
        .map_err(StockError::ManagerTask)?;
    Ok(ManagerReport::from_verdict(output.value))
}

/// Status map of one run plus the reporter it is mirrored to
struct RunTracker<'a> {
    run_id: RunId,
    status: AnalysisStatusMap,
    progress: &'a dyn ProgressReporter,
}

impl<'a> RunTracker<'a> {
    fn new(run_id: RunId, progress: &'a dyn ProgressReporter) -> Self {
        Self {
            run_id,
            status: AnalysisStatusMap::new(),
            progress,
        }
    }

    fn set(&mut self, kind: AgentKind, status: AgentStatus) {
        self.set_all(&[kind], status);
    }

    /// Move `kinds` to `status` and emit them as one update
    fn set_all(&mut self, kinds: &[AgentKind], status: AgentStatus) {
        let changes: Vec<_> = kinds
            .iter()
            .filter(|kind| self.status.transition(**kind, status))
            .map(|kind| (*kind, status))
            .collect();

        if !changes.is_empty() {
            self.progress.report(StatusUpdate {
                run_id: self.run_id,
                changes,
            });
        }
    }

    /// Record one analyst outcome, keeping its sources on success
    fn settle<T>(
        &mut self,
        kind: AgentKind,
        outcome: std::result::Result<TaskOutput<T>, TaskError>,
        sources: &mut Vec<GroundingSource>,
    ) -> Option<T> {
        match outcome {
            Ok(output) => {
                debug!(agent = %kind, sources = output.sources.len(), "analyst done");
                sources.extend(output.sources);
                self.set(kind, AgentStatus::Done);
                Some(output.value)
            }
            Err(source) => {
                let transient = source.is_transient();
                let err = StockError::remote(kind, source);
                warn!(agent = %kind, transient, error = %err, "analyst failed");
                self.set(kind, AgentStatus::Error);
                None
            }
        }
    }
}
