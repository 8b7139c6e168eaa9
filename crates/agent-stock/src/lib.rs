//! Multi-agent stock analysis
//!
//! A ticker is fanned out to five independent, search-grounded analysts:
//!
//! - fundamental: financial health and key metrics
//! - sentiment: social media mood and the PSY indicator
//! - news: recent headlines and macro impact
//! - technical: price, volume, moving averages, RSI and KD
//! - chip: shareholding distribution between major holders and retail
//!
//! Failures are isolated per analyst. Whatever succeeded is handed to a
//! portfolio manager that produces a summary and a 0-99 score. Citations
//! from every analyst are merged into one deduplicated source list, and
//! status changes are pushed to a [`ProgressReporter`] as the run advances.
//!
//! # Example
//!
//! ```rust,no_run
//! use agent_llm::providers::GeminiProvider;
//! use agent_stock::{StatusBoard, StockAnalysisEngine, StockConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let provider = Arc::new(GeminiProvider::from_env()?);
//!     let engine = StockAnalysisEngine::new(provider, StockConfig::from_env()?);
//!
//!     let board = StatusBoard::new();
//!     let result = engine.run_analysis("2330.TW", &board).await?;
//!
//!     println!("{}: {}", result.ticker(), result.manager_report().final_score);
//!     println!("{:?}", board.snapshot());
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod config;
pub mod engine;
pub mod error;
pub mod prompts;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use agents::{
    ChipAnalysis, FundamentalAnalysis, ManagerReport, NewsAnalysis, PsyAnalysis, ScoreBand,
    SentimentAnalysis, TechnicalAnalysis,
};
pub use config::{ResponseLanguage, StockConfig};
pub use engine::{
    AgentKind, AgentStatus, AnalysisStatusMap, GroundingSource, NoopReporter, ProgressReporter,
    RunId, StatusBoard, StatusUpdate, StockAnalysisEngine, StockAnalysisResult,
};
pub use error::{Result, StockError, TaskError};
