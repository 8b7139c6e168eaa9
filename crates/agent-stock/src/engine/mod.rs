//! Stock Analysis Engine
//!
//! Core coordination layer for multi-agent stock analysis

pub mod analysis_engine;
pub mod progress;
pub mod result;
pub mod sources;
pub mod status;

pub use analysis_engine::StockAnalysisEngine;
pub use progress::{NoopReporter, ProgressReporter, StatusBoard};
pub use result::StockAnalysisResult;
pub use sources::{GroundingSource, dedupe};
pub use status::{AgentKind, AgentStatus, AnalysisStatusMap, RunId, StatusUpdate};
