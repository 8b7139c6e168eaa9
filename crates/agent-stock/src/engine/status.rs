//! Per-run agent status model
//!
//! Every run tracks six agents. Each starts `Pending`, moves to `Working`
//! and settles as `Done` or `Error`; nothing moves backwards within a run.

use crate::config::ResponseLanguage;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The fixed set of agents taking part in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Fundamental,
    Sentiment,
    News,
    Technical,
    Chip,
    Manager,
}

impl AgentKind {
    /// All agents, in processing order
    pub const ALL: [AgentKind; 6] = [
        AgentKind::Fundamental,
        AgentKind::Sentiment,
        AgentKind::News,
        AgentKind::Technical,
        AgentKind::Chip,
        AgentKind::Manager,
    ];

    /// The five independent analysts, in processing order
    pub const ANALYSTS: [AgentKind; 5] = [
        AgentKind::Fundamental,
        AgentKind::Sentiment,
        AgentKind::News,
        AgentKind::Technical,
        AgentKind::Chip,
    ];

    /// Stable lowercase identifier
    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Fundamental => "fundamental",
            AgentKind::Sentiment => "sentiment",
            AgentKind::News => "news",
            AgentKind::Technical => "technical",
            AgentKind::Chip => "chip",
            AgentKind::Manager => "manager",
        }
    }

    /// Human-readable role name
    pub fn label(self, lang: ResponseLanguage) -> &'static str {
        match self {
            AgentKind::Fundamental => lang.pick("基本面分析師", "Fundamental Analyst"),
            AgentKind::Sentiment => lang.pick("市場情緒分析師", "Sentiment Analyst"),
            AgentKind::News => lang.pick("新聞分析師", "News Analyst"),
            AgentKind::Technical => lang.pick("技術分析師", "Technical Analyst"),
            AgentKind::Chip => lang.pick("籌碼分析師", "Chip Analyst"),
            AgentKind::Manager => lang.pick("投資組合經理", "Portfolio Manager"),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of one agent within a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentStatus {
    #[default]
    Pending,
    Working,
    Done,
    Error,
}

impl AgentStatus {
    fn rank(self) -> u8 {
        match self {
            AgentStatus::Pending => 0,
            AgentStatus::Working => 1,
            AgentStatus::Done | AgentStatus::Error => 2,
        }
    }

    /// `Done` or `Error`
    pub fn is_terminal(self) -> bool {
        self.rank() == 2
    }

    /// Whether moving from `self` to `next` keeps the run monotonic
    ///
    /// Re-applying the current state is allowed. Skipping `Working` is allowed
    /// since a settled agent may be reported without an intermediate update.
    pub fn can_transition_to(self, next: AgentStatus) -> bool {
        self == next || next.rank() > self.rank()
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgentStatus::Pending => "PENDING",
            AgentStatus::Working => "WORKING",
            AgentStatus::Done => "DONE",
            AgentStatus::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Status of every agent in a run
///
/// One field per agent, so a map can never be missing a key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisStatusMap {
    pub fundamental: AgentStatus,
    pub sentiment: AgentStatus,
    pub news: AgentStatus,
    pub technical: AgentStatus,
    pub chip: AgentStatus,
    pub manager: AgentStatus,
}

impl AnalysisStatusMap {
    /// All agents pending
    pub fn new() -> Self {
        Self::default()
    }

    /// Status of one agent
    pub fn get(&self, kind: AgentKind) -> AgentStatus {
        match kind {
            AgentKind::Fundamental => self.fundamental,
            AgentKind::Sentiment => self.sentiment,
            AgentKind::News => self.news,
            AgentKind::Technical => self.technical,
            AgentKind::Chip => self.chip,
            AgentKind::Manager => self.manager,
        }
    }

    fn slot(&mut self, kind: AgentKind) -> &mut AgentStatus {
        match kind {
            AgentKind::Fundamental => &mut self.fundamental,
            AgentKind::Sentiment => &mut self.sentiment,
            AgentKind::News => &mut self.news,
            AgentKind::Technical => &mut self.technical,
            AgentKind::Chip => &mut self.chip,
            AgentKind::Manager => &mut self.manager,
        }
    }

    /// Move one agent to `next`
    ///
    /// Returns `false` and leaves the map untouched if the move would go
    /// backwards.
    pub fn transition(&mut self, kind: AgentKind, next: AgentStatus) -> bool {
        let slot = self.slot(kind);
        if slot.can_transition_to(next) {
            *slot = next;
            true
        } else {
            false
        }
    }

    /// `(kind, status)` pairs in processing order
    pub fn iter(&self) -> impl Iterator<Item = (AgentKind, AgentStatus)> + '_ {
        AgentKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }

    /// Every agent has settled
    pub fn is_settled(&self) -> bool {
        self.iter().all(|(_, status)| status.is_terminal())
    }
}

/// Identity of one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// Fresh random run id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A partial status change pushed to progress reporters
///
/// Only the agents that changed are listed. Subscribers merge updates into
/// their own view (see [`StatusBoard`](super::StatusBoard)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Run this update belongs to
    pub run_id: RunId,
    /// Changed agents with their new status
    pub changes: Vec<(AgentKind, AgentStatus)>,
}

impl StatusUpdate {
    /// Update for a single agent
    pub fn single(run_id: RunId, kind: AgentKind, status: AgentStatus) -> Self {
        Self {
            run_id,
            changes: vec![(kind, status)],
        }
    }

    /// New status for `kind`, if this update mentions it
    pub fn status_of(&self, kind: AgentKind) -> Option<AgentStatus> {
        self.changes
            .iter()
            .find(|(changed, _)| *changed == kind)
            .map(|(_, status)| *status)
    }
}
