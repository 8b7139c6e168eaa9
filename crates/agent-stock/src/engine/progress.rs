//! Progress reporting
//!
//! The engine pushes [`StatusUpdate`]s into a [`ProgressReporter`] and never
//! waits on it. Merging partial updates into a full view is the
//! subscriber's job; [`StatusBoard`] is a ready-made one.

use super::status::{AgentStatus, AnalysisStatusMap, RunId, StatusUpdate};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, trace, warn};

/// Sink for status updates
pub trait ProgressReporter: Send + Sync {
    /// Receive one update. Must not block.
    fn report(&self, update: StatusUpdate);
}

impl<F> ProgressReporter for F
where
    F: Fn(StatusUpdate) + Send + Sync,
{
    fn report(&self, update: StatusUpdate) {
        self(update);
    }
}

impl ProgressReporter for UnboundedSender<StatusUpdate> {
    fn report(&self, update: StatusUpdate) {
        if self.send(update).is_err() {
            trace!("progress receiver dropped, update discarded");
        }
    }
}

/// Reporter that discards every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _update: StatusUpdate) {}
}

#[derive(Debug, Default)]
struct BoardState {
    run_id: Option<RunId>,
    current: AnalysisStatusMap,
}

/// Merged status view for one run
///
/// The board binds to a single run: either explicitly through
/// [`StatusBoard::for_run`] or to the first run it hears from. Updates from
/// other runs are ignored, as are changes that would move an agent
/// backwards.
#[derive(Debug, Default)]
pub struct StatusBoard {
    state: Mutex<BoardState>,
}

impl StatusBoard {
    /// Board that binds to the first run it receives an update from
    pub fn new() -> Self {
        Self::default()
    }

    /// Board bound to `run_id`
    pub fn for_run(run_id: RunId) -> Self {
        Self {
            state: Mutex::new(BoardState {
                run_id: Some(run_id),
                ..BoardState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run the board is bound to, if any
    pub fn run_id(&self) -> Option<RunId> {
        self.lock().run_id
    }

    /// Current merged status
    pub fn snapshot(&self) -> AnalysisStatusMap {
        self.lock().current
    }

    /// Merge an update, returning whether it was accepted
    pub fn apply(&self, update: &StatusUpdate) -> bool {
        let mut state = self.lock();

        match state.run_id {
            Some(bound) if bound != update.run_id => {
                debug!(bound = %bound, stale = %update.run_id, "ignoring update from another run");
                return false;
            }
            Some(_) => {}
            None => state.run_id = Some(update.run_id),
        }

        let mut changed = false;
        for &(kind, status) in &update.changes {
            if state.current.transition(kind, status) {
                changed = true;
            } else {
                warn!(
                    agent = %kind,
                    from = %state.current.get(kind),
                    to = %status,
                    "refusing backwards status transition"
                );
            }
        }

        changed
    }

    /// Status of one agent on the board
    pub fn status(&self, kind: super::AgentKind) -> AgentStatus {
        self.lock().current.get(kind)
    }
}

impl ProgressReporter for StatusBoard {
    fn report(&self, update: StatusUpdate) {
        self.apply(&update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AgentKind;
    use std::sync::Arc;

    fn working_update(run_id: RunId) -> StatusUpdate {
        StatusUpdate {
            run_id,
            changes: AgentKind::ANALYSTS
                .into_iter()
                .map(|kind| (kind, AgentStatus::Working))
                .collect(),
        }
    }

    #[test]
    fn test_board_merges_partial_updates() {
        let run = RunId::new();
        let board = StatusBoard::for_run(run);

        assert!(board.apply(&working_update(run)));
        assert!(board.apply(&StatusUpdate::single(run, AgentKind::News, AgentStatus::Done)));

        let snapshot = board.snapshot();
        assert_eq!(snapshot.news, AgentStatus::Done);
        assert_eq!(snapshot.chip, AgentStatus::Working);
        assert_eq!(snapshot.manager, AgentStatus::Pending);
    }

    #[test]
    fn test_board_ignores_other_runs() {
        let current = RunId::new();
        let stale = RunId::new();
        let board = StatusBoard::new();

        assert!(board.apply(&working_update(current)));
        assert_eq!(board.run_id(), Some(current));

        assert!(!board.apply(&StatusUpdate::single(stale, AgentKind::Chip, AgentStatus::Error)));
        assert_eq!(board.status(AgentKind::Chip), AgentStatus::Working);
    }

    #[test]
    fn test_board_refuses_backwards_moves() {
        let run = RunId::new();
        let board = StatusBoard::for_run(run);
        board.apply(&StatusUpdate::single(run, AgentKind::Chip, AgentStatus::Done));

        assert!(!board.apply(&StatusUpdate::single(run, AgentKind::Chip, AgentStatus::Working)));
        assert_eq!(board.status(AgentKind::Chip), AgentStatus::Done);
    }

    #[test]
    fn test_board_bound_before_first_update() {
        let bound = RunId::new();
        let board = StatusBoard::for_run(bound);

        assert!(!board.apply(&working_update(RunId::new())));
        assert_eq!(board.snapshot(), AnalysisStatusMap::new());
        assert!(board.apply(&working_update(bound)));
    }

    #[test]
    fn test_closure_reporter() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let reporter = move |update: StatusUpdate| sink.lock().unwrap().push(update);

        let run = RunId::new();
        reporter.report(working_update(run));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_channel_reporter_survives_closed_receiver() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let run = RunId::new();

        tx.report(working_update(run));
        assert_eq!(rx.recv().await.map(|u| u.changes.len()), Some(5));

        drop(rx);
        tx.report(working_update(run));
    }

    #[test]
    fn test_noop_reporter() {
        NoopReporter.report(working_update(RunId::new()));
    }
}
