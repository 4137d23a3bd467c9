use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ExportError, ExportResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Done,
    Failed,
}

/// Snapshot of the active run. Idle when nothing runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunState {
    pub status: RunStatus,
    pub processed_count: usize,
    pub total: usize,
}

#[derive(Debug, Default)]
struct SlotState {
    current: RunState,
    last_terminal: Option<RunStatus>,
}

/// Exclusive hold on the rendering surface, shared by every trigger.
///
/// At most one `RunGuard` exists per slot at a time.
#[derive(Debug, Clone, Default)]
pub struct RunSlot {
    inner: Arc<Mutex<SlotState>>,
}

impl RunSlot {
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn snapshot(&self) -> RunState {
        self.lock().current
    }

    /// `Done` or `Failed` of the most recent finished run.
    #[must_use]
    pub fn last_terminal_status(&self) -> Option<RunStatus> {
        self.lock().last_terminal
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.snapshot().status == RunStatus::Running
    }

    /// Claims the slot for a new run of `total` artifacts.
    pub fn try_begin(&self, total: usize) -> ExportResult<RunGuard> {
        let mut state = self.lock();
        if state.current.status == RunStatus::Running {
            return Err(ExportError::RunInProgress);
        }
        state.current = RunState {
            status: RunStatus::Running,
            processed_count: 0,
            total,
        };
        debug!(total, "export run started");
        Ok(RunGuard {
            slot: self.clone(),
            finished: false,
        })
    }
}

/// Ownership of a running export. Dropping it without `complete`/`fail`
/// releases the slot as a failed run.
#[derive(Debug)]
pub struct RunGuard {
    slot: RunSlot,
    finished: bool,
}

impl RunGuard {
    pub fn set_total(&mut self, total: usize) {
        self.slot.lock().current.total = total;
    }

    pub fn record_processed(&mut self, processed_count: usize) {
        let mut state = self.slot.lock();
        state.current.processed_count = processed_count.min(state.current.total);
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.slot.snapshot()
    }

    pub fn complete(mut self) {
        self.finish(RunStatus::Done);
    }

    pub fn fail(mut self) {
        self.finish(RunStatus::Failed);
    }

    fn finish(&mut self, status: RunStatus) {
        if self.finished {
            return;
        }
        self.finished = true;
        let mut state = self.slot.lock();
        state.last_terminal = Some(status);
        state.current = RunState::default();
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if !self.finished {
            warn!("export run dropped before finishing; releasing run slot");
            self.finish(RunStatus::Failed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RunSlot, RunStatus};
    use crate::error::ExportError;

    #[test]
    fn second_begin_is_rejected_until_release() {
        let slot = RunSlot::default();
        let guard = slot.try_begin(3).expect("first run");
        assert!(matches!(slot.try_begin(1), Err(ExportError::RunInProgress)));
        assert_eq!(slot.snapshot().total, 3);

        guard.complete();
        assert_eq!(slot.snapshot().status, RunStatus::Idle);
        assert_eq!(slot.last_terminal_status(), Some(RunStatus::Done));
        assert!(slot.try_begin(1).is_ok());
    }

    #[test]
    fn abandoned_guard_releases_as_failed() {
        let slot = RunSlot::default();
        {
            let mut guard = slot.try_begin(2).expect("run");
            guard.record_processed(5);
            assert_eq!(guard.state().processed_count, 2);
        }
        assert!(!slot.is_running());
        assert_eq!(slot.last_terminal_status(), Some(RunStatus::Failed));
    }
}
