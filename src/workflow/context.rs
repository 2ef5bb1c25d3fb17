// Shared workflow record with a reducer-style setter

use super::state::{Status, WorkflowState};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Handle to the workflow record shared by the panels and the host.
///
/// Cloning the handle shares the same record. Updates are applied as pure
/// reducers under the channel lock, so each one sees the result of the last.
#[derive(Clone)]
pub struct WorkflowContext {
    tx: Arc<watch::Sender<WorkflowState>>,
}

impl WorkflowContext {
    pub fn new(initial: WorkflowState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Copy of the current record.
    pub fn snapshot(&self) -> WorkflowState {
        self.tx.borrow().clone()
    }

    pub fn status(&self) -> Status {
        self.tx.borrow().status()
    }

    /// Replaces the record with `reducer(current)`.
    ///
    /// Subscribers are only woken when the record actually changed.
    /// Returns whether it did.
    pub fn update<F>(&self, reducer: F) -> bool
    where
        F: FnOnce(&WorkflowState) -> WorkflowState,
    {
        self.tx.send_if_modified(|state| {
            let next = reducer(state);
            if next == *state {
                return false;
            }
            if next.status() != state.status() {
                debug!(from = %state.status(), to = %next.status(), "Workflow status changed");
            }
            *state = next;
            true
        })
    }

    /// Receiver that is notified after every effective update.
    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.tx.subscribe()
    }
}

impl Default for WorkflowContext {
    fn default() -> Self {
        Self::new(WorkflowState::default())
    }
}

impl std::fmt::Debug for WorkflowContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowContext")
            .field("state", &*self.tx.borrow())
            .finish()
    }
}
