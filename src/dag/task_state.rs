// src/dag/task_state.rs

//! Per-run lifecycle of a task.

/// Where a task is in the current run.
///
/// `Blocked → Ready → Dispatched → Running → Done`. A task with no
/// prerequisites starts in `Ready`; a task short-circuited by cancellation
/// goes straight from `Dispatched` to `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Waiting on at least one unfinished prerequisite.
    Blocked,
    /// Admitted to the ready queue.
    Ready,
    /// Pulled from the ready queue; acquiring a concurrency slot.
    Dispatched,
    /// Holding a slot with its work executing.
    Running,
    /// Outcome posted and bookkeeping done.
    Done,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Done)
    }
}
