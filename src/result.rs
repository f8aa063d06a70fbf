// src/result.rs

//! Aggregated outcome of a run.
//!
//! A run that produced no errors yields no [`RunResult`] at all (`None`), so
//! callers check for success with `is_none()` rather than inspecting an
//! empty value.

use std::collections::BTreeMap;
use std::fmt;

use crate::dag::{Task, TaskId};
use crate::errors::{RunError, TaskError};

/// Errors of a failed run: one entry per failed task plus a combined error.
#[derive(Debug, Clone)]
pub struct RunResult {
    errors: BTreeMap<TaskId, TaskError>,
    combined: RunError,
}

impl RunResult {
    /// Error recorded for `task`, or `None` if it succeeded, never ran to
    /// completion before the run returned, or was not part of the run.
    pub fn get_result(&self, task: &Task) -> Option<&TaskError> {
        self.errors.get(&task.id())
    }

    /// All recorded per-task errors, ordered by task creation.
    pub fn errors(&self) -> impl Iterator<Item = (TaskId, &TaskError)> {
        self.errors.iter().map(|(id, err)| (*id, err))
    }

    pub fn combined(&self) -> &RunError {
        &self.combined
    }

    pub fn into_combined(self) -> RunError {
        self.combined
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.combined, RunError::Timeout)
    }

    /// Task errors reachable from the combined error.
    pub fn causes(&self) -> &[TaskError] {
        self.combined.causes()
    }

    /// Whether any cause of the combined error satisfies `pred`.
    pub fn contains(&self, pred: impl Fn(&TaskError) -> bool) -> bool {
        self.causes().iter().any(pred)
    }

    /// First error of type `E` reachable from the combined error.
    pub fn find<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        self.causes().iter().find_map(TaskError::find::<E>)
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.combined, f)
    }
}

impl std::error::Error for RunResult {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.combined)
    }
}

impl From<RunResult> for RunError {
    fn from(result: RunResult) -> Self {
        result.into_combined()
    }
}

/// Accumulates outcomes while a run is in progress.
#[derive(Debug, Default)]
pub(crate) struct ResultBuilder {
    errors: BTreeMap<TaskId, TaskError>,
    combined: Option<RunError>,
}

impl ResultBuilder {
    pub(crate) fn record(&mut self, task: TaskId, err: TaskError) {
        self.errors.insert(task, err);
    }

    /// Set the combined error unless one is already set.
    pub(crate) fn set_combined(&mut self, err: RunError) {
        if self.combined.is_none() {
            self.combined = Some(err);
        }
    }

    pub(crate) fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Finish the run: an explicitly set combined error wins, otherwise all
    /// task errors are joined; no errors at all means success (`None`).
    pub(crate) fn build(self) -> Option<RunResult> {
        let combined = match self.combined {
            Some(combined) => combined,
            None if self.errors.is_empty() => return None,
            None => RunError::Joined(self.errors.values().cloned().collect()),
        };

        Some(RunResult {
            errors: self.errors,
            combined,
        })
    }
}
