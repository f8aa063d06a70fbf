// src/engine/mod.rs

//! Scheduling engine.
//!
//! One [`run::Run`] is created per call to a pool entry point. It owns:
//! - the dependency graph and ready queue ([`state`]), behind one run lock
//! - the dispatch loop pulling ready tasks under the concurrency limit
//!   ([`dispatch`])
//! - the per-task unit that runs work behind a panic barrier
//!   ([`task_runner`])
//! - the driver loop racing outcomes against the timeout ([`run`])

pub(crate) mod dispatch;
pub(crate) mod run;
pub(crate) mod state;
pub(crate) mod task_runner;

use tokio::sync::mpsc;
use tracing::trace;

use crate::dag::TaskId;
use crate::errors::TaskError;

/// Terminal result of one task, posted exactly once per admitted task.
#[derive(Debug)]
pub(crate) struct Outcome {
    pub(crate) task: TaskId,
    pub(crate) error: Option<TaskError>,
}

impl Outcome {
    /// Send on the outcome stream. The driver may already have returned (abort
    /// or timeout), in which case the outcome is dropped.
    pub(crate) async fn post(self, tx: &mpsc::Sender<Outcome>) {
        let task = self.task;
        if tx.send(self).await.is_err() {
            trace!(task = %task, "driver already returned; outcome dropped");
        }
    }
}
