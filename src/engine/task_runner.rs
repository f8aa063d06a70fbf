// src/engine/task_runner.rs

//! Executes a single task's work behind a panic barrier.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{OwnedSemaphorePermit, mpsc};
use tracing::{debug, error};

use crate::engine::Outcome;
use crate::engine::state::RunShared;
use crate::errors::{PanicError, TaskError};

/// Run the work of `slot` holding `permit`, post its outcome, then do the
/// completion bookkeeping.
///
/// A panic inside the work (while building the future or while polling it) is
/// caught here and reported as [`TaskError::Panic`]; it never reaches the
/// runtime or any other task.
pub(crate) async fn run_task(
    shared: Arc<RunShared>,
    slot: usize,
    permit: OwnedSemaphorePermit,
    outcome_tx: mpsc::Sender<Outcome>,
) {
    let (task, work) = shared.start(slot);
    let token = shared.cancel.clone();

    debug!(task = %task, "starting task");

    let caught = AssertUnwindSafe(async move { (*work)(token).await })
        .catch_unwind()
        .await;

    let error = match caught {
        Ok(Ok(())) => {
            debug!(task = %task, "task succeeded");
            None
        }
        Ok(Err(err)) => {
            debug!(task = %task, error = %err, "task failed");
            Some(TaskError::failed(err))
        }
        Err(payload) => {
            let panic = PanicError::new(payload);
            error!(task = %task, panic = %panic.message(), "task panicked; reporting as error");
            Some(TaskError::Panic(panic))
        }
    };

    Outcome { task, error }.post(&outcome_tx).await;
    shared.finish(slot, permit);
}
