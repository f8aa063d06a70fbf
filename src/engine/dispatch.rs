// src/engine/dispatch.rs

//! Dispatch loop: pulls ready tasks, applies backpressure through the
//! concurrency slots, and either starts the task or short-circuits it when the
//! run is already cancelled.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::dag::TaskState;
use crate::engine::Outcome;
use crate::engine::state::RunShared;
use crate::engine::task_runner::run_task;
use crate::errors::TaskError;

/// Runs until the ready queue is closed and drained.
///
/// `outcome_tx` is the loop's own handle on the outcome stream; every started
/// task gets a clone, so the stream closes once the loop and all started tasks
/// are done.
pub(crate) async fn dispatch_loop(
    shared: Arc<RunShared>,
    mut ready_rx: mpsc::Receiver<usize>,
    outcome_tx: mpsc::Sender<Outcome>,
) {
    debug!("dispatch loop started");

    while let Some(slot) = ready_rx.recv().await {
        shared.mark(slot, TaskState::Dispatched);

        // Blocks once every slot is taken.
        let permit = match Arc::clone(&shared.slots).acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => {
                warn!(error = %e, "concurrency slots closed; stopping dispatch");
                break;
            }
        };

        if shared.cancel.is_cancelled() {
            let task = shared.task_id(slot);
            debug!(task = %task, "run cancelled before start; not executing task");

            Outcome {
                task,
                error: Some(TaskError::Cancelled),
            }
            .post(&outcome_tx)
            .await;

            shared.finish(slot, permit);
            continue;
        }

        tokio::spawn(run_task(
            Arc::clone(&shared),
            slot,
            permit,
            outcome_tx.clone(),
        ));
    }

    debug!("ready queue closed; dispatch loop finished");
}
