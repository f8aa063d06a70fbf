// src/engine/run.rs

//! Driver loop of a single run.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::PoolConfig;
use crate::dag::{RunGraph, Task};
use crate::engine::Outcome;
use crate::engine::dispatch::dispatch_loop;
use crate::engine::state::RunShared;
use crate::errors::RunError;
use crate::result::{ResultBuilder, RunResult};
use crate::types::AbortMode;

/// One execution of a task set under an [`AbortMode`].
///
/// The run's cancellation token is a child of the caller's token, so the
/// caller cancelling also cancels the run, but not the other way round.
pub(crate) struct Run<'a> {
    mode: AbortMode,
    config: PoolConfig,
    cancel: CancellationToken,
    tasks: &'a [Task],
}

impl<'a> Run<'a> {
    pub(crate) fn new(
        config: &PoolConfig,
        mode: AbortMode,
        parent: &CancellationToken,
        tasks: &'a [Task],
    ) -> Self {
        Self {
            mode,
            config: *config,
            cancel: parent.child_token(),
            tasks,
        }
    }

    /// Drive the run to its end and build the result.
    ///
    /// Returns early, without waiting for work still in flight, when the
    /// timeout fires or when [`AbortMode::AbortFirst`] sees a failure. The run
    /// token is cancelled on every return path so such work can stop.
    pub(crate) async fn run(self) -> Option<RunResult> {
        if self.tasks.is_empty() {
            return None;
        }

        let _cancel_on_return = self.cancel.clone().drop_guard();
        // `PoolConfig` fields are public; a zero duration set directly means
        // no timeout, same as through the builder.
        let deadline = self.config.timeout.filter(|limit| !limit.is_zero());

        let (graph, ready) = RunGraph::build(self.tasks);
        let task_count = graph.len();
        let slots = self.config.slots_for(task_count);

        info!(
            mode = %self.mode,
            tasks = task_count,
            slots,
            timeout = ?deadline,
            "starting run"
        );

        let (ready_tx, ready_rx) = mpsc::channel::<usize>(task_count);
        let (outcome_tx, mut outcome_rx) = mpsc::channel::<Outcome>(task_count);

        let shared = Arc::new(RunShared::new(
            graph,
            ready,
            ready_tx,
            slots,
            self.cancel.clone(),
        ));
        tokio::spawn(dispatch_loop(shared, ready_rx, outcome_tx));

        let timeout = async move {
            match deadline {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(timeout);

        let mut results = ResultBuilder::default();

        loop {
            tokio::select! {
                biased;

                _ = &mut timeout => {
                    warn!(mode = %self.mode, "run timed out; not waiting for tasks in flight");
                    results.set_combined(RunError::Timeout);
                    return results.build();
                }

                outcome = outcome_rx.recv() => match outcome {
                    Some(outcome) => {
                        if self.handle_outcome(&mut results, outcome) {
                            return results.build();
                        }
                    }
                    None => {
                        info!(
                            mode = %self.mode,
                            failed = results.has_errors(),
                            "all admitted tasks finished"
                        );
                        return results.build();
                    }
                },
            }
        }
    }

    /// Record a task outcome and apply the mode's abort policy.
    ///
    /// Returns `true` when the driver should return immediately.
    fn handle_outcome(&self, results: &mut ResultBuilder, outcome: Outcome) -> bool {
        let Some(error) = outcome.error else {
            return false;
        };

        results.record(outcome.task, error.clone());

        if !self.mode.aborts_on_error() {
            return false;
        }

        if !self.cancel.is_cancelled() {
            info!(
                task = %outcome.task,
                error = %error,
                mode = %self.mode,
                "first task failure; cancelling run"
            );
        }
        self.cancel.cancel();
        results.set_combined(RunError::FirstError(error));

        if self.mode.drains_after_abort() {
            debug!("draining tasks already started");
            false
        } else {
            true
        }
    }
}
