// src/engine/state.rs

//! State shared by the driver, the dispatch loop and every running task.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{OwnedSemaphorePermit, Semaphore, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::dag::{RunGraph, TaskId, TaskState, Work};

/// Dependency graph plus the producing end of the ready queue.
///
/// Only ever touched under the run lock.
#[derive(Debug)]
struct Resolver {
    graph: RunGraph,
    /// `None` once the queue has been closed.
    ready_tx: Option<mpsc::Sender<usize>>,
}

impl Resolver {
    fn admit(&mut self, slot: usize) {
        let Some(tx) = &self.ready_tx else {
            warn!(task = %self.graph.task(slot).id(), "ready queue already closed; task dropped");
            return;
        };

        // Capacity equals the task count and each slot is admitted once.
        if let Err(e) = tx.try_send(slot) {
            warn!(task = %self.graph.task(slot).id(), error = %e, "failed to enqueue ready task");
        }
    }

    fn close_ready(&mut self) {
        if self.ready_tx.take().is_some() {
            debug!("no task left waiting on prerequisites; ready queue closed");
        }
    }
}

#[derive(Debug)]
pub(crate) struct RunShared {
    resolver: Mutex<Resolver>,
    pub(crate) slots: Arc<Semaphore>,
    pub(crate) cancel: CancellationToken,
}

impl RunShared {
    /// Wrap a freshly built graph, admitting `initially_ready` and closing the
    /// queue right away if nothing is blocked.
    pub(crate) fn new(
        graph: RunGraph,
        initially_ready: Vec<usize>,
        ready_tx: mpsc::Sender<usize>,
        slots: usize,
        cancel: CancellationToken,
    ) -> Self {
        let shared = Self {
            resolver: Mutex::new(Resolver {
                graph,
                ready_tx: Some(ready_tx),
            }),
            slots: Arc::new(Semaphore::new(slots)),
            cancel,
        };

        {
            let mut resolver = shared.lock();
            for slot in initially_ready {
                resolver.admit(slot);
            }
            if resolver.graph.is_drained() {
                resolver.close_ready();
            }
        }

        shared
    }

    fn lock(&self) -> MutexGuard<'_, Resolver> {
        self.resolver.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn task_id(&self, slot: usize) -> TaskId {
        self.lock().graph.task(slot).id()
    }

    pub(crate) fn mark(&self, slot: usize, state: TaskState) {
        self.lock().graph.mark(slot, state);
    }

    /// Mark `slot` running and hand out what is needed to execute it.
    pub(crate) fn start(&self, slot: usize) -> (TaskId, Work) {
        let mut resolver = self.lock();
        resolver.graph.mark(slot, TaskState::Running);
        let task = resolver.graph.task(slot);
        (task.id(), task.work())
    }

    /// Completion bookkeeping, run exactly once per admitted task after its
    /// outcome has been posted.
    ///
    /// Releases the concurrency slot, releases dependents whose last
    /// prerequisite this was, and closes the ready queue once nothing is
    /// blocked anymore.
    pub(crate) fn finish(&self, slot: usize, permit: OwnedSemaphorePermit) {
        drop(permit);

        let mut resolver = self.lock();
        let step = resolver.graph.complete(slot);

        for ready in step.newly_ready {
            resolver.admit(ready);
        }

        if step.drained {
            resolver.close_ready();
        }
    }
}
