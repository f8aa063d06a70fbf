#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use taskpool::{CancellationToken, Task};

/// Error type used by test tasks so results can be matched by type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestError(pub &'static str);

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for TestError {}

/// Shared log of task side effects, in the order they happened.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<usize>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<usize> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, n: usize) {
        self.events.lock().unwrap().push(n);
    }

    /// A task that records `n` and succeeds.
    pub fn task(&self, n: usize, deps: impl IntoIterator<Item = Task>) -> Task {
        self.sleeping_task(n, Duration::ZERO, deps)
    }

    /// A task that sleeps for `delay`, then records `n` and succeeds.
    pub fn sleeping_task(
        &self,
        n: usize,
        delay: Duration,
        deps: impl IntoIterator<Item = Task>,
    ) -> Task {
        let recorder = self.clone();
        Task::new(
            move |_| {
                let recorder = recorder.clone();
                async move {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    recorder.push(n);
                    Ok(())
                }
            },
            deps,
        )
    }
}

/// A task that fails with `TestError(msg)` after `delay`.
pub fn failing_task(
    msg: &'static str,
    delay: Duration,
    deps: impl IntoIterator<Item = Task>,
) -> Task {
    Task::new(
        move |_| async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Err(TestError(msg).into())
        },
        deps,
    )
}

/// A task that succeeds immediately.
pub fn ok_task(deps: impl IntoIterator<Item = Task>) -> Task {
    Task::new(|_| async { Ok(()) }, deps)
}

/// A task that sleeps for `delay` unless the run is cancelled first.
pub fn cancellable_sleep(delay: Duration) -> Task {
    Task::new(
        move |cancel: CancellationToken| async move {
            tokio::select! {
                _ = cancel.cancelled() => Err(anyhow::anyhow!("cancelled while sleeping")),
                _ = tokio::time::sleep(delay) => Ok(()),
            }
        },
        [],
    )
}

/// Counts how many times a task's work was invoked.
#[derive(Debug, Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    /// A task that bumps the counter and succeeds.
    pub fn task(&self, deps: impl IntoIterator<Item = Task>) -> Task {
        let counter = self.0.clone();
        Task::new(
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            },
            deps,
        )
    }
}

/// A task whose work panics with `payload` once polled.
#[allow(unreachable_code)]
pub fn panicking_task<P>(payload: P, deps: impl IntoIterator<Item = Task>) -> Task
where
    P: Clone + Send + Sync + 'static,
{
    Task::new(
        move |_| {
            let payload = payload.clone();
            async move {
                std::panic::panic_any(payload);
                Ok(())
            }
        },
        deps,
    )
}
