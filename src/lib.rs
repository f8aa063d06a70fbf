// src/lib.rs

//! Bounded-concurrency execution of dependent async tasks.
//!
//! Build [`Task`]s (work plus prerequisite tasks), then hand them to a
//! [`TaskPool`] in one of three modes:
//!
//! - [`TaskPool::wait_all`]: run everything, collect every error.
//! - [`TaskPool::race_first`]: return on the first failure without waiting for
//!   work in flight.
//! - [`TaskPool::race_first_await`]: cancel on the first failure, return once
//!   everything started has finished.
//!
//! A task only starts after all its prerequisites finished. Work receives a
//! [`CancellationToken`] that fires when the caller's token is cancelled, the
//! pool timeout elapses, or an abort mode sees a failure. Panics inside work
//! are caught and reported as [`PanicError`]s.
//!
//! Every entry point returns `Option<RunResult>`; `None` means success.

pub mod config;
pub mod dag;
mod engine;
pub mod errors;
pub mod logging;
pub mod pool;
pub mod result;
pub mod types;

pub use tokio_util::sync::CancellationToken;

pub use crate::config::{PoolConfig, PoolConfigBuilder};
pub use crate::dag::{Task, TaskId};
pub use crate::errors::{PanicError, RunError, TaskError};
pub use crate::pool::TaskPool;
pub use crate::result::RunResult;
pub use crate::types::AbortMode;

/// [`TaskPool::wait_all`] on a default pool (unbounded, no timeout).
pub async fn wait_all(cancel: &CancellationToken, tasks: &[Task]) -> Option<RunResult> {
    TaskPool::new().wait_all(cancel, tasks).await
}

/// [`TaskPool::race_first`] on a default pool (unbounded, no timeout).
pub async fn race_first(cancel: &CancellationToken, tasks: &[Task]) -> Option<RunResult> {
    TaskPool::new().race_first(cancel, tasks).await
}

/// [`TaskPool::race_first_await`] on a default pool (unbounded, no timeout).
pub async fn race_first_await(cancel: &CancellationToken, tasks: &[Task]) -> Option<RunResult> {
    TaskPool::new().race_first_await(cancel, tasks).await
}
