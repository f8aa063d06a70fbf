// src/pool.rs

//! The pool façade: a [`PoolConfig`] bound to the three execution modes.

use tokio_util::sync::CancellationToken;

use crate::config::PoolConfig;
use crate::dag::Task;
use crate::engine::run::Run;
use crate::result::RunResult;
use crate::types::AbortMode;

/// Runs task sets under a fixed configuration.
///
/// Holds no state between calls besides its configuration; every call builds
/// a fresh run. All entry points return `None` when every task succeeded.
#[derive(Debug, Clone, Default)]
pub struct TaskPool {
    config: PoolConfig,
}

impl TaskPool {
    /// Pool with unbounded concurrency and no timeout.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PoolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Run every task to completion regardless of failures and collect all
    /// errors.
    pub async fn wait_all(&self, cancel: &CancellationToken, tasks: &[Task]) -> Option<RunResult> {
        self.run(AbortMode::WaitAll, cancel, tasks).await
    }

    /// Return as soon as the first task fails. Tasks already running are not
    /// waited for; they see the run token cancelled.
    pub async fn race_first(
        &self,
        cancel: &CancellationToken,
        tasks: &[Task],
    ) -> Option<RunResult> {
        self.run(AbortMode::AbortFirst, cancel, tasks).await
    }

    /// Cancel on the first failure, but only return once every task that was
    /// admitted has reported an outcome.
    pub async fn race_first_await(
        &self,
        cancel: &CancellationToken,
        tasks: &[Task],
    ) -> Option<RunResult> {
        self.run(AbortMode::AbortFirstWait, cancel, tasks).await
    }

    /// Run under the mode from the pool's configuration.
    pub async fn execute(&self, cancel: &CancellationToken, tasks: &[Task]) -> Option<RunResult> {
        self.run(self.config.mode, cancel, tasks).await
    }

    pub async fn run(
        &self,
        mode: AbortMode,
        cancel: &CancellationToken,
        tasks: &[Task],
    ) -> Option<RunResult> {
        Run::new(&self.config, mode, cancel, tasks).run().await
    }
}

impl From<PoolConfig> for TaskPool {
    fn from(config: PoolConfig) -> Self {
        Self::with_config(config)
    }
}
