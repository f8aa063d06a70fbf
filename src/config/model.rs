// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::types::AbortMode;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [pool]
/// max_concurrency = 4
/// timeout = "500ms"
/// mode = "abort_first_wait"
/// ```
///
/// All keys are optional.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub pool: RawPoolSection,
}

/// `[pool]` section, before validation.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawPoolSection {
    /// Maximum number of tasks running at once; `0` or absent means no limit.
    #[serde(default)]
    pub max_concurrency: u32,

    /// Whole-run timeout such as `"250ms"`, `"5s"`, `"1m"`; `"0s"` or absent
    /// disables it.
    #[serde(default)]
    pub timeout: Option<String>,

    /// Mode used by [`crate::TaskPool::execute`].
    #[serde(default)]
    pub mode: AbortMode,
}

/// Validated, immutable pool tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolConfig {
    /// At most this many task executions in flight; `0` means bounded only by
    /// the number of tasks in the run.
    pub max_concurrency: u32,
    /// Abort the whole run with [`crate::RunError::Timeout`] after this long.
    /// `Some(Duration::ZERO)` is treated like `None`.
    pub timeout: Option<Duration>,
    /// Mode used by [`crate::TaskPool::execute`].
    pub mode: AbortMode,
}

impl PoolConfig {
    pub fn builder() -> PoolConfigBuilder {
        PoolConfigBuilder::default()
    }

    /// Number of concurrency slots for a run of `task_count` tasks.
    pub fn slots_for(&self, task_count: usize) -> usize {
        match self.max_concurrency {
            0 => task_count,
            n => n as usize,
        }
    }
}

/// Setter-style builder for [`PoolConfig`].
#[derive(Debug, Clone, Default)]
pub struct PoolConfigBuilder {
    config: PoolConfig,
}

impl PoolConfigBuilder {
    pub fn max_concurrency(mut self, max_concurrency: u32) -> Self {
        self.config.max_concurrency = max_concurrency;
        self
    }

    /// A zero duration disables the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    pub fn mode(mut self, mode: AbortMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn build(self) -> PoolConfig {
        self.config
    }
}
