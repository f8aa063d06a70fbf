// src/errors.rs

//! Crate-wide error types.
//!
//! - [`TaskError`] is what a single task produced (its own error, a caught
//!   panic, or a cancellation short-circuit).
//! - [`RunError`] is the single combined error summarising a run.
//! - [`ConfigError`] covers loading and validating pool configuration.

use std::any::Any;
use std::backtrace::Backtrace;
use std::fmt;
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Error produced by a single task.
///
/// Cheap to clone: the same value is stored per task and, in abort modes,
/// inside the combined [`RunError`].
#[derive(Debug, Clone, Error)]
pub enum TaskError {
    /// The task's work returned an error.
    #[error("{0}")]
    Failed(Arc<anyhow::Error>),

    /// The task's work panicked; the panic was caught at the task boundary.
    #[error(transparent)]
    Panic(#[from] PanicError),

    /// The run was already cancelled when the task acquired its slot, so its
    /// work was never started.
    #[error("run cancelled")]
    Cancelled,
}

impl TaskError {
    pub(crate) fn failed(err: anyhow::Error) -> Self {
        TaskError::Failed(Arc::new(err))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TaskError::Cancelled)
    }

    pub fn as_panic(&self) -> Option<&PanicError> {
        match self {
            TaskError::Panic(p) => Some(p),
            _ => None,
        }
    }

    /// Find an error of type `E` in this error or anything it wraps.
    ///
    /// For [`TaskError::Failed`] the whole `anyhow` chain (including context
    /// layers) is searched.
    pub fn find<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            TaskError::Failed(err) => err.chain().find_map(|cause| cause.downcast_ref::<E>()),
            TaskError::Panic(p) => (p as &(dyn std::error::Error + 'static)).downcast_ref::<E>(),
            TaskError::Cancelled => (self as &(dyn std::error::Error + 'static)).downcast_ref::<E>(),
        }
    }
}

/// A panic caught inside a task's work.
///
/// Keeps the original payload (retrievable with [`PanicError::payload`]) and a
/// trace captured at the task boundary, not at the panic site.
#[derive(Clone, Error)]
#[error("panic: {message}")]
pub struct PanicError {
    message: String,
    payload: Arc<Mutex<Box<dyn Any + Send>>>,
    trace: Arc<String>,
}

impl PanicError {
    pub(crate) fn new(payload: Box<dyn Any + Send>) -> Self {
        let message = panic_message(payload.as_ref());
        let trace = Backtrace::force_capture().to_string();

        Self {
            message,
            payload: Arc::new(Mutex::new(payload)),
            trace: Arc::new(trace),
        }
    }

    /// Rendered panic message (`&str`/`String` payloads verbatim).
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Clone the original panic payload out if it is a `T`.
    pub fn payload<T>(&self) -> Option<T>
    where
        T: Any + Clone,
    {
        let guard = self.payload.lock().ok()?;
        guard.downcast_ref::<T>().cloned()
    }

    /// Diagnostic trace captured when the panic was caught.
    ///
    /// The capture happens after unwinding, at the task boundary, so the
    /// frames start at the task runner and do not include the panic site.
    /// Use [`PanicError::message`] and [`PanicError::payload`] to identify the
    /// panic itself.
    pub fn trace(&self) -> &str {
        &self.trace
    }
}

impl fmt::Debug for PanicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanicError")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

/// Combined error summarising a failed run.
#[derive(Debug, Clone, Error)]
pub enum RunError {
    /// The configured pool timeout elapsed before the run completed.
    #[error("timeout")]
    Timeout,

    /// An abort mode stopped at this task error.
    #[error("first error: {0}")]
    FirstError(#[source] TaskError),

    /// Every task error of a wait-all run, ordered by task creation.
    #[error("{}", join_messages(.0))]
    Joined(Vec<TaskError>),
}

impl RunError {
    /// Task errors this combined error was built from.
    pub fn causes(&self) -> &[TaskError] {
        match self {
            RunError::Timeout => &[],
            RunError::FirstError(err) => std::slice::from_ref(err),
            RunError::Joined(errs) => errs,
        }
    }
}

fn join_messages(errs: &[TaskError]) -> String {
    errs.iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
