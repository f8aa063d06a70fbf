// src/dag/task.rs

//! Task handles.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

/// The unit of work a task runs.
///
/// Receives the run's cancellation token and should return early once it is
/// cancelled; nothing interrupts running work forcibly.
pub type Work =
    Arc<dyn Fn(CancellationToken) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Task`].
///
/// Ids increase with construction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    fn next() -> Self {
        TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

struct TaskInner {
    id: TaskId,
    work: Work,
    depends_on: Vec<Task>,
}

/// A unit of work plus the tasks that must finish before it starts.
///
/// Cloning a `Task` clones the handle, not the task: clones share the same
/// [`TaskId`]. Tasks are immutable and may be submitted to any number of runs.
#[derive(Clone)]
pub struct Task {
    inner: Arc<TaskInner>,
}

impl Task {
    /// Create a task from an async work function and its prerequisites.
    ///
    /// Prerequisites are kept verbatim: duplicates are not removed.
    pub fn new<F, Fut>(work: F, depends_on: impl IntoIterator<Item = Task>) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let work: Work = Arc::new(move |token| work(token).boxed());
        Self::from_work(work, depends_on)
    }

    pub fn from_work(work: Work, depends_on: impl IntoIterator<Item = Task>) -> Self {
        Self {
            inner: Arc::new(TaskInner {
                id: TaskId::next(),
                work,
                depends_on: depends_on.into_iter().collect(),
            }),
        }
    }

    pub fn id(&self) -> TaskId {
        self.inner.id
    }

    pub fn depends_on(&self) -> &[Task] {
        &self.inner.depends_on
    }

    pub(crate) fn work(&self) -> Work {
        Arc::clone(&self.inner.work)
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Task {}

impl std::hash::Hash for Task {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let deps: Vec<TaskId> = self.depends_on().iter().map(Task::id).collect();
        f.debug_struct("Task")
            .field("id", &self.id())
            .field("depends_on", &deps)
            .finish_non_exhaustive()
    }
}
