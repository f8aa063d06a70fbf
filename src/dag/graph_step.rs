// src/dag/graph_step.rs

/// What changed when a task completed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphStep {
    /// Arena slots whose last outstanding prerequisite just finished.
    pub newly_ready: Vec<usize>,
    /// Whether no task in the run still has outstanding prerequisites, i.e.
    /// nothing more will ever be admitted to the ready queue.
    pub drained: bool,
}
