// src/dag/mod.rs

//! Task model and per-run dependency resolution.
//!
//! - [`task`] holds the immutable, reusable [`Task`] handle.
//! - [`graph`] lays the tasks of one run out in an arena and tracks which of
//!   them are blocked on prerequisites.
//! - [`task_state`] is the per-run lifecycle of a task.
//! - [`graph_step`] is the result of completing a task in the graph.

pub mod graph;
pub mod graph_step;
pub mod task;
pub mod task_state;

pub use graph::RunGraph;
pub use graph_step::GraphStep;
pub use task::{Task, TaskId, Work};
pub use task_state::TaskState;
