// src/dag/graph.rs

//! Arena-backed dependency graph for a single run.
//!
//! The tasks submitted to a run are laid out in a flat arena and everything
//! else refers to them by slot index:
//!
//! - `outstanding[i]`: prerequisites of slot `i` that have not finished yet.
//!   Duplicate prerequisite entries are kept, and all copies are cleared
//!   together when that prerequisite finishes.
//! - `dependents[i]`: slots that list slot `i` as a prerequisite (each slot at
//!   most once).
//!
//! The graph itself is synchronous and has no locking; the engine wraps it in
//! the run lock.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::dag::graph_step::GraphStep;
use crate::dag::task::{Task, TaskId};
use crate::dag::task_state::TaskState;

#[derive(Debug)]
pub struct RunGraph {
    tasks: Vec<Task>,
    index: HashMap<TaskId, usize>,
    outstanding: Vec<Vec<usize>>,
    /// Prerequisites that were not submitted to this run and so never finish.
    unresolved: Vec<usize>,
    dependents: Vec<Vec<usize>>,
    states: Vec<TaskState>,
    /// Number of slots still in `Blocked`.
    blocked: usize,
}

impl RunGraph {
    /// Build the graph for `tasks`, returning it together with the slots that
    /// are ready immediately (no prerequisites), in submission order.
    ///
    /// A task submitted more than once is admitted once. No cycle check is
    /// done: tasks can only reference tasks that already existed when they
    /// were created, so a cycle cannot be expressed.
    pub fn build(tasks: &[Task]) -> (Self, Vec<usize>) {
        let mut arena: Vec<Task> = Vec::with_capacity(tasks.len());
        let mut index: HashMap<TaskId, usize> = HashMap::with_capacity(tasks.len());

        for task in tasks {
            if index.contains_key(&task.id()) {
                debug!(task = %task.id(), "task submitted more than once; admitting it once");
                continue;
            }
            index.insert(task.id(), arena.len());
            arena.push(task.clone());
        }

        let len = arena.len();
        let mut graph = Self {
            tasks: arena,
            index,
            outstanding: vec![Vec::new(); len],
            unresolved: vec![0; len],
            dependents: vec![Vec::new(); len],
            states: vec![TaskState::Ready; len],
            blocked: 0,
        };

        let mut ready = Vec::new();

        for slot in 0..len {
            let prerequisites: Vec<TaskId> = graph.tasks[slot]
                .depends_on()
                .iter()
                .map(Task::id)
                .collect();

            if prerequisites.is_empty() {
                ready.push(slot);
                continue;
            }

            for prerequisite in prerequisites {
                match graph.index.get(&prerequisite).copied() {
                    Some(parent) => {
                        graph.outstanding[slot].push(parent);
                        if !graph.dependents[parent].contains(&slot) {
                            graph.dependents[parent].push(slot);
                        }
                    }
                    None => {
                        warn!(
                            task = %graph.tasks[slot].id(),
                            prerequisite = %prerequisite,
                            "prerequisite was not submitted to this run; task can never become ready"
                        );
                        graph.unresolved[slot] += 1;
                    }
                }
            }

            graph.states[slot] = TaskState::Blocked;
            graph.blocked += 1;
        }

        debug!(
            tasks = len,
            ready = ready.len(),
            blocked = graph.blocked,
            "built run graph"
        );

        (graph, ready)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn task(&self, slot: usize) -> &Task {
        &self.tasks[slot]
    }

    pub fn slot_of(&self, task: &Task) -> Option<usize> {
        self.index.get(&task.id()).copied()
    }

    pub fn state(&self, slot: usize) -> TaskState {
        self.states[slot]
    }

    pub fn state_of(&self, task: &Task) -> Option<TaskState> {
        self.slot_of(task).map(|slot| self.states[slot])
    }

    /// Outstanding prerequisite slots of `slot`, duplicates included.
    pub fn outstanding(&self, slot: usize) -> &[usize] {
        &self.outstanding[slot]
    }

    /// Whether no slot still waits on prerequisites.
    pub fn is_drained(&self) -> bool {
        self.blocked == 0
    }

    /// Record a lifecycle transition that does not affect dependency
    /// resolution (`Dispatched`, `Running`).
    pub fn mark(&mut self, slot: usize, state: TaskState) {
        trace!(task = %self.tasks[slot].id(), from = ?self.states[slot], to = ?state, "task state");
        self.states[slot] = state;
    }

    /// Mark `slot` done and release its dependents.
    ///
    /// Every occurrence of `slot` is removed from each dependent's outstanding
    /// list in one step; dependents left with nothing outstanding move to
    /// `Ready` and are returned.
    pub fn complete(&mut self, slot: usize) -> GraphStep {
        self.mark(slot, TaskState::Done);

        let mut newly_ready = Vec::new();

        for dependent in self.dependents[slot].clone() {
            self.outstanding[dependent].retain(|&parent| parent != slot);

            if self.outstanding[dependent].is_empty()
                && self.unresolved[dependent] == 0
                && self.states[dependent] == TaskState::Blocked
            {
                self.states[dependent] = TaskState::Ready;
                self.blocked -= 1;
                newly_ready.push(dependent);
            }
        }

        if !newly_ready.is_empty() {
            debug!(
                task = %self.tasks[slot].id(),
                released = newly_ready.len(),
                "prerequisite finished; dependents ready"
            );
        }

        GraphStep {
            newly_ready,
            drained: self.is_drained(),
        }
    }
}
