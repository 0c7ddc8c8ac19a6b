//! Task batch
//!
//! The complete, arrival-ordered task list for one planning cycle. A batch is
//! replaced wholesale on every delivery, never merged with the previous one.

use crate::task::Task;
use serde::{Deserialize, Serialize};

/// Ordered queue of tasks for one planning cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskBatch {
    tasks: Vec<Task>,
}

impl TaskBatch {
    /// Create an empty batch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty batch with room for `capacity` tasks
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tasks: Vec::with_capacity(capacity),
        }
    }

    /// Append a task in arrival order
    #[inline]
    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Number of tasks
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the batch holds no tasks
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in arrival order
    #[inline]
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Iterate tasks in arrival order
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Take ownership of the tasks
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Vec<Task> {
        self.tasks
    }
}

impl From<Vec<Task>> for TaskBatch {
    fn from(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}

impl FromIterator<Task> for TaskBatch {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self {
            tasks: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for TaskBatch {
    type Item = Task;
    type IntoIter = std::vec::IntoIter<Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.into_iter()
    }
}

impl<'a> IntoIterator for &'a TaskBatch {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
