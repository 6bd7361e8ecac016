//! List and task records.
//!
//! # Responsibility
//! - Define the serialized shape of the persisted collection.
//! - Provide title normalization and position re-sequencing helpers.
//!
//! # Invariants
//! - Serialized field names match the persisted JSON shape exactly:
//!   `{id, title, position, tasks: [{id, title, isDone, position}]}`.
//! - Titles stored by the lists store are trimmed and non-blank.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable list identifier, unique within the collection.
pub type ListId = u64;

/// Task identifier, unique within its owning list.
pub type TaskId = u64;

/// Validation errors for list/task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Title is empty after trimming.
    BlankTitle,
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "title must not be blank"),
        }
    }
}

impl Error for ModelError {}

/// A named, ordered container of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub id: ListId,
    pub title: String,
    /// 1-based rank among sibling lists.
    pub position: u32,
    /// Tasks in display order.
    pub tasks: Vec<Task>,
}

/// A titled, completable unit of work owned by one list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub is_done: bool,
    /// 1-based rank within the owning list.
    pub position: u32,
}

impl TodoList {
    /// Creates an empty list. `position` is assigned by the store on insert.
    pub fn new(id: ListId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            position: 0,
            tasks: Vec::new(),
        }
    }

    /// Returns the task with `task_id`, if present.
    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    /// Number of tasks marked done.
    pub fn done_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.is_done).count()
    }

    /// Rewrites task positions to `1..=N` in current order.
    pub fn resequence_tasks(&mut self) {
        for (index, task) in self.tasks.iter_mut().enumerate() {
            task.position = rank(index);
        }
    }
}

impl Task {
    /// Creates an open task. `position` is assigned by the store on insert.
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            is_done: false,
            position: 0,
        }
    }
}

/// Rewrites list positions to `1..=N` in slice order.
pub fn resequence_lists(lists: &mut [TodoList]) {
    for (index, list) in lists.iter_mut().enumerate() {
        list.position = rank(index);
    }
}

/// Trims a display title and rejects blank input.
pub fn normalize_title(value: &str) -> Result<String, ModelError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelError::BlankTitle);
    }
    Ok(trimmed.to_string())
}

fn rank(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}
