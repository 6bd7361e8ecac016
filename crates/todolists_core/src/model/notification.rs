//! Removal notification records.
//!
//! # Responsibility
//! - Describe what was removed (`NotificationKind`) and keep a snapshot of it.
//!
//! # Invariants
//! - `Notification::kind` always equals `Notification::backup.kind()`.
//! - Task backups keep the owning `list_id` and pre-removal `position` so the
//!   task can be reinserted where it was.

use crate::model::list::{ListId, Task, TaskId, TodoList};
use serde::{Deserialize, Serialize};

/// Unique, monotonically assigned notification identifier.
pub type NotificationId = u64;

/// What kind of entity a notification reports as removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    List,
    Task,
}

impl NotificationKind {
    /// Stable lowercase name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Task => "task",
        }
    }
}

/// Snapshot of a removed task plus where it lived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskBackup {
    pub list_id: ListId,
    pub id: TaskId,
    pub position: u32,
    pub title: String,
    pub is_done: bool,
}

impl TaskBackup {
    /// Copies `task` as it sits in list `list_id`.
    pub fn capture(list_id: ListId, task: &Task) -> Self {
        Self {
            list_id,
            id: task.id,
            position: task.position,
            title: task.title.clone(),
            is_done: task.is_done,
        }
    }

    /// Rebuilds the task record from this backup.
    pub fn to_task(&self) -> Task {
        Task {
            id: self.id,
            title: self.title.clone(),
            is_done: self.is_done,
            position: self.position,
        }
    }
}

/// Pre-removal snapshot carried by a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "item", rename_all = "snake_case")]
pub enum Backup {
    List(TodoList),
    Task(TaskBackup),
}

impl Backup {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::List(_) => NotificationKind::List,
            Self::Task(_) => NotificationKind::Task,
        }
    }

    /// Display title of the removed item.
    pub fn title(&self) -> &str {
        match self {
            Self::List(list) => list.title.as_str(),
            Self::Task(task) => task.title.as_str(),
        }
    }
}

/// A transient, dismissible removal record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    /// Rendered (possibly localized) message naming the removed item.
    pub text: String,
    pub backup: Backup,
    /// Clock reading (ms) when the entry was created.
    pub created_at_ms: u64,
}
