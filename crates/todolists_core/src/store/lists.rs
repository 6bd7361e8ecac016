//! Lists store: canonical list/task collection, selection and persistence.
//!
//! # Responsibility
//! - Own the ordered list collection and the selected list id.
//! - Apply every mutation as a new collection value, persist it, then publish.
//! - Report removals to the notification store with a restorable backup.
//!
//! # Invariants
//! - List positions and each list's task positions are dense `1..=N` after
//!   every mutation (collections handed to `set_all` are trusted as-is).
//! - Selection references an existing list whenever one exists, else `None`.
//! - Published collections are never mutated; each change publishes a new `Rc`.
//! - Storage failures are logged and absorbed; the in-memory value stays
//!   authoritative for the session.
//! - Missing ids and malformed input are logged no-ops, never panics.

use crate::config::StoreConfig;
use crate::model::list::{normalize_title, resequence_lists, ListId, Task, TaskId, TodoList};
use crate::model::notification::{Backup, NotificationId, TaskBackup};
use crate::observable::{Observable, SubscriptionId};
use crate::persistence::{load_lists, save_lists};
use crate::storage::KeyValueStorage;
use crate::store::notifications::NotificationStore;
use log::{error, info, warn};
use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

/// Published snapshot of the list collection.
pub type ListCollection = Rc<Vec<TodoList>>;

/// Owner of the list collection and selection.
pub struct ListsStore<S: KeyValueStorage> {
    storage: S,
    storage_key: String,
    lists: Observable<ListCollection>,
    selected: Observable<Option<ListId>>,
    notifications: Rc<NotificationStore>,
    next_list_id: Cell<ListId>,
    next_task_id: Cell<TaskId>,
}

impl<S: KeyValueStorage> ListsStore<S> {
    /// Hydrates the store from `storage`.
    ///
    /// Absent, corrupt or empty snapshots start an empty collection with no
    /// selection; otherwise the first list is selected.
    pub fn new(storage: S, config: &StoreConfig, notifications: Rc<NotificationStore>) -> Self {
        let loaded = load_lists(&storage, &config.storage_key);
        let selected = loaded.first().map(|list| list.id);
        info!(
            "event=lists_init module=lists status=ok list_count={} selected_list_id={}",
            loaded.len(),
            display_id(selected)
        );

        let store = Self {
            storage,
            storage_key: config.storage_key.clone(),
            lists: Observable::new(Rc::new(Vec::new())),
            selected: Observable::new(selected),
            notifications,
            next_list_id: Cell::new(1),
            next_task_id: Cell::new(1),
        };
        store.observe_ids(&loaded);
        store.lists.set(Rc::new(loaded));
        store
    }

    /// Current collection snapshot.
    pub fn lists(&self) -> ListCollection {
        self.lists.get()
    }

    /// Copy of the list with `list_id`.
    pub fn list(&self, list_id: ListId) -> Option<TodoList> {
        self.lists
            .with(|lists| lists.iter().find(|list| list.id == list_id).cloned())
    }

    pub fn selected_list_id(&self) -> Option<ListId> {
        self.selected.get()
    }

    /// Copy of the currently selected list.
    pub fn selected_list(&self) -> Option<TodoList> {
        self.selected_list_id().and_then(|list_id| self.list(list_id))
    }

    pub fn notifications(&self) -> &Rc<NotificationStore> {
        &self.notifications
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn subscribe_lists<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ListCollection) + 'static,
    {
        self.lists.subscribe(callback)
    }

    pub fn unsubscribe_lists(&self, id: SubscriptionId) -> bool {
        self.lists.unsubscribe(id)
    }

    pub fn subscribe_selection<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Option<ListId>) + 'static,
    {
        self.selected.subscribe(callback)
    }

    pub fn unsubscribe_selection(&self, id: SubscriptionId) -> bool {
        self.selected.unsubscribe(id)
    }

    /// Replaces the whole collection (hydrate path). Input is trusted.
    ///
    /// A selection that no longer resolves moves to the first list.
    pub fn set_all(&self, lists: Vec<TodoList>) {
        self.observe_ids(&lists);
        let selected = self.selected_list_id();
        let repaired = match selected {
            Some(list_id) if lists.iter().any(|list| list.id == list_id) => selected,
            _ => lists.first().map(|list| list.id),
        };
        let list_count = lists.len();

        self.commit(lists);
        if repaired != selected {
            self.selected.set(repaired);
        }
        info!(
            "event=lists_set_all module=lists status=ok list_count={list_count} selected_list_id={}",
            display_id(repaired)
        );
    }

    /// Appends `list` at the end and selects it.
    ///
    /// The store assigns `position`; blank titles and duplicate ids are rejected.
    pub fn add_list(&self, mut list: TodoList) -> bool {
        list.title = match normalize_title(&list.title) {
            Ok(title) => title,
            Err(err) => return noop("list_add", list.id, &err.to_string()),
        };
        if self.list(list.id).is_some() {
            return noop("list_add", list.id, "duplicate_list_id");
        }
        if has_duplicate_task_ids(&list.tasks) {
            return noop("list_add", list.id, "duplicate_task_id");
        }

        let mut next = self.snapshot();
        list.position = 0;
        list.resequence_tasks();
        let list_id = list.id;
        self.observe_ids(std::slice::from_ref(&list));
        next.push(list);
        resequence_lists(&mut next);

        self.commit(next);
        self.selected.set(Some(list_id));
        info!("event=list_add module=lists status=ok list_id={list_id}");
        true
    }

    /// Creates a list with a store-assigned id. Returns the new id.
    pub fn create_list(&self, title: &str) -> Option<ListId> {
        let list_id = self.next_list_id.get();
        self.add_list(TodoList::new(list_id, title))
            .then_some(list_id)
    }

    /// Replaces the list `list_id` in place, keeping its id and position.
    pub fn edit_list(&self, list_id: ListId, updated: TodoList) -> bool {
        let title = match normalize_title(&updated.title) {
            Ok(title) => title,
            Err(err) => return noop("list_edit", list_id, &err.to_string()),
        };
        if has_duplicate_task_ids(&updated.tasks) {
            return noop("list_edit", list_id, "duplicate_task_id");
        }

        let tasks = updated.tasks;
        self.update_list("list_edit", list_id, |list| {
            list.title = title;
            list.tasks = tasks;
            list.resequence_tasks();
            true
        })
    }

    /// Changes only the title of `list_id`.
    pub fn rename_list(&self, list_id: ListId, title: &str) -> bool {
        let title = match normalize_title(title) {
            Ok(title) => title,
            Err(err) => return noop("list_rename", list_id, &err.to_string()),
        };
        self.update_list("list_rename", list_id, |list| {
            list.title = title;
            true
        })
    }

    /// Selects an existing list.
    pub fn select_list(&self, list_id: ListId) -> bool {
        if self.list(list_id).is_none() {
            return noop("list_select", list_id, "list_not_found");
        }
        self.selected.set(Some(list_id));
        info!("event=list_select module=lists status=ok list_id={list_id}");
        true
    }

    /// Removes `list_id`, queueing a `list` notification with its backup.
    ///
    /// Selection moves to the previous sibling, or the next one when the
    /// removed list was first, or `None` when it was the only list.
    pub fn remove_list(&self, list_id: ListId) -> Option<NotificationId> {
        let current = self.lists();
        let Some(index) = current.iter().position(|list| list.id == list_id) else {
            noop("list_remove", list_id, "list_not_found");
            return None;
        };

        let notification_id = self
            .notifications
            .add(Backup::List(current[index].clone()));

        let selected = if current.len() > 1 && index > 0 {
            Some(current[index - 1].id)
        } else if current.len() > 1 {
            Some(current[index + 1].id)
        } else {
            None
        };

        let mut next: Vec<TodoList> = current
            .iter()
            .filter(|list| list.id != list_id)
            .cloned()
            .collect();
        resequence_lists(&mut next);

        self.commit(next);
        self.selected.set(selected);
        info!(
            "event=list_remove module=lists status=ok list_id={list_id} notification_id={notification_id} selected_list_id={}",
            display_id(selected)
        );
        Some(notification_id)
    }

    /// Appends `task` to `list_id`. The store assigns `position`.
    pub fn add_task(&self, list_id: ListId, mut task: Task) -> bool {
        task.title = match normalize_title(&task.title) {
            Ok(title) => title,
            Err(err) => return noop("task_add", list_id, &err.to_string()),
        };
        let task_id = task.id;
        let added = self.update_list("task_add", list_id, |list| {
            if list.task(task_id).is_some() {
                return false;
            }
            list.tasks.push(task);
            list.resequence_tasks();
            true
        });
        if added {
            self.bump_task_id(task_id);
        }
        added
    }

    /// Creates a task with a store-assigned id. Returns the new id.
    pub fn create_task(&self, list_id: ListId, title: &str) -> Option<TaskId> {
        let task_id = self.next_task_id.get();
        self.add_task(list_id, Task::new(task_id, title))
            .then_some(task_id)
    }

    /// Changes the title of one task.
    pub fn edit_task(&self, list_id: ListId, task_id: TaskId, title: &str) -> bool {
        let title = match normalize_title(title) {
            Ok(title) => title,
            Err(err) => return noop("task_edit", list_id, &err.to_string()),
        };
        self.update_list("task_edit", list_id, |list| {
            match list.tasks.iter_mut().find(|task| task.id == task_id) {
                Some(task) => {
                    task.title = title;
                    true
                }
                None => false,
            }
        })
    }

    /// Flips the completion flag of one task.
    pub fn toggle_task_status(&self, list_id: ListId, task_id: TaskId) -> bool {
        self.update_list("task_toggle", list_id, |list| {
            match list.tasks.iter_mut().find(|task| task.id == task_id) {
                Some(task) => {
                    task.is_done = !task.is_done;
                    true
                }
                None => false,
            }
        })
    }

    /// Removes one task, queueing a `task` notification with its backup.
    pub fn remove_task(&self, list_id: ListId, task_id: TaskId) -> Option<NotificationId> {
        let backup = self.lists.with(|lists| {
            lists
                .iter()
                .find(|list| list.id == list_id)
                .and_then(|list| list.task(task_id))
                .map(|task| TaskBackup::capture(list_id, task))
        });
        let Some(backup) = backup else {
            noop("task_remove", list_id, "task_not_found");
            return None;
        };

        let notification_id = self.notifications.add(Backup::Task(backup));
        self.update_list("task_remove", list_id, |list| {
            list.tasks.retain(|task| task.id != task_id);
            list.resequence_tasks();
            true
        });
        Some(notification_id)
    }

    /// Undoes a removal from the backup held by notification `notification_id`.
    ///
    /// The item is reinserted at its backed-up position and the notification
    /// is dismissed. A restored list becomes selected.
    pub fn restore(&self, notification_id: NotificationId) -> bool {
        let Some(notification) = self.notifications.get(notification_id) else {
            return noop("restore", notification_id, "notification_not_found");
        };

        let mut next = self.snapshot();
        let selected = match notification.backup {
            Backup::List(list) => {
                if next.iter().any(|existing| existing.id == list.id) {
                    return noop("restore", notification_id, "list_id_taken");
                }
                let list_id = list.id;
                let index = insertion_index(list.position, next.len());
                self.observe_ids(std::slice::from_ref(&list));
                next.insert(index, list);
                resequence_lists(&mut next);
                Some(list_id)
            }
            Backup::Task(backup) => {
                let Some(list) = next.iter_mut().find(|list| list.id == backup.list_id) else {
                    return noop("restore", notification_id, "list_not_found");
                };
                if list.task(backup.id).is_some() {
                    return noop("restore", notification_id, "task_id_taken");
                }
                let index = insertion_index(backup.position, list.tasks.len());
                list.tasks.insert(index, backup.to_task());
                list.resequence_tasks();
                self.bump_task_id(backup.id);
                None
            }
        };

        self.notifications.dismiss(notification_id);
        self.commit(next);
        if let Some(list_id) = selected {
            self.selected.set(Some(list_id));
        }
        info!(
            "event=restore module=lists status=ok notification_id={notification_id} kind={}",
            notification.kind.as_str()
        );
        true
    }

    /// Clones the list at `list_id` into a new collection, applies `apply`,
    /// and commits when it reports a change.
    fn update_list(
        &self,
        event: &str,
        list_id: ListId,
        apply: impl FnOnce(&mut TodoList) -> bool,
    ) -> bool {
        let mut next = self.snapshot();
        let Some(list) = next.iter_mut().find(|list| list.id == list_id) else {
            return noop(event, list_id, "list_not_found");
        };
        if !apply(list) {
            return noop(event, list_id, "target_rejected");
        }

        self.commit(next);
        info!("event={event} module=lists status=ok list_id={list_id}");
        true
    }

    /// Persists `next`, then publishes it.
    fn commit(&self, next: Vec<TodoList>) {
        if let Err(err) = save_lists(&self.storage, &self.storage_key, &next) {
            error!(
                "event=lists_persist module=storage status=error error_code=storage_write_failed error={err}"
            );
        }
        self.lists.set(Rc::new(next));
    }

    fn snapshot(&self) -> Vec<TodoList> {
        self.lists.with(|lists| lists.to_vec())
    }

    fn observe_ids(&self, lists: &[TodoList]) {
        for list in lists {
            if list.id >= self.next_list_id.get() {
                self.next_list_id.set(list.id.saturating_add(1));
            }
            for task in &list.tasks {
                self.bump_task_id(task.id);
            }
        }
    }

    fn bump_task_id(&self, task_id: TaskId) {
        if task_id >= self.next_task_id.get() {
            self.next_task_id.set(task_id.saturating_add(1));
        }
    }
}

fn has_duplicate_task_ids(tasks: &[Task]) -> bool {
    let mut seen = HashSet::new();
    tasks.iter().any(|task| !seen.insert(task.id))
}

/// Zero-based slot for a 1-based `position`, clamped to `0..=len`.
fn insertion_index(position: u32, len: usize) -> usize {
    usize::try_from(position.saturating_sub(1))
        .unwrap_or(usize::MAX)
        .min(len)
}

fn noop(event: &str, id: u64, reason: &str) -> bool {
    warn!("event={event} module=lists status=noop id={id} reason={reason}");
    false
}

fn display_id(id: Option<ListId>) -> String {
    id.map_or_else(|| "none".to_string(), |id| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::insertion_index;

    #[test]
    fn insertion_index_clamps_to_bounds() {
        assert_eq!(insertion_index(0, 3), 0);
        assert_eq!(insertion_index(1, 3), 0);
        assert_eq!(insertion_index(3, 3), 2);
        assert_eq!(insertion_index(9, 3), 3);
    }
}
