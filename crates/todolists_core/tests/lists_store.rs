mod common;

use common::{
    dense, empty_fixture, fixture_with, list, list_ids, list_positions, task,
    task_ids_and_positions,
};
use std::cell::RefCell;
use std::rc::Rc;
use todolists_core::persistence::decode_lists;
use todolists_core::{
    Backup, KeyValueStorage, MemoryStorage, NotificationKind, TaskBackup, TodoList,
};

fn persisted(storage: &MemoryStorage) -> Vec<TodoList> {
    decode_lists(&storage.get("lists").unwrap().unwrap()).unwrap()
}

#[test]
fn empty_storage_starts_empty_without_selection() {
    let fixture = empty_fixture();
    assert!(fixture.store.lists().is_empty());
    assert_eq!(fixture.store.selected_list_id(), None);
}

#[test]
fn empty_array_snapshot_starts_without_selection() {
    let fixture = fixture_with(MemoryStorage::with_entry("lists", "[]"));
    assert!(fixture.store.lists().is_empty());
    assert_eq!(fixture.store.selected_list_id(), None);
}

#[test]
fn corrupt_snapshot_starts_empty() {
    let fixture = fixture_with(MemoryStorage::with_entry("lists", "[{\"id\":"));
    assert!(fixture.store.lists().is_empty());
    assert_eq!(fixture.store.selected_list_id(), None);
}

#[test]
fn hydrated_store_selects_first_list() {
    let raw = r#"[{"id":4,"title":"Work","position":1,"tasks":[]},{"id":2,"title":"Home","position":2,"tasks":[]}]"#;
    let fixture = fixture_with(MemoryStorage::with_entry("lists", raw));
    assert_eq!(list_ids(&fixture.store), vec![4, 2]);
    assert_eq!(fixture.store.selected_list_id(), Some(4));
}

#[test]
fn add_then_remove_list_scenario() {
    let raw = r#"[{"id":1,"title":"A","position":1,"tasks":[]}]"#;
    let fixture = fixture_with(MemoryStorage::with_entry("lists", raw));
    let store = &fixture.store;
    assert_eq!(store.selected_list_id(), Some(1));

    assert!(store.add_list(list(2, "B", 2)));
    assert_eq!(store.lists().len(), 2);
    assert_eq!(store.selected_list_id(), Some(2));

    let notification_id = store.remove_list(2).unwrap();
    assert_eq!(list_ids(store), vec![1]);
    assert_eq!(store.selected_list_id(), Some(1));

    let queue = store.notifications().notifications();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id, notification_id);
    assert_eq!(queue[0].kind, NotificationKind::List);
    assert_eq!(queue[0].backup, Backup::List(list(2, "B", 2)));
    assert_eq!(queue[0].backup.title(), "B");
}

#[test]
fn add_list_assigns_position_and_persists() {
    let fixture = empty_fixture();
    let store = &fixture.store;

    assert!(store.add_list(list(10, "  Groceries  ", 42)));
    assert!(store.add_list(list(11, "Chores", 0)));

    assert_eq!(list_positions(store), vec![1, 2]);
    assert_eq!(store.list(10).unwrap().title, "Groceries");
    assert_eq!(persisted(&fixture.storage), store.lists().to_vec());
}

#[test]
fn add_list_rejects_blank_title_and_duplicate_id() {
    let fixture = empty_fixture();
    let store = &fixture.store;
    assert!(store.add_list(list(1, "A", 1)));

    assert!(!store.add_list(list(2, "   ", 2)));
    assert!(!store.add_list(list(1, "Again", 2)));

    let mut duplicated_tasks = list(3, "C", 2);
    duplicated_tasks.tasks = vec![task(5, "x", 1), task(5, "y", 2)];
    assert!(!store.add_list(duplicated_tasks));

    assert_eq!(list_ids(store), vec![1]);
    assert_eq!(store.selected_list_id(), Some(1));
}

#[test]
fn positions_stay_dense_across_add_remove_sequences() {
    let fixture = empty_fixture();
    let store = &fixture.store;

    for id in 1..=6 {
        assert!(store.add_list(list(id, &format!("L{id}"), 0)));
        assert!(dense(&list_positions(store)));
    }
    for id in [3, 1, 6, 4] {
        store.remove_list(id).unwrap();
        assert!(dense(&list_positions(store)));
    }
    assert_eq!(list_ids(store), vec![2, 5]);
    assert!(store.add_list(list(7, "L7", 0)));
    assert_eq!(list_positions(store), vec![1, 2, 3]);
}

#[test]
fn task_positions_stay_dense_across_add_remove_sequences() {
    let fixture = empty_fixture();
    let store = &fixture.store;
    store.add_list(list(1, "A", 1));

    for id in 10..15 {
        assert!(store.add_task(1, task(id, "t", 99)));
        let positions: Vec<u32> = task_ids_and_positions(store, 1)
            .into_iter()
            .map(|(_, position)| position)
            .collect();
        assert!(dense(&positions));
    }
    for id in [10, 13, 14] {
        store.remove_task(1, id).unwrap();
        let positions: Vec<u32> = task_ids_and_positions(store, 1)
            .into_iter()
            .map(|(_, position)| position)
            .collect();
        assert!(dense(&positions));
    }
    assert_eq!(task_ids_and_positions(store, 1), vec![(11, 1), (12, 2)]);
}

#[test]
fn remove_middle_list_selects_previous_sibling() {
    let fixture = empty_fixture();
    let store = &fixture.store;
    for id in 1..=3 {
        store.add_list(list(id, "x", 0));
    }
    store.select_list(2);

    store.remove_list(2).unwrap();
    assert_eq!(store.selected_list_id(), Some(1));
    assert_eq!(list_positions(store), vec![1, 2]);
}

#[test]
fn remove_first_list_selects_next_sibling() {
    let fixture = empty_fixture();
    let store = &fixture.store;
    for id in 1..=3 {
        store.add_list(list(id, "x", 0));
    }
    store.select_list(1);

    store.remove_list(1).unwrap();
    assert_eq!(store.selected_list_id(), Some(2));
}

#[test]
fn remove_only_list_clears_selection() {
    let fixture = empty_fixture();
    let store = &fixture.store;
    store.add_list(list(1, "only", 0));

    store.remove_list(1).unwrap();
    assert!(store.lists().is_empty());
    assert_eq!(store.selected_list_id(), None);
    assert_eq!(persisted(&fixture.storage), Vec::<TodoList>::new());
}

#[test]
fn remove_task_scenario_keeps_pre_removal_position_in_backup() {
    let fixture = empty_fixture();
    let store = &fixture.store;
    let mut seeded = list(1, "A", 1);
    seeded.tasks = vec![task(10, "a", 1), task(11, "b", 2), task(12, "c", 3)];
    store.set_all(vec![seeded]);

    let notification_id = store.remove_task(1, 11).unwrap();
    assert_eq!(task_ids_and_positions(store, 1), vec![(10, 1), (12, 2)]);

    let notification = store.notifications().get(notification_id).unwrap();
    assert_eq!(notification.kind, NotificationKind::Task);
    assert_eq!(
        notification.backup,
        Backup::Task(TaskBackup {
            list_id: 1,
            id: 11,
            position: 2,
            title: "b".to_string(),
            is_done: false,
        })
    );
}

#[test]
fn removals_emit_exactly_one_notification_each() {
    let fixture = empty_fixture();
    let store = &fixture.store;
    store.add_list(list(1, "A", 0));
    store.add_task(1, task(5, "t", 0));

    store.remove_task(1, 5).unwrap();
    assert_eq!(store.notifications().len(), 1);
    store.remove_list(1).unwrap();
    assert_eq!(store.notifications().len(), 2);

    assert!(store.remove_list(1).is_none());
    assert!(store.remove_task(1, 5).is_none());
    assert_eq!(store.notifications().len(), 2);
}

#[test]
fn missing_ids_are_no_ops() {
    let fixture = empty_fixture();
    let store = &fixture.store;
    store.add_list(list(1, "A", 0));
    store.add_task(1, task(2, "t", 0));
    let before = store.lists();
    let persisted_before = fixture.storage.get("lists").unwrap();

    assert!(!store.edit_list(9, list(9, "Z", 1)));
    assert!(!store.rename_list(9, "Z"));
    assert!(!store.select_list(9));
    assert!(!store.add_task(9, task(3, "t", 0)));
    assert!(!store.edit_task(1, 99, "renamed"));
    assert!(!store.edit_task(9, 2, "renamed"));
    assert!(!store.toggle_task_status(1, 99));
    assert!(!store.add_task(1, task(2, "duplicate", 0)));

    assert!(Rc::ptr_eq(&before, &store.lists()));
    assert_eq!(fixture.storage.get("lists").unwrap(), persisted_before);
    assert!(store.notifications().is_empty());
}

#[test]
fn edit_list_replaces_in_place_keeping_id_and_position() {
    let fixture = empty_fixture();
    let store = &fixture.store;
    for id in 1..=3 {
        store.add_list(list(id, "x", 0));
    }

    let mut updated = list(77, "Renamed", 9);
    updated.tasks = vec![task(4, "new", 7)];
    assert!(store.edit_list(2, updated));

    let edited = store.list(2).unwrap();
    assert_eq!(edited.title, "Renamed");
    assert_eq!(edited.position, 2);
    assert_eq!(edited.tasks, vec![task(4, "new", 1)]);
    assert_eq!(list_ids(store), vec![1, 2, 3]);
    assert!(store.list(77).is_none());
}

#[test]
fn task_edits_and_toggles_update_one_task() {
    let fixture = empty_fixture();
    let store = &fixture.store;
    store.add_list(list(1, "A", 0));
    store.add_task(1, task(1, "first", 0));
    store.add_task(1, task(2, "second", 0));

    assert!(store.edit_task(1, 2, " Second! "));
    assert!(store.toggle_task_status(1, 1));
    let current = store.list(1).unwrap();
    assert_eq!(current.tasks[1].title, "Second!");
    assert!(current.tasks[0].is_done);
    assert!(!current.tasks[1].is_done);

    assert!(store.toggle_task_status(1, 1));
    assert!(!store.list(1).unwrap().tasks[0].is_done);
    assert!(!store.edit_task(1, 1, "  "));
    assert!(store.rename_list(1, "Renamed"));
    assert_eq!(store.list(1).unwrap().title, "Renamed");
    assert_eq!(persisted(&fixture.storage), store.lists().to_vec());
}

#[test]
fn mutations_never_touch_previously_published_collections() {
    let fixture = empty_fixture();
    let store = &fixture.store;
    store.add_list(list(1, "A", 0));
    store.add_task(1, task(1, "t", 0));

    let before = store.lists();
    let before_copy = before.to_vec();
    store.toggle_task_status(1, 1);
    store.add_list(list(2, "B", 0));
    store.remove_task(1, 1);

    assert_eq!(*before, before_copy);
    assert!(!Rc::ptr_eq(&before, &store.lists()));
}

#[test]
fn subscribers_see_every_new_collection_and_selection() {
    let fixture = empty_fixture();
    let store = &fixture.store;
    let collections = Rc::new(RefCell::new(Vec::new()));
    let selections = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&collections);
    let lists_subscription =
        store.subscribe_lists(move |lists| sink.borrow_mut().push(lists.len()));
    let sink = Rc::clone(&selections);
    store.subscribe_selection(move |selected| sink.borrow_mut().push(*selected));

    store.add_list(list(1, "A", 0));
    store.add_list(list(2, "B", 0));
    store.remove_list(1);

    assert_eq!(*collections.borrow(), vec![1, 2, 1]);
    assert_eq!(*selections.borrow(), vec![Some(1), Some(2), Some(2)]);

    assert!(store.unsubscribe_lists(lists_subscription));
    store.add_list(list(3, "C", 0));
    assert_eq!(collections.borrow().len(), 3);
}

#[test]
fn subscriber_reads_consistent_state_on_selection_change() {
    let fixture = empty_fixture();
    let store = Rc::new(fixture.store);
    let observed = Rc::new(RefCell::new(Vec::new()));

    let reader = Rc::clone(&store);
    let sink = Rc::clone(&observed);
    store.subscribe_selection(move |selected| {
        let resolved = selected.and_then(|list_id| reader.list(list_id)).is_some();
        sink.borrow_mut().push((*selected, resolved));
    });

    store.add_list(list(1, "A", 0));
    store.remove_list(1);
    assert_eq!(*observed.borrow(), vec![(Some(1), true), (None, false)]);
}

#[test]
fn set_all_replaces_collection_and_repairs_selection() {
    let fixture = empty_fixture();
    let store = &fixture.store;
    store.add_list(list(1, "A", 0));

    store.set_all(vec![list(5, "E", 1), list(6, "F", 2)]);
    assert_eq!(list_ids(store), vec![5, 6]);
    assert_eq!(store.selected_list_id(), Some(5));
    assert_eq!(persisted(&fixture.storage), store.lists().to_vec());

    store.select_list(6);
    store.set_all(vec![list(6, "F", 1)]);
    assert_eq!(store.selected_list_id(), Some(6));

    store.set_all(Vec::new());
    assert_eq!(store.selected_list_id(), None);
}

#[test]
fn created_ids_are_monotonic_and_never_reused() {
    let raw = r#"[{"id":5,"title":"A","position":1,"tasks":[{"id":40,"title":"t","isDone":false,"position":1}]}]"#;
    let fixture = fixture_with(MemoryStorage::with_entry("lists", raw));
    let store = &fixture.store;

    let created = store.create_list("B").unwrap();
    assert_eq!(created, 6);
    assert_eq!(store.selected_list_id(), Some(6));
    store.remove_list(created).unwrap();
    assert_eq!(store.create_list("C").unwrap(), 7);

    let task_id = store.create_task(5, "next").unwrap();
    assert_eq!(task_id, 41);
    assert_eq!(store.list(5).unwrap().task(41).unwrap().position, 2);

    assert!(store.create_list(" ").is_none());
    assert!(store.create_task(99, "orphan").is_none());
}

#[test]
fn restore_list_reinserts_at_backed_up_position() {
    let fixture = empty_fixture();
    let store = &fixture.store;
    for id in 1..=3 {
        store.add_list(list(id, "x", 0));
    }
    store.add_task(2, task(9, "kept", 0));
    let removed = store.list(2).unwrap();

    let notification_id = store.remove_list(2).unwrap();
    assert!(store.restore(notification_id));

    assert_eq!(list_ids(store), vec![1, 2, 3]);
    assert_eq!(list_positions(store), vec![1, 2, 3]);
    assert_eq!(store.list(2).unwrap(), removed);
    assert_eq!(store.selected_list_id(), Some(2));
    assert!(store.notifications().is_empty());
    assert!(!store.restore(notification_id));
}

#[test]
fn restore_task_reinserts_into_owning_list() {
    let fixture = empty_fixture();
    let store = &fixture.store;
    store.add_list(list(1, "A", 0));
    for id in 1..=3 {
        store.add_task(1, task(id, "t", 0));
    }
    store.toggle_task_status(1, 2);

    let notification_id = store.remove_task(1, 2).unwrap();
    store.remove_task(1, 3).unwrap();
    assert!(store.restore(notification_id));

    assert_eq!(task_ids_and_positions(store, 1), vec![(1, 1), (2, 2)]);
    assert!(store.list(1).unwrap().task(2).unwrap().is_done);
    assert_eq!(store.notifications().len(), 1);
}

#[test]
fn restore_task_is_noop_when_owning_list_is_gone() {
    let fixture = empty_fixture();
    let store = &fixture.store;
    store.add_list(list(1, "A", 0));
    store.add_task(1, task(1, "t", 0));

    let notification_id = store.remove_task(1, 1).unwrap();
    store.remove_list(1).unwrap();

    assert!(!store.restore(notification_id));
    assert!(store.notifications().get(notification_id).is_some());
}

#[test]
fn restore_is_unavailable_after_expiry() {
    let fixture = empty_fixture();
    let store = &fixture.store;
    store.add_list(list(1, "A", 0));

    let notification_id = store.remove_list(1).unwrap();
    fixture.clock.advance(8_000);
    assert_eq!(store.notifications().run_due_timers(), 1);

    assert!(!store.restore(notification_id));
    assert!(store.lists().is_empty());
}
