#![allow(dead_code)]

use std::rc::Rc;
use todolists_core::{
    ListsStore, ManualClock, MemoryStorage, NotificationStore, StoreConfig, Task, TodoList,
};

pub type MemoryListsStore = ListsStore<Rc<MemoryStorage>>;

pub struct Fixture {
    pub store: MemoryListsStore,
    pub storage: Rc<MemoryStorage>,
    pub clock: Rc<ManualClock>,
}

pub fn fixture_with(storage: MemoryStorage) -> Fixture {
    let config = StoreConfig::default();
    let storage = Rc::new(storage);
    let clock = Rc::new(ManualClock::new(0));
    let notifications = Rc::new(NotificationStore::new(&config, clock.clone()));
    let store = ListsStore::new(Rc::clone(&storage), &config, notifications);
    Fixture {
        store,
        storage,
        clock,
    }
}

pub fn empty_fixture() -> Fixture {
    fixture_with(MemoryStorage::new())
}

pub fn list(id: u64, title: &str, position: u32) -> TodoList {
    let mut list = TodoList::new(id, title);
    list.position = position;
    list
}

pub fn task(id: u64, title: &str, position: u32) -> Task {
    let mut task = Task::new(id, title);
    task.position = position;
    task
}

pub fn list_positions(store: &MemoryListsStore) -> Vec<u32> {
    store.lists().iter().map(|list| list.position).collect()
}

pub fn list_ids(store: &MemoryListsStore) -> Vec<u64> {
    store.lists().iter().map(|list| list.id).collect()
}

pub fn task_ids_and_positions(store: &MemoryListsStore, list_id: u64) -> Vec<(u64, u32)> {
    store
        .list(list_id)
        .unwrap()
        .tasks
        .iter()
        .map(|task| (task.id, task.position))
        .collect()
}

pub fn dense(positions: &[u32]) -> bool {
    positions
        .iter()
        .enumerate()
        .all(|(index, position)| *position as usize == index + 1)
}
