//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `todolists_core` linkage.
//! - Print the lists persisted in a SQLite snapshot file when one is given.

use std::process::ExitCode;
use std::rc::Rc;
use todolists_core::{ListsStore, NotificationStore, SqliteStorage, StoreConfig, SystemClock};

fn main() -> ExitCode {
    println!("todolists_core ping={}", todolists_core::ping());
    println!("todolists_core version={}", todolists_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let storage = match SqliteStorage::open(&db_path) {
        Ok(storage) => storage,
        Err(err) => {
            eprintln!("failed to open `{db_path}`: {err}");
            return ExitCode::FAILURE;
        }
    };

    let config = StoreConfig::default();
    let notifications = Rc::new(NotificationStore::new(&config, Rc::new(SystemClock::new())));
    let store = ListsStore::new(storage, &config, notifications);
    let selected = store.selected_list_id();
    for list in store.lists().iter() {
        let marker = if Some(list.id) == selected { "*" } else { " " };
        println!(
            "{marker} {}. {} ({}/{})",
            list.position,
            list.title,
            list.done_count(),
            list.tasks.len()
        );
    }
    ExitCode::SUCCESS
}
