//! Client-side state layer for a to-do list application.
//!
//! The lists store owns lists, tasks and the selected list, persisting every
//! change through a key/value storage backend. The notification store keeps
//! time-boxed removal notices that carry enough data to undo the removal.

pub mod clock;
pub mod config;
pub mod db;
pub mod i18n;
pub mod logging;
pub mod model;
pub mod observable;
pub mod persistence;
pub mod storage;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, StoreConfig, DEFAULT_DISMISS_AFTER_MS, DEFAULT_STORAGE_KEY};
pub use i18n::{Locale, MessageCatalog, MessageFormatter};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::list::{ListId, ModelError, Task, TaskId, TodoList};
pub use model::notification::{
    Backup, Notification, NotificationId, NotificationKind, TaskBackup,
};
pub use observable::{Observable, SubscriptionId};
pub use persistence::SnapshotError;
pub use storage::{KeyValueStorage, MemoryStorage, SqliteStorage, StorageError, StorageResult};
pub use store::lists::{ListCollection, ListsStore};
pub use store::notifications::{NotificationQueue, NotificationStore};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
