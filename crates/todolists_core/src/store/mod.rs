//! Stateful stores consumed by the rendering layer.
//!
//! # Responsibility
//! - `ListsStore` owns lists, tasks and selection, and persists every change.
//! - `NotificationStore` owns the removal notification queue and its expiry.
//!
//! # Invariants
//! - Stores are single-threaded; every operation runs to completion before
//!   another one starts, so no locking is involved.

pub mod lists;
pub mod notifications;
pub mod scheduler;
