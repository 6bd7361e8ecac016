//! Domain model for lists, tasks and removal notifications.
//!
//! # Responsibility
//! - Define the canonical list/task records shared by stores and storage.
//! - Define the notification record that carries removal backups.
//!
//! # Invariants
//! - `position` is a 1-based dense rank among siblings once a store mutation
//!   completes.
//! - Backups are copies; they never alias live store data.

pub mod list;
pub mod notification;
