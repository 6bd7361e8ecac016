//! Deadline bookkeeping for notification auto-dismissal.
//!
//! # Invariants
//! - At most one pending deadline per notification id.
//! - `take_due` yields ids ordered by `(deadline, id)` and forgets them.

use crate::model::notification::NotificationId;
use std::collections::BTreeMap;

/// Pending dismissal timers keyed by notification id.
#[derive(Debug, Default)]
pub struct DismissScheduler {
    deadlines: BTreeMap<NotificationId, u64>,
}

impl DismissScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules (or reschedules) dismissal of `id` at `deadline_ms`.
    pub fn schedule(&mut self, id: NotificationId, deadline_ms: u64) {
        self.deadlines.insert(id, deadline_ms);
    }

    /// Cancels the pending timer for `id`. Returns `false` if none was pending.
    pub fn cancel(&mut self, id: NotificationId) -> bool {
        self.deadlines.remove(&id).is_some()
    }

    /// Removes and returns every id whose deadline is `<= now_ms`.
    pub fn take_due(&mut self, now_ms: u64) -> Vec<NotificationId> {
        let mut due: Vec<(u64, NotificationId)> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now_ms)
            .map(|(id, deadline)| (*deadline, *id))
            .collect();
        due.sort_unstable();
        for (_, id) in &due {
            self.deadlines.remove(id);
        }
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.deadlines.values().min().copied()
    }

    pub fn pending(&self) -> usize {
        self.deadlines.len()
    }
}
