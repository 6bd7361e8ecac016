//! Notification store: transient queue of removal notices with undo backups.
//!
//! # Responsibility
//! - Own the notification queue and publish every replacement to subscribers.
//! - Schedule and fire automatic dismissal `dismiss_after_ms` after creation.
//!
//! # Invariants
//! - Notification ids are assigned from a monotonic counter and never reused.
//! - Dismissal is idempotent: manual dismissal and timer expiry race safely,
//!   whichever runs second is a no-op.
//! - Published queues are never mutated after publication.

use crate::clock::Clock;
use crate::config::StoreConfig;
use crate::i18n::{MessageCatalog, MessageFormatter};
use crate::model::notification::{Backup, Notification, NotificationId};
use crate::observable::{Observable, SubscriptionId};
use crate::store::scheduler::DismissScheduler;
use log::{debug, info};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Published snapshot of the notification queue.
pub type NotificationQueue = Rc<Vec<Notification>>;

/// Owner of the notification queue.
pub struct NotificationStore {
    queue: Observable<NotificationQueue>,
    scheduler: RefCell<DismissScheduler>,
    next_id: Cell<NotificationId>,
    dismiss_after_ms: u64,
    clock: Rc<dyn Clock>,
    formatter: Box<dyn MessageFormatter>,
}

impl NotificationStore {
    /// Creates an empty store rendering messages with the built-in catalog.
    pub fn new(config: &StoreConfig, clock: Rc<dyn Clock>) -> Self {
        Self::with_formatter(config, clock, Box::new(MessageCatalog::new(config.locale)))
    }

    /// Creates an empty store rendering messages with a host formatter.
    pub fn with_formatter(
        config: &StoreConfig,
        clock: Rc<dyn Clock>,
        formatter: Box<dyn MessageFormatter>,
    ) -> Self {
        Self {
            queue: Observable::new(Rc::new(Vec::new())),
            scheduler: RefCell::new(DismissScheduler::new()),
            next_id: Cell::new(1),
            dismiss_after_ms: config.dismiss_after_ms,
            clock,
            formatter,
        }
    }

    /// Queues a notification for a removed item and schedules its expiry.
    pub fn add(&self, backup: Backup) -> NotificationId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let kind = backup.kind();
        let now_ms = self.clock.now_ms();
        let notification = Notification {
            id,
            kind,
            text: self.formatter.removal_message(kind, backup.title()),
            backup,
            created_at_ms: now_ms,
        };

        let mut next = self.queue.with(|queue| queue.to_vec());
        next.push(notification);
        self.scheduler
            .borrow_mut()
            .schedule(id, now_ms.saturating_add(self.dismiss_after_ms));
        self.queue.set(Rc::new(next));

        info!(
            "event=notification_add module=notifications status=ok notification_id={id} kind={}",
            kind.as_str()
        );
        id
    }

    /// Removes the notification with `id`. Returns `false` if it was already gone.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        self.take(id).is_some()
    }

    /// Removes and returns the notification with `id`, cancelling its timer.
    pub fn take(&self, id: NotificationId) -> Option<Notification> {
        self.scheduler.borrow_mut().cancel(id);
        let removed = self.remove_entry(id);
        match &removed {
            Some(_) => info!(
                "event=notification_dismiss module=notifications status=ok notification_id={id} trigger=manual"
            ),
            None => debug!(
                "event=notification_dismiss module=notifications status=noop notification_id={id} reason=not_found"
            ),
        }
        removed
    }

    /// Fires every expired dismissal timer. Returns how many entries expired.
    ///
    /// Hosts call this from their event loop, ideally at `next_deadline()`.
    pub fn run_due_timers(&self) -> usize {
        let now_ms = self.clock.now_ms();
        let due = self.scheduler.borrow_mut().take_due(now_ms);
        let mut expired = 0;
        for id in due {
            if self.remove_entry(id).is_some() {
                expired += 1;
                info!(
                    "event=notification_dismiss module=notifications status=ok notification_id={id} trigger=timeout"
                );
            }
        }
        expired
    }

    /// Clock reading at which the next pending timer fires.
    pub fn next_deadline(&self) -> Option<u64> {
        self.scheduler.borrow().next_deadline()
    }

    /// Current queue snapshot, oldest first.
    pub fn notifications(&self) -> NotificationQueue {
        self.queue.get()
    }

    pub fn get(&self, id: NotificationId) -> Option<Notification> {
        self.queue
            .with(|queue| queue.iter().find(|entry| entry.id == id).cloned())
    }

    pub fn len(&self) -> usize {
        self.queue.with(|queue| queue.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&NotificationQueue) + 'static,
    {
        self.queue.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.queue.unsubscribe(id)
    }

    fn remove_entry(&self, id: NotificationId) -> Option<Notification> {
        let (removed, next) = self.queue.with(|queue| {
            let index = queue.iter().position(|entry| entry.id == id)?;
            let mut next = queue.to_vec();
            let removed = next.remove(index);
            Some((removed, next))
        })?;
        self.queue.set(Rc::new(next));
        Some(removed)
    }
}
