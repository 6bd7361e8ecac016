//! Synchronous publish/subscribe value holder.
//!
//! # Responsibility
//! - Hold the latest published value of a store slice.
//! - Invoke every subscriber synchronously with each replacement value.
//!
//! # Invariants
//! - `set` replaces the value before any subscriber runs.
//! - Subscribers may subscribe, unsubscribe or read the observable while being
//!   notified; the subscriber set is snapshotted per notification round.
//! - Subscribing does not invoke the callback.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Handle returned by `subscribe`; pass it to `unsubscribe`.
pub type SubscriptionId = u64;

type Subscriber<T> = Rc<dyn Fn(&T)>;

/// Single-threaded observable value.
pub struct Observable<T> {
    value: RefCell<T>,
    subscribers: RefCell<BTreeMap<SubscriptionId, Subscriber<T>>>,
    next_id: Cell<SubscriptionId>,
}

impl<T: Clone> Observable<T> {
    /// Creates an observable holding `initial`, with no subscribers.
    pub fn new(initial: T) -> Self {
        Self {
            value: RefCell::new(initial),
            subscribers: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(1),
        }
    }

    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Reads the current value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Replaces the value and notifies subscribers in subscription order.
    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value.clone();
        let subscribers: Vec<Subscriber<T>> =
            self.subscribers.borrow().values().cloned().collect();
        for subscriber in subscribers {
            subscriber(&value);
        }
    }

    /// Registers `callback` for every future `set`.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.subscribers.borrow_mut().insert(id, Rc::new(callback));
        id
    }

    /// Removes a subscriber. Returns `false` when the handle is unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.borrow_mut().remove(&id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}
