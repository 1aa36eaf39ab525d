//! Single-slot delivery queue.
//!
//! Holds at most one buffered state and at most one subscriber. A newer state
//! overwrites an unconsumed older one; a newer subscriber replaces the older
//! one. Every delivery goes through the [`Scheduler`], never synchronously.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

use crate::scheduler::Scheduler;

/// Subscriber callback receiving the application state.
pub type StateCallback = Rc<dyn Fn(Value)>;

#[derive(Default)]
struct Slot {
    pending: Option<Value>,
    callback: Option<StateCallback>,
}

/// Buffers the latest state until the subscriber can take it.
///
/// Cloning yields another handle to the same slot.
#[derive(Clone)]
pub struct DeliveryQueue {
    slot: Rc<RefCell<Slot>>,
    scheduler: Rc<dyn Scheduler>,
}

impl DeliveryQueue {
    /// Creates an empty queue delivering through `scheduler`.
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot::default())),
            scheduler,
        }
    }

    /// Registers the subscriber, replacing any previous one.
    ///
    /// A buffered state is handed to the new subscriber on a later turn.
    pub fn subscribe(&self, callback: StateCallback) {
        let replay = {
            let mut slot = self.slot.borrow_mut();
            if slot.callback.is_some() {
                debug!("Replacing state subscriber");
            }
            slot.callback = Some(callback);
            slot.pending.take()
        };

        if let Some(value) = replay {
            debug!("Replaying buffered state to new subscriber");
            self.schedule(value);
        }
    }

    /// Delivers `value` to the subscriber, or buffers it if there is none.
    pub fn push(&self, value: Value) {
        let mut slot = self.slot.borrow_mut();
        if slot.callback.is_some() {
            drop(slot);
            self.schedule(value);
        } else {
            if slot.pending.is_some() {
                debug!("Overwriting unconsumed buffered state");
            } else {
                debug!("No subscriber yet, buffering state");
            }
            slot.pending = Some(value);
        }
    }

    /// Returns `true` if a state is waiting for a subscriber.
    pub fn has_pending(&self) -> bool {
        self.slot.borrow().pending.is_some()
    }

    /// Returns `true` if a subscriber is registered.
    pub fn has_subscriber(&self) -> bool {
        self.slot.borrow().callback.is_some()
    }

    // The subscriber is looked up when the task runs, so a replacement
    // registered in between receives the value instead of the old one.
    fn schedule(&self, value: Value) {
        let slot = Rc::clone(&self.slot);
        debug!("Scheduling state delivery");
        self.scheduler.defer(Box::new(move || {
            let callback = slot.borrow().callback.clone();
            if let Some(callback) = callback {
                callback(value);
            }
        }));
    }
}

impl std::fmt::Debug for DeliveryQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryQueue")
            .field("has_pending", &self.has_pending())
            .field("has_subscriber", &self.has_subscriber())
            .finish()
    }
}
