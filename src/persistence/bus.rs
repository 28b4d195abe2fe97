//! # Change Notification
//!
//! Explicit publish/subscribe over the durable store. Every write through a
//! [`DurableStore`](super::DurableStore) publishes one [`StorageEvent`]
//! after the slot has been written; every live subscription receives it,
//! including the writer's own context. Writes made by another process are
//! relayed with the [`EXTERNAL_CONTEXT`] origin.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Mutex;
use std::time::Duration;

use uuid::Uuid;

use super::store::StoreKey;

/// Identifies one handle onto a shared store
pub type ContextId = Uuid;

/// Origin of changes made outside this process
pub const EXTERNAL_CONTEXT: ContextId = Uuid::nil();

/// "Slot `key` was just written"
#[derive(Debug, Clone, PartialEq)]
pub struct StorageEvent {
    /// Slot that changed
    pub key: StoreKey,
    /// Encoded value now in the slot; `None` when removed
    pub new_value: Option<String>,
    /// Context that performed the write
    pub origin: ContextId,
}

impl StorageEvent {
    /// True if the event concerns `key`
    pub fn is_for(&self, key: StoreKey) -> bool {
        self.key == key
    }

    /// True if the event was produced by a context other than `context`
    pub fn is_foreign_to(&self, context: ContextId) -> bool {
        self.origin != context
    }

    /// True if another process made the change
    pub fn is_external(&self) -> bool {
        self.origin == EXTERNAL_CONTEXT
    }
}

/// Fan-out channel shared by every context of one store
#[derive(Debug, Default)]
pub struct ChangeBus {
    subscribers: Mutex<Vec<Sender<StorageEvent>>>,
}

impl ChangeBus {
    /// Create a bus with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }
        Subscription { receiver: rx }
    }

    /// Deliver `event` to every live subscriber, dropping closed ones.
    ///
    /// Returns the number of subscribers reached.
    pub fn publish(&self, event: &StorageEvent) -> usize {
        match self.subscribers.lock() {
            Ok(mut subs) => {
                subs.retain(|tx| tx.send(event.clone()).is_ok());
                subs.len()
            }
            Err(_) => 0,
        }
    }

    /// Number of registered listeners (closed ones are pruned on publish)
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}

/// Receiving end of a [`ChangeBus`] registration. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    receiver: Receiver<StorageEvent>,
}

impl Subscription {
    /// Next pending event, without blocking
    pub fn try_next(&self) -> Option<StorageEvent> {
        self.receiver.try_recv().ok()
    }

    /// Wait up to `timeout` for the next event
    pub fn next_timeout(&self, timeout: Duration) -> Option<StorageEvent> {
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// All pending events, oldest first
    pub fn drain(&self) -> Vec<StorageEvent> {
        self.receiver.try_iter().collect()
    }

    /// Pending events for `key`, discarding the rest
    pub fn drain_for(&self, key: StoreKey) -> Vec<StorageEvent> {
        self.drain().into_iter().filter(|e| e.is_for(key)).collect()
    }
}
