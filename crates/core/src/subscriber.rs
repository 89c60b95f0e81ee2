// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscriber capability and the default queue-backed subscriber
//!
//! The dispatcher only ever talks to a session through [`Subscriber`]. It
//! hands over a private copy of every event and never waits on the transport:
//! [`QueueSubscriber`] parks events in a bounded queue that the transport
//! drains at its own pace, and reports a full queue instead of blocking.

use crate::error::DeliveryError;
use crate::event::Event;
use crate::subscription::{Subscription, SubscriptionId};
use std::sync::{Mutex, RwLock};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Receiving end handed to the transport
pub type EventReceiver = mpsc::Receiver<Event>;

/// Matches events against a session's interests and accepts delivery
///
/// Implementations must not call back into the dispatcher from `on_event`.
pub trait Subscriber: Send + Sync {
    /// First subscription matching the event, if any
    fn match_event(&self, event: &Event) -> Option<Subscription>;

    /// Take ownership of one delivered event
    fn on_event(&self, event: Event) -> Result<(), DeliveryError>;

    /// The owning session stopped; release delivery resources
    fn stop(&self) {}
}

/// Subscriber that buffers delivered events in a bounded queue
pub struct QueueSubscriber {
    subscriptions: RwLock<Vec<Subscription>>,
    sender: Mutex<Option<mpsc::Sender<Event>>>,
    receiver: Mutex<Option<EventReceiver>>,
    capacity: usize,
}

impl QueueSubscriber {
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            subscriptions: RwLock::new(Vec::new()),
            sender: Mutex::new(Some(tx)),
            receiver: Mutex::new(Some(rx)),
            capacity,
        }
    }

    /// Register interest; replaces an existing subscription with the same id
    pub fn add_subscription(&self, subscription: Subscription) {
        let mut subs = self
            .subscriptions
            .write()
            .unwrap_or_else(|e| e.into_inner());
        match subs.iter_mut().find(|s| s.id == subscription.id) {
            Some(existing) => *existing = subscription,
            None => subs.push(subscription),
        }
    }

    pub fn remove_subscription(&self, id: &SubscriptionId) -> Option<Subscription> {
        let mut subs = self
            .subscriptions
            .write()
            .unwrap_or_else(|e| e.into_inner());
        let pos = subs.iter().position(|s| &s.id == id)?;
        Some(subs.remove(pos))
    }

    pub fn remove_subscriptions(&self) {
        self.subscriptions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.subscriptions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// The queue's receiving end; only the first caller gets it
    pub fn take_receiver(&self) -> Option<EventReceiver> {
        self.receiver
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_closed(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_none()
    }
}

impl Default for QueueSubscriber {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl Subscriber for QueueSubscriber {
    fn match_event(&self, event: &Event) -> Option<Subscription> {
        self.subscriptions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|s| s.matches(event))
            .cloned()
    }

    fn on_event(&self, event: Event) -> Result<(), DeliveryError> {
        let sender = self.sender.lock().unwrap_or_else(|e| e.into_inner());
        let Some(tx) = sender.as_ref() else {
            return Err(DeliveryError::Closed);
        };
        tx.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::QueueFull(self.capacity),
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    fn stop(&self) {
        // Dropping the sender lets the transport drain what is queued, then see the end
        self.sender
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
    }
}

#[cfg(test)]
#[path = "subscriber_tests.rs"]
mod tests;
