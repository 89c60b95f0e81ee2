// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test doubles shared by the unit tests

use crate::error::DeliveryError;
use crate::event::Event;
use crate::id::IdGen;
use crate::subscriber::Subscriber;
use crate::subscription::Subscription;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
    Accept,
    Fail,
    Panic,
}

/// Subscriber that records what it receives
pub struct RecordingSubscriber {
    subscriptions: Vec<Subscription>,
    received: Mutex<Vec<Event>>,
    behavior: Behavior,
    panic_on_match: bool,
    panic_on_stop: bool,
    stops: AtomicUsize,
}

impl RecordingSubscriber {
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
            received: Mutex::new(Vec::new()),
            behavior: Behavior::Accept,
            panic_on_match: false,
            panic_on_stop: false,
            stops: AtomicUsize::new(0),
        }
    }

    pub fn subscribed(subscription: Subscription) -> Self {
        Self::new().with_subscription(subscription)
    }

    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.subscriptions.push(subscription);
        self
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn panicking_on_match(mut self) -> Self {
        self.panic_on_match = true;
        self
    }

    pub fn panicking_on_stop(mut self) -> Self {
        self.panic_on_stop = true;
        self
    }

    pub fn received(&self) -> Vec<Event> {
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl Subscriber for RecordingSubscriber {
    fn match_event(&self, event: &Event) -> Option<Subscription> {
        if self.panic_on_match {
            panic!("match exploded");
        }
        self.subscriptions.iter().find(|s| s.matches(event)).cloned()
    }

    fn on_event(&self, event: Event) -> Result<(), DeliveryError> {
        match self.behavior {
            Behavior::Accept => {
                self.received
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push(event);
                Ok(())
            }
            Behavior::Fail => Err(DeliveryError::Rejected("test failure".to_string())),
            Behavior::Panic => panic!("delivery exploded"),
        }
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        if self.panic_on_stop {
            panic!("stop exploded");
        }
    }
}

/// Id generator that replays a fixed script, then numbers ids
#[derive(Clone)]
pub struct ScriptedIdGen {
    script: Arc<Mutex<VecDeque<String>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedIdGen {
    pub fn new(ids: &[&str]) -> Self {
        Self {
            script: Arc::new(Mutex::new(ids.iter().map(|s| s.to_string()).collect())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IdGen for ScriptedIdGen {
    fn next(&self) -> String {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| format!("id-{}", n))
    }
}
