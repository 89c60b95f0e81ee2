// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Routes events to subscribers
//!
//! The dispatcher keeps no routing state of its own. Every call pulls the
//! registry's current snapshot and walks it, handing each recipient a private
//! copy of the event. Calls on one dispatcher are serialized; the walk itself
//! never blocks registry writers because the snapshot is immutable.
//!
//! A failing subscriber (error or panic, in matching or in delivery) is
//! logged and skipped; the rest of the snapshot still gets the event.

use crate::clock::Clock;
use crate::event::{Event, FIELD_SUBSCRIPTION_ID, FIELD_SUBSCRIPTION_LABEL};
use crate::id::IdGen;
use crate::registry::SessionManager;
use crate::session::Session;
use crate::subscription::Subscription;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub struct Dispatcher<C: Clock, G: IdGen> {
    sessions: SessionManager<C, G>,
    /// Held for the duration of one broadcast/multicast/unicast
    routing: Mutex<()>,
    running: AtomicBool,
}

impl<C: Clock, G: IdGen> Dispatcher<C, G> {
    pub fn new(sessions: SessionManager<C, G>) -> Self {
        Self {
            sessions,
            routing: Mutex::new(()),
            running: AtomicBool::new(false),
        }
    }

    pub fn sessions(&self) -> &SessionManager<C, G> {
        &self.sessions
    }

    /// Send a copy of `event` to every session; returns successful deliveries
    pub fn broadcast(&self, event: &Event) -> usize {
        let _routing = self.routing.lock().unwrap_or_else(|e| e.into_inner());
        let snapshot = self.sessions.get_snapshot();

        let mut delivered = 0;
        for session in snapshot.iter() {
            if deliver(session, event.clone()) {
                delivered += 1;
            }
        }
        delivered
    }

    /// Send to every session whose subscriber matches the event
    ///
    /// Each recipient's copy is stamped with the matched subscription's id
    /// and, when present, its label. A label set by the producer is dropped.
    pub fn multicast(&self, event: &Event) -> usize {
        let _routing = self.routing.lock().unwrap_or_else(|e| e.into_inner());
        let snapshot = self.sessions.get_snapshot();

        let mut delivered = 0;
        for session in snapshot.iter() {
            let Some(subscription) = match_guarded(session, event) else {
                continue;
            };

            let mut personal = event.clone();
            // Correlation fields belong to the engine, not the producer
            personal.remove_field(FIELD_SUBSCRIPTION_LABEL);
            personal.set_field(FIELD_SUBSCRIPTION_ID, subscription.id.0);
            if let Some(label) = subscription.label {
                personal.set_field(FIELD_SUBSCRIPTION_LABEL, label);
            }

            if deliver(session, personal) {
                delivered += 1;
            }
        }
        delivered
    }

    /// Send to one session by id; an unknown id is a logged no-op
    pub fn unicast(&self, event: &Event, session_id: &str) -> bool {
        let _routing = self.routing.lock().unwrap_or_else(|e| e.into_inner());

        let Some(session) = self.sessions.get_session(session_id) else {
            tracing::warn!(session_id, "unicast: session does not exist");
            return false;
        };
        deliver(&session, event.clone())
    }

    pub fn start(&self) {
        self.running.store(true, Ordering::Release);
        tracing::info!("dispatcher started");
    }

    /// Broadcast an abort event so every subscriber can unwind
    pub fn stop(&self) {
        tracing::info!("dispatcher stopping: broadcast abort to all subscribers");
        let delivered = self.broadcast(&Event::abort());
        self.running.store(false, Ordering::Release);
        tracing::info!(delivered, "dispatcher stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Deliver one copy, containing any failure to this session
fn deliver(session: &Session, event: Event) -> bool {
    match catch_unwind(AssertUnwindSafe(|| session.subscriber().on_event(event))) {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::warn!(session_id = %session.id(), error = %e, "delivery failed");
            false
        }
        Err(_) => {
            tracing::error!(session_id = %session.id(), "subscriber panicked during delivery");
            false
        }
    }
}

fn match_guarded(session: &Session, event: &Event) -> Option<Subscription> {
    match catch_unwind(AssertUnwindSafe(|| session.subscriber().match_event(event))) {
        Ok(subscription) => subscription,
        Err(_) => {
            tracing::error!(session_id = %session.id(), "subscriber panicked while matching");
            None
        }
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
