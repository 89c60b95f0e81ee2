// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session manager: ids, lifecycle and lease aging
//!
//! Creating a session and registering it are separate steps so the transport
//! can finish its handshake in between. Once registered, a session stays
//! visible until it is removed explicitly or the aging sweep expires it.
//!
//! The aging sweep runs as a background tokio task started by
//! [`SessionManager::start`]. Each tick charges the real elapsed time (read
//! from the injected [`Clock`]) against every session in the snapshot.

use super::table::{SessionTable, Snapshot};
use crate::clock::{Clock, TickTimer};
use crate::error::BootstrapError;
use crate::event::{Event, FIELD_FROM};
use crate::id::IdGen;
use crate::session::Session;
use crate::subscriber::Subscriber;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Address recorded when the creating event does not carry one
const UNKNOWN_ADDRESS: &str = "unknown";

/// Lease and aging settings
#[derive(Clone, Debug)]
pub struct RegistryConfig {
    /// Lease granted to new sessions and restored by a kick
    pub lease: Duration,
    /// How often the aging sweep runs
    pub aging_interval: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            lease: Duration::from_secs(5 * 60),
            aging_interval: Duration::from_secs(60),
        }
    }
}

impl RegistryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lease(mut self, lease: Duration) -> Self {
        self.lease = lease;
        self
    }

    pub fn with_aging_interval(mut self, interval: Duration) -> Self {
        self.aging_interval = interval;
        self
    }
}

struct Shared<C: Clock, G: IdGen> {
    table: Arc<SessionTable>,
    id_gen: G,
    config: RegistryConfig,
    timer: TickTimer<C>,
    sweep: Mutex<Option<JoinHandle<()>>>,
}

/// Owns the live session set; clones share the same registry
pub struct SessionManager<C: Clock, G: IdGen> {
    shared: Arc<Shared<C, G>>,
}

impl<C: Clock, G: IdGen> SessionManager<C, G> {
    pub fn new(clock: C, id_gen: G, config: RegistryConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                table: Arc::new(SessionTable::new()),
                id_gen,
                config,
                timer: TickTimer::new(clock),
                sweep: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.shared.config
    }

    pub fn clock(&self) -> &C {
        self.shared.timer.clock()
    }

    /// Create a session with a fresh id; it is not registered yet.
    ///
    /// The client address is taken from the event's `p_from` field.
    pub fn create_session(&self, event: &Event, subscriber: Arc<dyn Subscriber>) -> Arc<Session> {
        let address = event.field(FIELD_FROM).unwrap_or(UNKNOWN_ADDRESS);
        Arc::new(Session::with_owner(
            self.create_session_id(),
            address,
            subscriber,
            self.shared.config.lease,
            Arc::downgrade(&self.shared.table),
        ))
    }

    /// A session id not currently registered
    pub fn create_session_id(&self) -> String {
        let id_gen = &self.shared.id_gen;
        if id_gen.is_unique() {
            return id_gen.next();
        }
        loop {
            let id = id_gen.next();
            if !self.has_session(&id) {
                return id;
            }
            tracing::debug!(session_id = %id, "session id collision, regenerating");
        }
    }

    pub fn has_session(&self, id: &str) -> bool {
        self.shared.table.contains(id)
    }

    pub fn get_session(&self, id: &str) -> Option<Arc<Session>> {
        self.shared.table.get(id)
    }

    pub fn get_sessions(&self) -> Vec<Arc<Session>> {
        self.shared.table.all()
    }

    pub fn get_session_count(&self) -> usize {
        self.shared.table.len()
    }

    /// Register a session; it becomes owned by this registry if it was not already
    pub fn add_session(&self, session: Arc<Session>) {
        session.bind_owner(&self.shared.table);
        if let Some(previous) = self.shared.table.insert(session) {
            tracing::warn!(session_id = %previous.id(), "replaced session with duplicate id");
        }
    }

    pub fn remove_session(&self, session: &Session) -> Option<Arc<Session>> {
        self.shared.table.remove(session.id())
    }

    /// Read-optimized view of all live sessions for dispatch
    pub fn get_snapshot(&self) -> Snapshot {
        self.shared.table.snapshot()
    }

    /// Plain-text summary for operators
    pub fn status(&self) -> String {
        let sessions = self.get_sessions();
        let mut status = format!("SessionManager: {} sessions\n", sessions.len());
        for session in &sessions {
            status.push_str(&session.to_string());
            status.push('\n');
        }
        status
    }

    /// Run one aging tick; returns how many sessions this tick stopped
    pub fn age_sessions(&self) -> usize {
        let delta = self.shared.timer.tick();
        let snapshot = self.get_snapshot();
        let mut expired = 0;

        for session in snapshot.iter() {
            let aged = catch_unwind(AssertUnwindSafe(|| {
                session.age(delta);
                if !session.is_expired() {
                    return false;
                }
                tracing::info!(
                    session_id = %session.id(),
                    address = %session.address(),
                    "session expired"
                );
                session.stop()
            }));
            match aged {
                Ok(true) => expired += 1,
                Ok(false) => {}
                Err(_) => {
                    tracing::warn!(session_id = %session.id(), "aging session panicked")
                }
            }
        }

        tracing::debug!(
            elapsed_ms = delta.as_millis() as u64,
            sessions = snapshot.len(),
            expired,
            "aging tick"
        );
        expired
    }

    /// Start the aging sweep; restarts it if already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> Result<(), BootstrapError> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| BootstrapError::NoRuntime)?;

        let mut sweep = self.shared.sweep.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = sweep.take() {
            previous.abort();
        }

        self.shared.timer.reset();
        // tokio intervals reject a zero period
        let period = self
            .shared
            .config
            .aging_interval
            .max(Duration::from_millis(1));
        let weak = Arc::downgrade(&self.shared);
        *sweep = Some(runtime.spawn(run_sweep(weak, period)));

        tracing::info!(interval_ms = period.as_millis() as u64, "session manager started");
        Ok(())
    }

    /// Stop the sweep and drop every session without stopping them individually
    pub fn stop(&self) {
        if let Some(sweep) = self
            .shared
            .sweep
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            sweep.abort();
        }
        self.shared.table.clear();
        tracing::info!("session manager stopped");
    }

    pub fn is_running(&self) -> bool {
        self.shared
            .sweep
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}

impl<C: Clock, G: IdGen> Clone for SessionManager<C, G> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// Sweep loop; ends when the manager is dropped
async fn run_sweep<C: Clock, G: IdGen>(shared: Weak<Shared<C, G>>, period: Duration) {
    let start = tokio::time::Instant::now() + period;
    let mut interval = tokio::time::interval_at(start, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let Some(shared) = shared.upgrade() else {
            break;
        };
        SessionManager { shared }.age_sessions();
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
