// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session lifecycle
//!
//! A session is one connected client: an id, the client address, the
//! subscriber that receives its events, and a lease.
//!
//! ## Lease
//!
//! The lease counts down as the registry's aging sweep charges elapsed time
//! against it. Client activity renews it with [`Session::kick`]. When it
//! reaches zero the session is expired and the sweep stops it.
//!
//! ## Stopping
//!
//! [`Session::stop`] runs at most once. It first deregisters the session
//! through a weak reference to the owning [`SessionTable`], then stops the
//! subscriber, so a subscriber failing to stop cannot leave the session
//! registered. The owner is bound when the session is created by a registry
//! or, at the latest, when it is added to one. The session uses that
//! reference for nothing else.

use crate::registry::SessionTable;
use crate::subscriber::Subscriber;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, Weak};
use std::time::Duration;

/// Unique identifier for a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for SessionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    /// Lease ran out; stop is pending or in progress
    Expired,
    Stopped,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Active => "active",
            SessionStatus::Expired => "expired",
            SessionStatus::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
struct Lease {
    remaining: Duration,
    status: SessionStatus,
}

pub struct Session {
    id: SessionId,
    address: String,
    subscriber: Arc<dyn Subscriber>,
    lease_time: Duration,
    lease: Mutex<Lease>,
    stopped: AtomicBool,
    owner: OnceLock<Weak<SessionTable>>,
}

impl Session {
    /// A session not yet owned by any registry; adding it to one binds it
    pub fn new(
        id: impl Into<String>,
        address: impl Into<String>,
        subscriber: Arc<dyn Subscriber>,
        lease_time: Duration,
    ) -> Self {
        Self::build(id, address, subscriber, lease_time, OnceLock::new())
    }

    pub(crate) fn with_owner(
        id: impl Into<String>,
        address: impl Into<String>,
        subscriber: Arc<dyn Subscriber>,
        lease_time: Duration,
        owner: Weak<SessionTable>,
    ) -> Self {
        Self::build(id, address, subscriber, lease_time, OnceLock::from(owner))
    }

    fn build(
        id: impl Into<String>,
        address: impl Into<String>,
        subscriber: Arc<dyn Subscriber>,
        lease_time: Duration,
        owner: OnceLock<Weak<SessionTable>>,
    ) -> Self {
        Self {
            id: SessionId(id.into()),
            address: address.into(),
            subscriber,
            lease_time,
            lease: Mutex::new(Lease {
                remaining: lease_time,
                status: SessionStatus::Active,
            }),
            stopped: AtomicBool::new(false),
            owner,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn subscriber(&self) -> &Arc<dyn Subscriber> {
        &self.subscriber
    }

    /// Full lease granted on creation and on every kick
    pub fn lease_time(&self) -> Duration {
        self.lease_time
    }

    pub fn remaining_lease(&self) -> Duration {
        self.lease().remaining
    }

    pub fn status(&self) -> SessionStatus {
        self.lease().status
    }

    /// Charge elapsed time against the lease; a drained lease marks the session expired
    pub fn age(&self, delta: Duration) {
        let mut lease = self.lease();
        if lease.status == SessionStatus::Stopped {
            return;
        }
        lease.remaining = lease.remaining.saturating_sub(delta);
        if lease.remaining.is_zero() {
            lease.status = SessionStatus::Expired;
        }
    }

    pub fn is_expired(&self) -> bool {
        self.lease().remaining.is_zero()
    }

    /// Renew the lease. Returns false once the session has expired or stopped.
    pub fn kick(&self) -> bool {
        let mut lease = self.lease();
        if lease.status != SessionStatus::Active {
            return false;
        }
        lease.remaining = self.lease_time;
        true
    }

    /// Deregister, then stop the subscriber. Only the first call does anything.
    pub fn stop(&self) -> bool {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.lease().status = SessionStatus::Stopped;

        if let Some(table) = self.owner.get().and_then(Weak::upgrade) {
            table.remove(&self.id);
        }
        tracing::info!(session_id = %self.id, address = %self.address, "session stopped");
        self.subscriber.stop();
        true
    }

    /// Record the owning table unless one is already bound
    pub(crate) fn bind_owner(&self, table: &Arc<SessionTable>) {
        let _ = self.owner.set(Arc::downgrade(table));
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    fn lease(&self) -> std::sync::MutexGuard<'_, Lease> {
        self.lease.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lease = self.lease();
        write!(
            f,
            "Session{{id={} address={} lease={}ms status={}}}",
            self.id,
            self.address,
            lease.remaining.as_millis(),
            lease.status
        )
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lease = self.lease();
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("address", &self.address)
            .field("lease_time", &self.lease_time)
            .field("lease", &*lease)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
