// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live session map with a lazily rebuilt snapshot
//!
//! Writers touch only the map and raise the dirty flag. The first reader to
//! see the flag rebuilds the snapshot under the rebuild lock and publishes it
//! with a single swap, so concurrent readers hold either the old or the new
//! snapshot, never a half-written one. A clean flag means `snapshot()` is
//! one atomic load.

use crate::session::{Session, SessionId};
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Immutable view of the live sessions at one point in time
pub type Snapshot = Arc<Vec<Arc<Session>>>;

pub struct SessionTable {
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
    snapshot: ArcSwap<Vec<Arc<Session>>>,
    dirty: AtomicBool,
    rebuild: Mutex<()>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            snapshot: ArcSwap::from_pointee(Vec::new()),
            dirty: AtomicBool::new(false),
            rebuild: Mutex::new(()),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.read().get(id).cloned()
    }

    pub fn all(&self) -> Vec<Arc<Session>> {
        self.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns the session previously stored under the same id, if any.
    pub fn insert(&self, session: Arc<Session>) -> Option<Arc<Session>> {
        let id = session.id().clone();
        let address = session.address().to_string();
        let previous = self.write().insert(id.clone(), session);
        self.dirty.store(true, Ordering::Release);
        tracing::info!(session_id = %id, %address, "session added");
        previous
    }

    pub fn remove(&self, id: &SessionId) -> Option<Arc<Session>> {
        let removed = self.write().remove(id)?;
        self.dirty.store(true, Ordering::Release);
        tracing::info!(session_id = %id, address = %removed.address(), "session removed");
        Some(removed)
    }

    /// Current snapshot, rebuilt first if a mutation happened since the last one.
    pub fn snapshot(&self) -> Snapshot {
        if !self.dirty.load(Ordering::Acquire) {
            return self.snapshot.load_full();
        }

        let _rebuild = self.rebuild.lock().unwrap_or_else(|e| e.into_inner());
        // Another reader may have rebuilt while we waited
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return self.snapshot.load_full();
        }

        // Flag is cleared before reading the map: a write racing with this
        // rebuild sets it again and the next reader picks it up.
        let fresh: Snapshot = Arc::new(self.all());
        self.snapshot.store(Arc::clone(&fresh));
        tracing::debug!(sessions = fresh.len(), "snapshot rebuilt");
        fresh
    }

    /// Drop every session and publish an empty snapshot
    pub fn clear(&self) {
        let _rebuild = self.rebuild.lock().unwrap_or_else(|e| e.into_inner());
        self.dirty.store(false, Ordering::Release);
        self.write().clear();
        self.snapshot.store(Arc::new(Vec::new()));
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<SessionId, Arc<Session>>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<SessionId, Arc<Session>>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for SessionTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
