// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine composition
//!
//! One `Context` per process: it owns the session manager and the dispatcher
//! built from configuration, and is passed to whatever serves clients.

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::error::BootstrapError;
use crate::id::{IdGen, SessionIdGen};
use crate::registry::SessionManager;
use crate::subscriber::QueueSubscriber;
use std::sync::Arc;

/// Context type built from configuration
pub type EngineContext = Context<SystemClock, SessionIdGen>;

pub struct Context<C: Clock, G: IdGen> {
    sessions: SessionManager<C, G>,
    dispatcher: Arc<Dispatcher<C, G>>,
    queue_size: usize,
}

impl EngineContext {
    pub fn from_config(config: &Config) -> Result<Self, BootstrapError> {
        config.validate()?;
        let sessions = SessionManager::new(SystemClock, config.id_gen(), config.registry());
        tracing::info!(
            id_generation = ?config.session.id_generation,
            lease_ms = config.session.lease.as_millis() as u64,
            "engine context created"
        );
        Ok(Context::new(sessions, config.session.queue_size))
    }
}

impl<C: Clock, G: IdGen> Context<C, G> {
    pub fn new(sessions: SessionManager<C, G>, queue_size: usize) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(sessions.clone()));
        Self {
            sessions,
            dispatcher,
            queue_size,
        }
    }

    pub fn sessions(&self) -> &SessionManager<C, G> {
        &self.sessions
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher<C, G>> {
        &self.dispatcher
    }

    /// A queue subscriber sized from configuration, for a new session
    pub fn new_subscriber(&self) -> Arc<QueueSubscriber> {
        Arc::new(QueueSubscriber::new(self.queue_size))
    }

    /// Start the registry's aging sweep, then the dispatcher
    pub fn start(&self) -> Result<(), BootstrapError> {
        self.sessions.start()?;
        self.dispatcher.start();
        Ok(())
    }

    /// Stop the dispatcher first so subscribers see the abort, then drop all sessions
    pub fn stop(&self) {
        self.dispatcher.stop();
        self.sessions.stop();
    }

    pub fn status(&self) -> String {
        self.sessions.status()
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
