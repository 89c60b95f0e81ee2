// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time source for lease aging
//!
//! The aging sweep never trusts its nominal interval. It asks a [`TickTimer`]
//! how much wall time really passed since the previous tick, so a stalled
//! process or a late timer still charges sessions for the full gap.
//!
//! The registry is generic over [`Clock`]. Production wires in
//! [`SystemClock`]; registry and dispatch tests use [`FakeClock`] and move it
//! by hand to push sessions past their lease without sleeping. Every clone of
//! a `FakeClock` reads the same instant, so a test keeps one handle while the
//! registry's timer holds another.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Source of `Instant`s for the tick timer
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> Instant;
}

/// Monotonic OS clock used by the daemon
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-driven clock; time only moves through `advance` and `set`
#[derive(Clone, Debug)]
pub struct FakeClock {
    current: Arc<Mutex<Instant>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            current: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Move time forward, e.g. past a session's lease
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += duration;
    }

    /// Jump to `instant`, which may lie in the past
    pub fn set(&self, instant: Instant) {
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = instant;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Measures the real elapsed time between consecutive ticks
#[derive(Debug)]
pub struct TickTimer<C: Clock> {
    clock: C,
    last: Mutex<Instant>,
}

impl<C: Clock> TickTimer<C> {
    /// The first tick measures from this moment.
    pub fn new(clock: C) -> Self {
        let last = Mutex::new(clock.now());
        Self { clock, last }
    }

    /// Elapsed time since the previous tick (or construction), then re-arm.
    ///
    /// A clock that moves backwards yields a zero delta.
    pub fn tick(&self) -> Duration {
        let now = self.clock.now();
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        let delta = now.saturating_duration_since(*last);
        *last = now;
        delta
    }

    /// Forget any elapsed time, e.g. when the sweep is restarted.
    pub fn reset(&self) {
        *self.last.lock().unwrap_or_else(|e| e.into_inner()) = self.clock.now();
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
