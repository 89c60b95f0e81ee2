// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session identifier generation

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Generates session identifiers
pub trait IdGen: Clone + Send + Sync + 'static {
    fn next(&self) -> String;

    /// True when ids never collide, so callers may skip the uniqueness check.
    fn is_unique(&self) -> bool {
        false
    }
}

/// Globally unique ids (UUID v4)
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    fn is_unique(&self) -> bool {
        true
    }
}

/// Short lowercase random names; cheap to carry in URLs but may collide
#[derive(Clone, Copy, Debug)]
pub struct RandomNameGen {
    size: usize,
}

impl RandomNameGen {
    pub const DEFAULT_SIZE: usize = 10;

    pub fn new(size: usize) -> Self {
        Self { size: size.max(1) }
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl Default for RandomNameGen {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE)
    }
}

impl IdGen for RandomNameGen {
    fn next(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..self.size)
            .map(|_| rng.gen_range(b'a'..=b'z') as char)
            .collect()
    }
}

/// How session ids are generated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdGeneration {
    #[default]
    RandomName,
    Uuid,
}

/// The configured generator, chosen once at startup
#[derive(Clone, Copy, Debug)]
pub enum SessionIdGen {
    Uuid(UuidIdGen),
    RandomName(RandomNameGen),
}

impl SessionIdGen {
    pub fn new(generation: IdGeneration, size: usize) -> Self {
        match generation {
            IdGeneration::Uuid => Self::Uuid(UuidIdGen),
            IdGeneration::RandomName => Self::RandomName(RandomNameGen::new(size)),
        }
    }
}

impl Default for SessionIdGen {
    fn default() -> Self {
        Self::RandomName(RandomNameGen::default())
    }
}

impl IdGen for SessionIdGen {
    fn next(&self) -> String {
        match self {
            Self::Uuid(g) => g.next(),
            Self::RandomName(g) => g.next(),
        }
    }

    fn is_unique(&self) -> bool {
        match self {
            Self::Uuid(g) => g.is_unique(),
            Self::RandomName(g) => g.is_unique(),
        }
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
