// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration
//!
//! Loaded from TOML; every key is optional.
//!
//! ```toml
//! [session]
//! id_generation = "random-name"   # or "uuid"
//! id_size = 10
//! lease = "5m"
//! queue_size = 64
//!
//! [aging]
//! interval = "60s"
//! ```

use crate::error::ConfigError;
use crate::id::{IdGeneration, RandomNameGen, SessionIdGen};
use crate::registry::RegistryConfig;
use crate::subscriber::QueueSubscriber;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub session: SessionConfig,
    pub aging: AgingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub id_generation: IdGeneration,
    /// Length of random-name ids
    pub id_size: usize,
    #[serde(with = "humantime_serde")]
    pub lease: Duration,
    /// Capacity of each subscriber's event queue
    pub queue_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            id_generation: IdGeneration::default(),
            id_size: RandomNameGen::DEFAULT_SIZE,
            lease: RegistryConfig::default().lease,
            queue_size: QueueSubscriber::DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgingConfig {
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for AgingConfig {
    fn default() -> Self {
        Self {
            interval: RegistryConfig::default().aging_interval,
        }
    }
}

impl Config {
    /// Read and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.id_generation == IdGeneration::RandomName && self.session.id_size == 0 {
            return Err(invalid("session.id_size", "must be at least 1"));
        }
        if self.session.lease.is_zero() {
            return Err(invalid("session.lease", "must be greater than zero"));
        }
        if self.session.queue_size == 0 {
            return Err(invalid("session.queue_size", "must be at least 1"));
        }
        if self.aging.interval.is_zero() {
            return Err(invalid("aging.interval", "must be greater than zero"));
        }
        Ok(())
    }

    pub fn registry(&self) -> RegistryConfig {
        RegistryConfig::new()
            .with_lease(self.session.lease)
            .with_aging_interval(self.aging.interval)
    }

    pub fn id_gen(&self) -> SessionIdGen {
        SessionIdGen::new(self.session.id_generation, self.session.id_size)
    }
}

fn invalid(key: &'static str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        message: message.to_string(),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
