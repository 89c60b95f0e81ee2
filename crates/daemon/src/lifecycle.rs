// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: configuration, startup, shutdown.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use relay_core::{BootstrapError, Config, ConfigError, EngineContext};
use thiserror::Error;
use tracing::info;

/// Command-line options
#[derive(Debug, Clone, Default, PartialEq, Eq, Parser)]
#[command(
    name = "relayd",
    version,
    about = "Relay daemon - routes pushed events to subscribed sessions"
)]
pub struct Options {
    /// Config file; defaults apply when absent
    #[arg(value_name = "CONFIG")]
    pub config_path: Option<PathBuf>,

    /// Validate configuration, print a summary and exit
    #[arg(long)]
    pub check: bool,
}

/// Load configuration, or defaults when no path is given
pub fn load_config(path: Option<&Path>) -> Result<Config, LifecycleError> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None => Ok(Config::default()),
    }
}

/// One-line description of the effective configuration
pub fn describe(config: &Config) -> String {
    format!(
        "config ok: id_generation={:?} id_size={} lease={}ms queue_size={} aging_interval={}ms",
        config.session.id_generation,
        config.session.id_size,
        config.session.lease.as_millis(),
        config.session.queue_size,
        config.aging.interval.as_millis()
    )
}

/// Daemon state during operation
pub struct Daemon {
    pub context: EngineContext,
    /// When daemon started
    pub start_time: Instant,
}

impl Daemon {
    /// Plain-text status for operators
    pub fn status(&self) -> String {
        format!(
            "Uptime: {}s\n{}",
            self.start_time.elapsed().as_secs(),
            self.context.status()
        )
    }

    /// Abort all subscribers and drop every session
    pub fn shutdown(self) {
        info!("Shutting down daemon...");
        self.context.stop();
        info!("Daemon shutdown complete");
    }
}

/// Build and start the engine. Must run inside a tokio runtime.
pub fn startup(config: &Config) -> Result<Daemon, LifecycleError> {
    let context = EngineContext::from_config(config)?;
    context.start()?;
    info!("{}", describe(config));
    Ok(Daemon {
        context,
        start_time: Instant::now(),
    })
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Bootstrap error: {0}")]
    Bootstrap(#[from] BootstrapError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
