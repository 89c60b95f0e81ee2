// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Relay daemon (relayd)
//!
//! Owns the engine context for the process: loads configuration, starts the
//! session registry and dispatcher, and tears them down on SIGINT/SIGTERM.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod lifecycle;

use std::process::ExitCode;

use clap::Parser;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

use crate::lifecycle::{describe, load_config, LifecycleError, Options};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), LifecycleError> {
    // Usage errors exit with clap's status and message
    let options = Options::parse();

    // Load configuration
    let config = load_config(options.config_path.as_deref())?;
    if options.check {
        println!("{}", describe(&config));
        return Ok(());
    }

    // Set up logging
    let log_guard = setup_logging();

    info!("Starting relayd");

    let daemon = match lifecycle::startup(&config) {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to start daemon: {}", e);
            drop(log_guard);
            return Err(e);
        }
    };

    // Set up signal handlers
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sighup = signal(SignalKind::hangup())?;

    info!("Daemon ready");

    // Signal ready for parent process (e.g., systemd)
    println!("READY");

    loop {
        tokio::select! {
            // Status dump on SIGHUP
            _ = sighup.recv() => {
                info!("Status:\n{}", daemon.status());
            }

            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down...");
                break;
            }

            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down...");
                break;
            }
        }
    }

    daemon.shutdown();
    info!("Daemon stopped");
    drop(log_guard);
    Ok(())
}

fn setup_logging() -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());

    // RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    guard
}
