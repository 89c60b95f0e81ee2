// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types

use std::path::PathBuf;
use thiserror::Error;

/// A subscriber could not take an event
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("subscriber queue full (capacity {0})")]
    QueueFull(usize),
    #[error("subscriber closed")]
    Closed,
    #[error("delivery rejected: {0}")]
    Rejected(String),
}

/// Configuration could not be read or is invalid
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// The engine could not be brought up; the process must not serve
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("no async runtime available to run the aging sweep")]
    NoRuntime,
}
