// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session registry
//!
//! This module provides:
//! - `SessionTable` - The live session map and its published snapshot
//! - `SessionManager` - Id generation, session lifecycle and lease aging
//! - `RegistryConfig` - Lease and aging interval settings

mod manager;
mod table;

pub use manager::{RegistryConfig, SessionManager};
pub use table::{SessionTable, Snapshot};
