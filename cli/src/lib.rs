// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! NAS CLI library - exposes testable components
//!
//! # Architecture
//!
//! - **Layer:** Interface / Presentation Layer
//! - **Purpose:** Argument parsing, command handlers and the HTTP server bootstrap

pub mod cli;
pub mod commands;
pub mod server;

pub use cli::{Cli, Commands};
