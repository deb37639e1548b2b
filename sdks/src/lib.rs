// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! NAS Rust SDK
//!
//! Typed async client for the network access service HTTP API.

pub mod client;
pub mod types;

pub use client::{ClientError, NasClient};
pub use types::*;
