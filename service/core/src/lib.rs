// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! NAS Core
//!
//! Network access service: records requests to allow an IPv4 CIDR range for
//! an account and answers allow-list lookups by (IP, account).
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Domain model, access request service, storage adapters and
//!   the HTTP transport adapter

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
