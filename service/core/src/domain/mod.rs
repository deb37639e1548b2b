// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain Layer
//!
//! Access request aggregate, allow-list value objects, validation rules and
//! the persistence contracts consumed by the application layer.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Domain types, rules and repository contracts

pub mod access_request;
pub mod allow_list;
pub mod validation;
pub mod repository;
pub mod service_config;
