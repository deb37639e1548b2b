// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the NAS CLI

pub mod allowlist;
pub mod config;
pub mod health;
pub mod migrate;
pub mod request;

pub use self::allowlist::AllowListCommand;
pub use self::config::ConfigCommand;
pub use self::migrate::MigrateCommand;
pub use self::request::RequestCommand;

use anyhow::anyhow;
use colored::Colorize;
use nas_sdk::{ClientError, IpAllowSpec, NasClient};

pub(crate) fn client(service_url: &str) -> anyhow::Result<NasClient> {
    NasClient::new(service_url).map_err(|e| anyhow!("{}", e))
}

/// Turns a client error into a CLI error, printing field violations first.
pub(crate) fn report(err: ClientError) -> anyhow::Error {
    if let ClientError::InvalidInput { violations, .. } = &err {
        for violation in violations {
            eprintln!(
                "  {} {} ({})",
                "✗".red(),
                violation.field.bold(),
                violation.message
            );
        }
    }
    anyhow!(err)
}

pub(crate) fn print_ip_spec(spec: &IpAllowSpec, indent: &str) {
    println!("{indent}IP: {}", spec.ip);
    println!("{indent}Type: {}", spec.kind());
    if let Some(expiry) = spec.expiry() {
        println!("{indent}Expiry: {}", expiry);
    }
    println!("{indent}Account: {}", spec.account_id);
    println!("{indent}Requestor: {}", spec.requestor);
    println!("{indent}Approver: {}", spec.approver);
}
