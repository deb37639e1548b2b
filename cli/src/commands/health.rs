// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `nas health` - query a running service's health endpoint

use anyhow::Result;
use colored::Colorize;

use super::{client, report};

pub async fn execute(service_url: &str) -> Result<()> {
    let health = client(service_url)?.health().await.map_err(report)?;

    println!(
        "{} {} (up {}s)",
        "✓".green(),
        health.status.bold(),
        health.uptime_seconds
    );
    Ok(())
}
