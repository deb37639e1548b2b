// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Database Migration Command
//!
//! Implements `nas migrate`, applying the SQL migrations embedded from
//! `cli/migrations` to the configured PostgreSQL database.
//!
//! # Usage
//!
//! ```bash
//! # Apply all pending migrations
//! nas migrate
//!
//! # Preview migrations without applying
//! nas migrate --dry-run
//! ```
//!
//! # Environment
//!
//! The database URL comes from `spec.storage.database_url` (default
//! `env:NAS_DATABASE_URL`), so setting `NAS_DATABASE_URL` is enough.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use std::collections::HashSet;
use std::path::PathBuf;

use nas_core::domain::service_config::ServiceConfigManifest;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Args, Debug)]
pub struct MigrateCommand {
    /// Perform a dry run without applying changes
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn execute(cmd: MigrateCommand, config_path: Option<PathBuf>) -> Result<()> {
    println!("{}", "NAS Migrate".bold().green());

    let config = ServiceConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;
    let database_url = config.resolve_database_url().with_context(|| {
        format!(
            "spec.storage.database_url '{}' does not resolve. Set NAS_DATABASE_URL.",
            config.spec.storage.database_url
        )
    })?;

    println!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    // The tracking table does not exist before the first run
    let applied: HashSet<i64> = sqlx::query_scalar::<_, i64>("SELECT version FROM _sqlx_migrations WHERE success")
        .fetch_all(&pool)
        .await
        .map(|versions| versions.into_iter().collect())
        .unwrap_or_default();

    let pending: Vec<_> = MIGRATOR
        .iter()
        .filter(|migration| !applied.contains(&migration.version))
        .collect();

    println!(
        "Migration status: {} applied, {} total available.",
        applied.len(),
        MIGRATOR.iter().count()
    );

    if pending.is_empty() {
        println!("{}", "✓ Database is up to date.".green());
        return Ok(());
    }

    if cmd.dry_run {
        println!("Pending migrations found (Dry Run):");
        for migration in &pending {
            println!(" - {} {}", migration.version, migration.description);
        }
        println!("Skipping application due to --dry-run");
        return Ok(());
    }

    println!("Applying pending migrations...");
    MIGRATOR.run(&pool).await.context("Failed to apply migrations")?;
    println!("{}", "✓ Database updated successfully.".green());

    Ok(())
}
