// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # NAS CLI
//!
//! The `nas` binary runs the network access service and talks to a running
//! instance.
//!
//! ## Commands
//!
//! - `nas serve` - Run the HTTP service
//! - `nas migrate [--dry-run]` - Apply database migrations
//! - `nas request submit|get` - Access request operations
//! - `nas allowlist lookup` - Allow-list queries
//! - `nas health` - Service health check
//! - `nas config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use nas_cli::commands;
use nas_cli::{Cli, Commands};
use nas_core::domain::service_config::ServiceConfigManifest;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let service_url = cli.service_url();

    match cli.command {
        Some(Commands::Serve) => {
            let config = ServiceConfigManifest::load_or_default(cli.config.clone())
                .context("Failed to load configuration")?;
            let logging = &config.spec.observability.logging;
            init_logging(cli.log_level.as_deref().unwrap_or(&logging.level), &logging.format)?;
            nas_cli::server::start_server(config).await
        }
        Some(Commands::Migrate { command }) => {
            init_logging(cli.log_level.as_deref().unwrap_or("warn"), "text")?;
            commands::migrate::execute(command, cli.config).await
        }
        Some(Commands::Request { command }) => {
            init_logging(cli.log_level.as_deref().unwrap_or("warn"), "text")?;
            commands::request::handle_command(command, &service_url).await
        }
        Some(Commands::AllowList { command }) => {
            init_logging(cli.log_level.as_deref().unwrap_or("warn"), "text")?;
            commands::allowlist::handle_command(command, &service_url).await
        }
        Some(Commands::Health) => {
            init_logging(cli.log_level.as_deref().unwrap_or("warn"), "text")?;
            commands::health::execute(&service_url).await
        }
        Some(Commands::Config { command }) => {
            init_logging(cli.log_level.as_deref().unwrap_or("warn"), "text")?;
            commands::config::handle_command(command, cli.config).await
        }
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging. `RUST_LOG` wins over `level`.
fn init_logging(level: &str, format: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if format == "json" {
        builder.json().init();
    } else {
        builder.compact().init();
    }

    Ok(())
}
