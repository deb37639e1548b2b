// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{AllowListCommand, ConfigCommand, MigrateCommand, RequestCommand};

/// NAS - network access allow-list service
#[derive(Parser, Debug)]
#[command(name = "nas")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, env = "NAS_CONFIG_PATH", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Service host used by client commands
    #[arg(long, global = true, env = "NAS_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Service port used by client commands
    #[arg(long, global = true, env = "NAS_PORT", default_value = "8080")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error). Defaults to the configured level.
    #[arg(long, global = true, env = "NAS_LOG_LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Base URL of the service targeted by client commands.
    pub fn service_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP service
    #[command(name = "serve")]
    Serve,

    /// Apply database migrations
    #[command(name = "migrate")]
    Migrate {
        #[command(flatten)]
        command: MigrateCommand,
    },

    /// Submit and inspect access requests
    #[command(name = "request")]
    Request {
        #[command(subcommand)]
        command: RequestCommand,
    },

    /// Query the allow list
    #[command(name = "allowlist")]
    AllowList {
        #[command(subcommand)]
        command: AllowListCommand,
    },

    /// Check service health
    #[command(name = "health")]
    Health,

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}
