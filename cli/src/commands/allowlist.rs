// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Allow-list commands
//!
//! Commands: lookup

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::{client, print_ip_spec, report};

#[derive(Subcommand, Debug)]
pub enum AllowListCommand {
    /// Find the allow-list entry for an IP range and account
    Lookup {
        /// IPv4 CIDR, e.g. 10.0.0.0/24
        #[arg(long)]
        ip: String,

        /// Numeric account id
        #[arg(long)]
        account_id: String,

        /// Print the raw JSON entry
        #[arg(long)]
        json: bool,
    },
}

pub async fn handle_command(command: AllowListCommand, service_url: &str) -> Result<()> {
    match command {
        AllowListCommand::Lookup { ip, account_id, json } => {
            let spec = client(service_url)?
                .lookup_allowed_ip(&ip, &account_id)
                .await
                .map_err(report)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&spec)?);
            } else {
                println!("{}", "Allow-list entry:".bold());
                print_ip_spec(&spec, "  ");
            }
            Ok(())
        }
    }
}
