// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Access request commands
//!
//! Commands: submit, get

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use nas_sdk::{IpAllowSpecDraft, RequestStatus};

use super::{client, print_ip_spec, report};

#[derive(Subcommand, Debug)]
pub enum RequestCommand {
    /// Submit a request to allow an IP range for an account
    Submit {
        /// IPv4 CIDR, e.g. 10.0.0.0/24
        #[arg(long)]
        ip: String,

        /// persistent or time-bounded
        #[arg(long = "type", value_name = "TYPE")]
        kind: String,

        /// Numeric account id
        #[arg(long)]
        account_id: String,

        /// Expiry as Unix epoch seconds (time-bounded only)
        #[arg(long)]
        expiry: Option<String>,

        #[arg(long)]
        requestor: String,

        #[arg(long)]
        approver: String,
    },

    /// Show a submitted request
    Get {
        #[arg(value_name = "REQUEST_ID")]
        request_id: String,

        /// Print the raw JSON record
        #[arg(long)]
        json: bool,
    },
}

impl RequestCommand {
    /// Draft payload for `submit`; `None` for other subcommands.
    pub fn draft(&self) -> Option<IpAllowSpecDraft> {
        match self {
            RequestCommand::Submit {
                ip,
                kind,
                account_id,
                expiry,
                requestor,
                approver,
            } => Some(IpAllowSpecDraft {
                ip: ip.clone(),
                kind: kind.clone(),
                account_id: account_id.clone(),
                expiry: expiry.clone().map(serde_json::Value::String),
                requestor: requestor.clone(),
                approver: approver.clone(),
            }),
            RequestCommand::Get { .. } => None,
        }
    }
}

pub async fn handle_command(command: RequestCommand, service_url: &str) -> Result<()> {
    let client = client(service_url)?;

    if let Some(draft) = command.draft() {
        let id = client.submit_access_request(draft).await.map_err(report)?;
        println!("{} Access request submitted: {}", "✓".green(), id.to_string().bold());
        return Ok(());
    }

    if let RequestCommand::Get { request_id, json } = command {
        let request = client.get_access_request(&request_id).await.map_err(report)?;

        if json {
            println!("{}", serde_json::to_string_pretty(&request)?);
            return Ok(());
        }

        let status = match request.status() {
            RequestStatus::Pending => request.status().as_str().yellow(),
            RequestStatus::Completed => request.status().as_str().green(),
            RequestStatus::Failed => request.status().as_str().red(),
        };
        println!("{}", "Access request:".bold());
        println!("  ID: {}", request.id());
        println!("  Status: {}", status);
        println!("  Requested at: {}", request.requested_at().to_rfc3339());
        print_ip_spec(request.ip_spec(), "  ");
    }

    Ok(())
}
