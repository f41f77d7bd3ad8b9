//! tdns
//!
//! Manage a Technitium DNS server from the command line.
//!
//! # Usage
//! ```bash
//! # Write a starter config.json
//! tdns init
//!
//! # List zones
//! tdns list
//!
//! # Add an A record
//! tdns records add -z example.com -n www.example.com -r A --ipAddress 192.0.2.10
//!
//! # Back up server settings
//! tdns settings backup -o backup.zip
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tdns::cli::{Cli, Commands};
use tdns::commands;
use tdns::{Config, TechnitiumClient};

// ============================================================
// Main Entry Point
// ============================================================

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Initialize logging
    let level = if cli.debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "❌".red(), err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // init has to work before any config exists
    if let Commands::Init { global } = cli.command {
        return commands::init::run(global);
    }

    let config = Config::load(cli.config.as_deref())?.with_overrides(cli.token, cli.endpoint);
    debug!(host = %config.host(), token_set = !config.token.is_empty(), "Loaded configuration");

    let client = TechnitiumClient::new(config.host(), config.token.clone())
        .context("Failed to initialize HTTP client")?;

    commands::run(cli.command, &client).await
}
