//! Command handlers
//!
//! Each handler issues its API calls through [`TechnitiumClient`], renders the
//! reply and prints it. Rendering lives in pure `render_*` functions next to
//! the handlers so the layouts can be tested without a terminal.

use anyhow::{bail, Result};
use colored::Colorize;
use std::io::{BufRead, Write};

use crate::cli::Commands;
use crate::client::TechnitiumClient;

pub mod admin;
pub mod init;
pub mod logs;
pub mod records;
pub mod settings;
pub mod zone_options;
pub mod zones;

/// Run a parsed command against the server
pub async fn run(command: Commands, client: &TechnitiumClient) -> Result<()> {
    match command {
        Commands::Init { global } => init::run(global),
        Commands::List { json } => zones::list(client, json).await,
        Commands::Create(args) => zones::create(client, &args).await,
        Commands::Delete { zone } => zones::delete(client, &zone).await,
        Commands::Enable { zones } => zones::enable(client, &zones).await,
        Commands::Disable { zones } => zones::disable(client, &zones).await,
        Commands::Resync { zones } => zones::resync(client, &zones).await,
        Commands::Convert { zone, zone_type } => zones::convert(client, &zone, zone_type).await,
        Commands::Export {
            zones,
            output_dir,
            json,
        } => zones::export(client, &zones, output_dir.as_deref(), json).await,
        Commands::Import {
            zone,
            file,
            overwrite,
            json,
        } => zones::import(client, &zone, &file, overwrite, json).await,
        Commands::GetOptions {
            zone,
            include_available_keys,
            json,
        } => zone_options::get(client, &zone, include_available_keys, json).await,
        Commands::SetOptions(args) => zone_options::set(client, &args).await,
        Commands::Records { command } => records::run(client, command).await,
        Commands::Logs { command } => logs::run(client, command).await,
        Commands::Settings { command } => settings::run(client, command).await,
        Commands::Admin { command } => admin::run(client, command).await,
    }
}

/// Print a value as indented JSON
pub(crate) fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Ask a yes/no question on stdin; only a literal `yes` confirms
pub(crate) fn confirm(prompt: &str) -> Result<bool> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    confirm_with(prompt, &mut stdin.lock(), &mut stdout)
}

pub(crate) fn confirm_with<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    write!(output, "{} (yes/no): ", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim() == "yes")
}

/// Tracks per-zone failures for commands that act on several zones.
///
/// A failing zone is reported immediately and the remaining zones are still
/// processed; [`ZoneBatch::finish`] fails if any zone did.
#[derive(Debug, Default)]
pub(crate) struct ZoneBatch {
    failed: Vec<String>,
}

impl ZoneBatch {
    pub(crate) fn record(&mut self, zone: &str, result: Result<()>) {
        if let Err(err) = result {
            eprintln!("{} {}: {:#}", "❌".red(), zone.yellow(), err);
            self.failed.push(zone.to_string());
        }
    }

    pub(crate) fn finish(self, action: &str) -> Result<()> {
        match self.failed.len() {
            0 => Ok(()),
            n => bail!("failed to {} {} zone(s): {}", action, n, self.failed.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_confirm_requires_literal_yes() {
        let mut out = Vec::new();
        assert!(confirm_with("Delete?", &mut Cursor::new("yes\n"), &mut out).unwrap());
        assert_eq!(String::from_utf8(out).unwrap(), "Delete? (yes/no): ");

        let mut out = Vec::new();
        assert!(!confirm_with("Delete?", &mut Cursor::new("y\n"), &mut out).unwrap());
        assert!(!confirm_with("Delete?", &mut Cursor::new(""), &mut out).unwrap());
    }

    #[test]
    fn test_zone_batch() {
        let mut batch = ZoneBatch::default();
        batch.record("a.example", Ok(()));
        assert!(ZoneBatch::default().finish("enable").is_ok());

        batch.record("b.example", Err(anyhow::anyhow!("No such zone")));
        batch.record("c.example", Err(anyhow::anyhow!("No such zone")));
        let err = batch.finish("enable").unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to enable 2 zone(s): b.example, c.example"
        );
    }
}
