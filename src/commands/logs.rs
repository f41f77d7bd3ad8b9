//! `logs list|download|delete|delete-all`

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::confirm;
use crate::cli::LogsCommand;
use crate::client::TechnitiumClient;
use crate::format::{outln, plain};
use crate::models::{LogFile, LogList};

pub async fn run(client: &TechnitiumClient, command: LogsCommand) -> Result<()> {
    match command {
        LogsCommand::List => list(client).await,
        LogsCommand::Download { file_name, output } => {
            download(client, &file_name, output.as_deref()).await
        }
        LogsCommand::Delete { file_name } => delete(client, &file_name).await,
        LogsCommand::DeleteAll { yes } => {
            if !yes && !confirm("Are you sure you want to delete ALL logs?")? {
                println!("❌ Aborted.");
                return Ok(());
            }
            delete_all(client).await
        }
    }
}

async fn list(client: &TechnitiumClient) -> Result<()> {
    let logs: LogList = client.list_logs().await?.response_as()?;
    print!("{}", render_log_files(&logs.log_files));
    Ok(())
}

pub fn render_log_files(files: &[LogFile]) -> String {
    if files.is_empty() {
        return "No log files found.\n".to_string();
    }

    let mut out = String::new();
    outln!(out, "{}", "Available Log Files:".bold());
    for file in files {
        outln!(out, "- {} ({})", file.file_name.cyan(), plain(&file.size));
    }
    out
}

/// Where a downloaded log lands when no `--output` is given
pub fn default_log_path(file_name: &str) -> PathBuf {
    PathBuf::from(format!("{}.log", file_name))
}

async fn download(client: &TechnitiumClient, file_name: &str, output: Option<&Path>) -> Result<()> {
    let data = client.download_log(file_name).await.map_err(|e| match e.http_status() {
        Some(code) => anyhow!("Failed to download file: HTTP {}", code),
        None => anyhow::Error::new(e).context("Failed to download file"),
    })?;

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_log_path(file_name));
    debug!(bytes = data.len(), path = %path.display(), "Writing log file");

    tokio::fs::write(&path, &data)
        .await
        .with_context(|| format!("Failed to save file {}", path.display()))?;

    println!("✅ Log file saved as {}", path.display());
    Ok(())
}

async fn delete(client: &TechnitiumClient, file_name: &str) -> Result<()> {
    client.delete_log(file_name).await?;
    println!("✅ Log '{}' deleted successfully.", file_name);
    Ok(())
}

async fn delete_all(client: &TechnitiumClient) -> Result<()> {
    client.delete_all_logs().await?;
    info!("Deleted all log files");
    println!("✅ All logs deleted successfully.");
    Ok(())
}
