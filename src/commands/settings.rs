//! `settings get|backup|restore`

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use colored::Colorize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::print_json;
use crate::cli::SettingsCommand;
use crate::client::TechnitiumClient;
use crate::format::{outln, plain};

pub async fn run(client: &TechnitiumClient, command: SettingsCommand) -> Result<()> {
    match command {
        SettingsCommand::Get { json } => get(client, json).await,
        SettingsCommand::Backup { output } => backup(client, output).await,
        SettingsCommand::Restore { input, json } => restore(client, &input, json).await,
    }
}

async fn get(client: &TechnitiumClient, json: bool) -> Result<()> {
    let envelope = client.settings().await?;

    if json {
        return print_json(envelope.raw());
    }

    print!("{}", render_settings(envelope.response_object()?));
    Ok(())
}

fn field(settings: &Map<String, Value>, key: &str) -> String {
    settings.get(key).map(plain).unwrap_or_else(|| "None".to_string())
}

/// Grouped report of the server settings
pub fn render_settings(s: &Map<String, Value>) -> String {
    let mut out = String::new();

    outln!(out, "{}", "General Settings:".bold());
    outln!(out, "  Version: {}", field(s, "version").green());
    outln!(out, "  Start Time: {}", field(s, "uptimestamp"));
    outln!(out, "  Domain: {}", field(s, "dnsServerDomain").cyan());
    outln!(out);

    outln!(out, "{}", "DNS Endpoints:".bold());
    outln!(out, "  Local: {}", field(s, "dnsServerLocalEndPoints"));
    outln!(out, "  IPv4: {}", field(s, "dnsServerIPv4SourceAddresses"));
    outln!(out, "  IPv6: {}", field(s, "dnsServerIPv6SourceAddresses"));
    outln!(out);

    outln!(out, "{}", "Blocking:".bold());
    outln!(out, "  Enabled: {}", field(s, "enableBlocking").green());
    outln!(out, "  Type: {}", field(s, "blockingType"));
    outln!(out, "  TTL: {}", field(s, "blockingAnswerTtl"));
    outln!(out, "  Custom Addresses: {}", field(s, "customBlockingAddresses"));
    outln!(out);

    outln!(out, "{}", "DNSSEC & Cache:".bold());
    outln!(out, "  DNSSEC: {}", field(s, "dnssecValidation"));
    outln!(out, "  Save Cache: {}", field(s, "saveCache"));
    outln!(out, "  Serve Stale: {}", field(s, "serveStale"));
    outln!(out, "  Max Entries: {}", field(s, "cacheMaximumEntries"));
    outln!(out, "  Failure TTL: {}", field(s, "cacheFailureRecordTtl"));
    outln!(out);

    outln!(out, "{}", "Forwarders:".bold());
    outln!(out, "  Enabled: {}", field(s, "concurrentForwarding"));
    outln!(out, "  Protocol: {}", field(s, "forwarderProtocol"));
    outln!(out, "  Timeout: {}ms", field(s, "forwarderTimeout"));
    outln!(out);

    outln!(out, "{}", "Web Service:".bold());
    outln!(out, "  HTTP Port: {}", field(s, "webServiceHttpPort"));
    outln!(out, "  TLS Port: {}", field(s, "webServiceTlsPort"));
    outln!(out, "  TLS Enabled: {}", field(s, "webServiceEnableTls"));
    outln!(out);

    outln!(out, "{}", "Stats & Logging:".bold());
    outln!(out, "  Enable Logging: {}", field(s, "enableLogging"));
    outln!(out, "  Log Folder: {}", field(s, "logFolder"));
    outln!(out, "  In-Memory Stats: {}", field(s, "enableInMemoryStats"));
    outln!(out, "  Max Log Days: {}", field(s, "maxLogFileDays"));
    outln!(out);

    outln!(out, "{}", "TSIG Keys:".bold());
    let keys = s.get("tsigKeys").and_then(Value::as_array);
    match keys {
        Some(keys) if !keys.is_empty() => {
            for key in keys {
                let name = key.get("keyName").map(plain).unwrap_or_default();
                let algorithm = key.get("algorithmName").map(plain).unwrap_or_default();
                outln!(out, "  - {} ({})", name.cyan(), algorithm.yellow());
            }
        }
        _ => {
            outln!(out, "  (none)");
        }
    }

    out
}

/// `tdns-backup-YYYYMMDD-HHMMSS.zip` for the given moment
pub fn backup_file_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("tdns-backup-{}.zip", at.format("%Y%m%d-%H%M%S"))
}

async fn backup(client: &TechnitiumClient, output: Option<PathBuf>) -> Result<()> {
    let data = client
        .backup_settings()
        .await
        .context("Failed to download backup")?;

    let path = output.unwrap_or_else(|| PathBuf::from(backup_file_name(&Local::now())));
    debug!(bytes = data.len(), path = %path.display(), "Writing settings backup");

    tokio::fs::write(&path, &data)
        .await
        .with_context(|| format!("Could not write {}", path.display()))?;

    println!("✅ Backup saved as {}", path.display());
    Ok(())
}

async fn restore(client: &TechnitiumClient, input: &Path, json: bool) -> Result<()> {
    let contents = tokio::fs::read(input)
        .await
        .with_context(|| format!("Could not open file {}", input.display()))?;
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "backup.zip".to_string());

    info!(file = %file_name, bytes = contents.len(), "Restoring settings");
    let envelope = client
        .restore_settings(file_name, contents)
        .await
        .context("Restore failed")?;

    if json {
        return print_json(envelope.raw());
    }

    print!("{}", render_restore_summary(envelope.response_object()?));
    Ok(())
}

/// Short server summary shown after a restore
pub fn render_restore_summary(s: &Map<String, Value>) -> String {
    let mut out = String::new();

    outln!(out, "{}", "DNS Server Info:".bold());
    outln!(out, "  Domain: {}", field(s, "dnsServerDomain").cyan());
    outln!(out, "  Version: {}", field(s, "version").green());
    outln!(out, "  Started: {}", field(s, "uptimestamp"));
    outln!(out);

    outln!(out, "{}", "Network:".bold());
    outln!(out, "  Endpoints: {}", field(s, "dnsServerLocalEndPoints"));
    outln!(out, "  IPv4 Sources: {}", field(s, "dnsServerIPv4SourceAddresses"));
    outln!(out, "  IPv6 Sources: {}", field(s, "dnsServerIPv6SourceAddresses"));
    outln!(out);

    outln!(out, "{}", "Cache & Resolver:".bold());
    outln!(out, "  Save Cache: {}", field(s, "saveCache"));
    outln!(out, "  Serve Stale: {}", field(s, "serveStale"));
    outln!(out, "  Prefetch Trigger: {}", field(s, "cachePrefetchTrigger"));
    outln!(out);

    outln!(out, "{}", "Blocking:".bold());
    outln!(out, "  Enabled: {}", field(s, "enableBlocking"));
    outln!(out, "  Custom Addresses: {}", field(s, "customBlockingAddresses"));
    outln!(out);

    outln!(out, "{}", "Web Service:".bold());
    outln!(out, "  HTTP Port: {}", field(s, "webServiceHttpPort"));
    outln!(out, "  TLS Port: {}", field(s, "webServiceTlsPort"));
    outln!(out, "  Enable TLS: {}", field(s, "webServiceEnableTls"));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::no_color;
    use crate::testing::serve;
    use axum::routing::{get as get_route, post};
    use axum::{Json, Router};
    use chrono::Utc;
    use serde_json::json;

    fn settings() -> Map<String, Value> {
        json!({
            "version": "13.2",
            "uptimestamp": "2024-05-01T08:00:00Z",
            "dnsServerDomain": "dns.example",
            "dnsServerLocalEndPoints": ["0.0.0.0:53", "[::]:53"],
            "enableBlocking": true,
            "blockingType": "AnyAddress",
            "customBlockingAddresses": [],
            "forwarderTimeout": 2000,
            "webServiceHttpPort": 5380,
            "logFolder": null,
            "tsigKeys": [{"keyName": "xfr", "algorithmName": "hmac-sha256"}]
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn test_render_settings() {
        no_color();
        let out = render_settings(&settings());
        assert!(out.starts_with("General Settings:\n  Version: 13.2\n"));
        assert!(out.contains("  Local: [0.0.0.0:53, [::]:53]\n"));
        assert!(out.contains("  IPv6: None\n"));
        assert!(out.contains("  Custom Addresses: []\n"));
        assert!(out.contains("  Timeout: 2000ms\n"));
        assert!(out.contains("  Log Folder: None\n"));
        assert!(out.ends_with("TSIG Keys:\n  - xfr (hmac-sha256)\n"));
    }

    #[test]
    fn test_render_settings_without_tsig_keys() {
        no_color();
        let out = render_settings(&Map::new());
        assert!(out.ends_with("TSIG Keys:\n  (none)\n"));
    }

    #[test]
    fn test_backup_file_name() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 3, 7).unwrap();
        assert_eq!(backup_file_name(&at), "tdns-backup-20240501-090307.zip");
    }

    #[test]
    fn test_render_restore_summary() {
        no_color();
        let out = render_restore_summary(&settings());
        assert!(out.starts_with("DNS Server Info:\n  Domain: dns.example\n  Version: 13.2\n"));
        assert!(out.ends_with("  Enable TLS: None\n"));
    }

    #[tokio::test]
    async fn test_backup_writes_archive() {
        let router = Router::new().route(
            "/api/settings/backup",
            get_route(|| async { "PK\u{3}\u{4}zip" }),
        );
        let base = serve(router).await;
        let client = TechnitiumClient::new(base, "t").unwrap();
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("backup.zip");
        backup(&client, Some(path.clone())).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"PK\x03\x04zip");
    }

    #[tokio::test]
    async fn test_restore_uploads_and_renders() {
        let router = Router::new().route(
            "/api/settings/restore",
            post(|| async {
                Json(json!({"status": "ok", "response": {"version": "13.2"}}))
            }),
        );
        let base = serve(router).await;
        let client = TechnitiumClient::new(base, "t").unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"PK-DATA").unwrap();

        restore(&client, file.path(), false).await.unwrap();
        restore(&client, file.path(), true).await.unwrap();

        let err = restore(&client, Path::new("/nonexistent/backup.zip"), false)
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Could not open file"));
    }
}
