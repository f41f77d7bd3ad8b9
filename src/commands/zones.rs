//! Zone lifecycle commands: list, create, delete, enable/disable, resync,
//! convert, export and import.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use tracing::{debug, info};

use super::{print_json, ZoneBatch};
use crate::cli::CreateArgs;
use crate::client::TechnitiumClient;
use crate::format::outln;
use crate::models::{CreatedZone, Zone, ZoneList, ZoneType};

pub async fn list(client: &TechnitiumClient, json: bool) -> Result<()> {
    let envelope = client.list_zones().await?;

    if json {
        return print_json(envelope.raw());
    }

    let zones: ZoneList = envelope.response_as()?;
    debug!(count = zones.zones.len(), "Listed zones");
    print!("{}", render_zone_list(zones.zones));
    Ok(())
}

/// Zones sorted by name, one block per zone
pub fn render_zone_list(mut zones: Vec<Zone>) -> String {
    zones.sort_by(|a, b| a.name.cmp(&b.name));

    let mut out = String::new();
    for zone in &zones {
        let status = if zone.disabled {
            "Disabled".red()
        } else {
            "Enabled".green()
        };
        let scope = if zone.internal {
            "Internal".blue()
        } else {
            "External".bright_black()
        };
        let dnssec = zone
            .dnssec_status
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("Unsigned");

        outln!(out, "{} ({})", zone.name.bold(), zone.zone_type.blue());
        outln!(
            out,
            "  Last Modified: {}",
            zone.last_modified.as_deref().unwrap_or("None")
        );
        outln!(out, "  SOA Serial: {}", zone.soa_serial.unwrap_or_default());
        outln!(out, "  Status: {} | {}", status, scope);
        outln!(out, "  DNSSEC: {}", dnssec.yellow());
        outln!(out);
    }
    out
}

pub async fn create(client: &TechnitiumClient, args: &CreateArgs) -> Result<()> {
    let mut batch = ZoneBatch::default();

    for zone in &args.zones {
        let result = async {
            let envelope = client
                .create_zone(
                    zone,
                    args.zone_type,
                    args.use_soa_serial_date_scheme,
                    args.primary_name_server_addresses.as_deref(),
                )
                .await
                .with_context(|| format!("Failed to create zone {}", zone))?;

            let created: CreatedZone = envelope.response_as()?;
            let domain = if created.domain.is_empty() {
                zone.as_str()
            } else {
                created.domain.as_str()
            };
            info!(zone = %domain, zone_type = %args.zone_type, "Zone created");
            println!("✅ Zone {} created successfully.", domain);
            Ok::<(), anyhow::Error>(())
        }
        .await;

        batch.record(zone, result);
    }

    batch.finish("create")
}

pub async fn delete(client: &TechnitiumClient, zone: &str) -> Result<()> {
    client
        .delete_zone(zone)
        .await
        .with_context(|| format!("Delete failed for '{}'", zone))?;

    println!("✅ Zone '{}' deleted successfully.", zone);
    Ok(())
}

pub async fn enable(client: &TechnitiumClient, zones: &[String]) -> Result<()> {
    let mut batch = ZoneBatch::default();
    for zone in zones {
        let result = client.enable_zone(zone).await.map(|_| {
            println!("✅ Zone {} enabled successfully.", zone.bold());
        });
        batch.record(zone, result.map_err(Into::into));
    }
    batch.finish("enable")
}

pub async fn disable(client: &TechnitiumClient, zones: &[String]) -> Result<()> {
    let mut batch = ZoneBatch::default();
    for zone in zones {
        let result = client.disable_zone(zone).await.map(|_| {
            println!("✅ Zone {} disabled successfully.", zone.bold());
        });
        batch.record(zone, result.map_err(Into::into));
    }
    batch.finish("disable")
}

pub async fn resync(client: &TechnitiumClient, zones: &[String]) -> Result<()> {
    let mut batch = ZoneBatch::default();
    for zone in zones {
        let result = client.resync_zone(zone).await.map(|_| {
            println!("✅ Zone {} resynced successfully.", zone.bold());
        });
        batch.record(zone, result.map_err(Into::into));
    }
    batch.finish("resync")
}

pub async fn convert(client: &TechnitiumClient, zone: &str, zone_type: ZoneType) -> Result<()> {
    client
        .convert_zone(zone, zone_type)
        .await
        .with_context(|| format!("Failed to convert zone {}", zone))?;

    println!(
        "✅ Zone {} converted to {} successfully.",
        zone.bold(),
        zone_type.as_str().cyan()
    );
    Ok(())
}

pub async fn export(
    client: &TechnitiumClient,
    zones: &[String],
    output_dir: Option<&Path>,
    json: bool,
) -> Result<()> {
    let mut batch = ZoneBatch::default();

    for zone in zones {
        let result = async {
            let body = client
                .export_zone(zone)
                .await
                .with_context(|| format!("Export failed for {}", zone))?;

            match output_dir {
                Some(dir) => {
                    let path = export_path(dir, zone);
                    tokio::fs::write(&path, &body)
                        .await
                        .with_context(|| format!("Failed to write to {}", path.display()))?;
                    println!("✅ Zone '{}' exported to {}", zone, path.display());
                }
                None if json => println!("{}", body),
                None => {
                    println!("Zone: {}", zone);
                    println!("{}", body);
                }
            }
            Ok::<(), anyhow::Error>(())
        }
        .await;

        batch.record(zone, result);
    }

    batch.finish("export")
}

/// `<dir>/<zone>.zone`
pub fn export_path(dir: &Path, zone: &str) -> std::path::PathBuf {
    dir.join(format!("{}.zone", zone))
}

pub async fn import(
    client: &TechnitiumClient,
    zone: &str,
    file: &Path,
    overwrite: bool,
    json: bool,
) -> Result<()> {
    let data = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read file {}", file.display()))?;

    let reply = client
        .import_zone(zone, overwrite, data)
        .await
        .with_context(|| format!("Import failed for '{}'", zone))?;

    if json {
        println!("{}", reply);
    } else {
        println!("✅ Zone '{}' imported successfully.", zone);
    }
    Ok(())
}
