//! `records get|add|delete`

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::{debug, info};

use super::print_json;
use crate::cli::{RecordData, RecordTarget, RecordsCommand};
use crate::client::TechnitiumClient;
use crate::format::{format_value, outln, plain};
use crate::models::{Record, RecordList};

pub async fn run(client: &TechnitiumClient, command: RecordsCommand) -> Result<()> {
    match command {
        RecordsCommand::Get { zone, filter, json } => {
            get(client, &zone, filter.as_deref(), json).await
        }
        RecordsCommand::Add {
            target,
            ttl,
            overwrite,
            data,
            json,
        } => add(client, &target, ttl, overwrite, &data, json).await,
        RecordsCommand::Delete { target, data } => delete(client, &target, &data).await,
    }
}

async fn get(client: &TechnitiumClient, zone: &str, filter: Option<&str>, json: bool) -> Result<()> {
    let envelope = client.zone_records(zone).await?;

    if json {
        return print_json(envelope.raw());
    }

    let list: RecordList = envelope.response_as()?;
    debug!(zone = %zone, count = list.records.len(), "Fetched records");
    print!("{}", render_records(zone, &list.records, filter));
    Ok(())
}

/// Record listing, optionally narrowed to one record type
pub fn render_records(zone: &str, records: &[Record], filter: Option<&str>) -> String {
    if records.is_empty() {
        return format!("No records found for {}.\n", zone);
    }

    let filter = filter.filter(|f| !f.is_empty());
    let mut out = String::new();
    outln!(out, "{} {}\n", "Records for zone:".bold(), zone.cyan());

    for record in records {
        if let Some(wanted) = filter {
            if !record.record_type.eq_ignore_ascii_case(wanted) {
                continue;
            }
        }

        let rdata = match &record.r_data {
            Some(value) if !value.is_null() => format_value(value),
            _ => "None".to_string(),
        };
        outln!(
            out,
            "{}  {}  {}  {}",
            record.name.green(),
            record.record_type,
            plain(&record.ttl),
            rdata
        );
    }
    out
}

/// Query parameters addressing a record: zone, domain, type and record data
pub fn record_params(target: &RecordTarget, data: &RecordData) -> Vec<(&'static str, String)> {
    let domain = target
        .domain
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(&target.zone);

    let mut params = vec![
        ("zone", target.zone.clone()),
        ("domain", domain.to_string()),
        ("type", target.record_type.clone()),
    ];

    let fields = [
        ("ipAddress", &data.ip_address),
        ("cname", &data.cname),
        ("text", &data.text),
        ("nameServer", &data.name_server),
        ("exchange", &data.exchange),
        ("ptrName", &data.ptr_name),
    ];
    for (key, value) in fields {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            params.push((key, value.to_string()));
        }
    }
    if let Some(preference) = data.preference {
        params.push(("preference", preference.to_string()));
    }

    params
}

async fn add(
    client: &TechnitiumClient,
    target: &RecordTarget,
    ttl: Option<u32>,
    overwrite: bool,
    data: &RecordData,
    json: bool,
) -> Result<()> {
    let mut params = record_params(target, data);
    if let Some(ttl) = ttl {
        params.push(("ttl", ttl.to_string()));
    }
    params.push(("overwrite", overwrite.to_string()));

    let envelope = client
        .add_record(&params)
        .await
        .with_context(|| format!("Failed to add {} record to {}", target.record_type, target.zone))?;

    if json {
        return print_json(envelope.response());
    }

    info!(zone = %target.zone, record_type = %target.record_type, "Record added");
    println!(
        "✅ {} record added to zone {}.",
        target.record_type,
        target.zone.bold()
    );
    Ok(())
}

async fn delete(client: &TechnitiumClient, target: &RecordTarget, data: &RecordData) -> Result<()> {
    let params = record_params(target, data);

    client
        .delete_record(&params)
        .await
        .with_context(|| format!("Failed to delete {} record from {}", target.record_type, target.zone))?;

    println!(
        "✅ {} record deleted from zone {}.",
        target.record_type,
        target.zone.bold()
    );
    Ok(())
}
