//! `get-options` and `set-options`

use anyhow::{Context, Result};
use colored::{Color, Colorize};
use serde_json::{Map, Value};
use tracing::debug;

use super::print_json;
use crate::cli::SetOptionsArgs;
use crate::client::TechnitiumClient;
use crate::format::{
    bool_color, bool_line, bool_word, on_off, outln, slice_to_string, str_or_empty,
    string_slice_block, to_bool,
};
use crate::options;

pub async fn get(
    client: &TechnitiumClient,
    zone: &str,
    include_available_keys: bool,
    json: bool,
) -> Result<()> {
    let envelope = client.zone_options(zone, include_available_keys).await?;
    let response = envelope.response_object()?;

    if json {
        return print_json(envelope.response());
    }

    print!("{}", render_zone_options(response));
    Ok(())
}

fn field_or_none(options: &Map<String, Value>, key: &str) -> String {
    match options.get(key) {
        None | Some(Value::Null) => "None".to_string(),
        Some(v) => crate::format::plain(v),
    }
}

fn push_block(out: &mut String, block: Option<String>) {
    if let Some(block) = block {
        out.push_str(&block);
    }
}

/// Human-readable report of a zone's options
pub fn render_zone_options(o: &Map<String, Value>) -> String {
    let grey = Color::BrightBlack;
    let mut out = String::new();

    // header
    outln!(out, "{} {}", "Zone:".bold(), field_or_none(o, "name").blue());
    outln!(out, "{} {}", "Type:".bold(), field_or_none(o, "type"));
    outln!(out, "{} {}", "DNSSEC:".bold(), field_or_none(o, "dnssecStatus"));
    outln!(
        out,
        "{} {}",
        "Status:".bold(),
        on_off(!to_bool(o.get("disabled")), Color::Green, Color::Red)
    );
    if o.contains_key("internal") {
        outln!(
            out,
            "{} {}",
            "Scope:".bold(),
            bool_word(o.get("internal"), Color::Blue, grey, "Internal", "External")
        );
    }
    let catalog = str_or_empty(o.get("catalog"));
    if !catalog.is_empty() {
        outln!(out, "{} {}", "Catalog:".bold(), catalog);
    }
    outln!(out);

    if let Some(failed) = o.get("notifyFailed").and_then(Value::as_bool) {
        outln!(
            out,
            "{} {}",
            "Notify Failed:".bold(),
            bool_color(failed, Color::Red, Color::Green)
        );
    }
    push_block(
        &mut out,
        string_slice_block("Notify Failed For", o.get("notifyFailedFor"), grey, 2),
    );
    outln!(out);

    for (title, key) in [
        ("Override Catalog Query Access", "overrideCatalogQueryAccess"),
        ("Override Catalog Zone Transfer", "overrideCatalogZoneTransfer"),
        ("Override Catalog Notify", "overrideCatalogNotify"),
    ] {
        outln!(out, "{}", bool_line(title, o.get(key), Color::Green, Color::Yellow));
    }
    outln!(out);

    outln!(out, "{} {}", "Query Access:".bold(), field_or_none(o, "queryAccess"));
    push_block(
        &mut out,
        string_slice_block("Query Access ACL", o.get("queryAccessNetworkACL"), grey, 2),
    );
    outln!(out);

    outln!(out, "{} {}", "Zone Transfer:".bold(), field_or_none(o, "zoneTransfer"));
    push_block(
        &mut out,
        string_slice_block("Zone Transfer ACL", o.get("zoneTransferNetworkACL"), grey, 2),
    );
    push_block(
        &mut out,
        string_slice_block(
            "Zone Transfer TSIG Keys",
            o.get("zoneTransferTsigKeyNames"),
            grey,
            2,
        ),
    );
    outln!(out);

    outln!(out, "{} {}", "Notify:".bold(), field_or_none(o, "notify"));
    push_block(
        &mut out,
        string_slice_block("Notify Name Servers", o.get("notifyNameServers"), grey, 2),
    );
    outln!(out);

    outln!(out, "{} {}", "Update Policy:".bold(), field_or_none(o, "update"));
    push_block(
        &mut out,
        string_slice_block("Update Network ACL", o.get("updateNetworkACL"), grey, 2),
    );

    if let Some(policies) = o.get("updateSecurityPolicies").and_then(Value::as_array) {
        outln!(out, "{}", "Update Security Policies:".bold());
        if policies.is_empty() {
            outln!(out, "  (none)");
        }
        for policy in policies {
            let key_name = policy.get("tsigKeyName").map(crate::format::plain).unwrap_or_else(|| "None".into());
            let domain = policy.get("domain").map(crate::format::plain).unwrap_or_else(|| "None".into());
            outln!(
                out,
                "  TSIG: {}  Domain: {}  Types: {}",
                key_name.blue(),
                domain.blue(),
                slice_to_string(policy.get("allowedTypes"))
            );
        }
        outln!(out);
    }

    push_block(
        &mut out,
        string_slice_block(
            "Available Catalog Zones",
            o.get("availableCatalogZoneNames"),
            grey,
            0,
        ),
    );
    push_block(
        &mut out,
        string_slice_block("Available TSIG Keys", o.get("availableTsigKeyNames"), grey, 0),
    );

    out
}

pub async fn set(client: &TechnitiumClient, args: &SetOptionsArgs) -> Result<()> {
    let base = options::load_from(args.data_file.as_deref(), args.stdin)?;
    let params = options::merge(&base, &args.flags)?;
    debug!(zone = %args.zone, keys = ?params.keys().collect::<Vec<_>>(), "Setting zone options");

    client
        .set_zone_options(&args.zone, params.iter().map(|(k, v)| (k.as_str(), v.clone())))
        .await
        .with_context(|| format!("Failed to set options for {}", args.zone))?;

    println!(
        "{} {} {}",
        "✅".green(),
        "Zone options updated for:".bold(),
        args.zone
    );
    Ok(())
}
