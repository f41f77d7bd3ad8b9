//! Zone options merging
//!
//! `set-options` accepts a JSON document (file or stdin) and individual
//! flags. The JSON supplies a base set of query parameters; flags given on
//! the command line override individual keys.

use anyhow::{bail, Context, Result};
use clap::Args;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::format::plain;

/// Keys the client sets itself and never takes from user JSON
pub const RESERVED_KEYS: [&str; 2] = ["token", "zone"];

/// Where the JSON base document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionSource {
    None,
    File(PathBuf),
    Stdin,
}

impl OptionSource {
    pub fn new(data_file: Option<PathBuf>, stdin: bool) -> Result<Self> {
        match (data_file, stdin) {
            (Some(_), true) => bail!("--data-file and --stdin are mutually exclusive"),
            (Some(path), false) => Ok(OptionSource::File(path)),
            (None, true) => Ok(OptionSource::Stdin),
            (None, false) => Ok(OptionSource::None),
        }
    }
}

/// Individual option flags; unset flags leave the base document untouched
#[derive(Args, Debug, Clone, Default)]
pub struct OptionFlags {
    /// Set zone disabled state (true|false)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub disabled: Option<bool>,

    /// Catalog zone name
    #[arg(long)]
    pub catalog: Option<String>,

    /// Comma-separated primary name server IPs
    #[arg(long, alias = "primaryNameServerAddresses")]
    pub primary_name_server_addresses: Option<String>,

    /// Primary zone transfer TSIG key name
    #[arg(long, alias = "primaryZoneTransferTsigKeyName")]
    pub primary_zone_transfer_tsig_key_name: Option<String>,

    /// Validate zone after applying options (true|false)
    #[arg(
        long,
        alias = "validateZone",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub validate_zone: Option<bool>,

    /// Notify setting (e.g. None, ZoneNameServers, SpecifiedNameServers)
    #[arg(long)]
    pub notify: Option<String>,

    /// Comma-separated list of notify name servers
    #[arg(long, alias = "notifyNameServers")]
    pub notify_name_servers: Option<String>,
}

/// Read the base document from `source`; `stdin` is only read for [`OptionSource::Stdin`]
pub fn load_base<R: Read>(source: &OptionSource, mut stdin: R) -> Result<Map<String, Value>> {
    match source {
        OptionSource::None => Ok(Map::new()),
        OptionSource::File(path) => {
            let body = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            if body.trim().is_empty() {
                return Ok(Map::new());
            }
            parse_base(&body).with_context(|| format!("invalid JSON in {}", path.display()))
        }
        OptionSource::Stdin => {
            let mut body = String::new();
            stdin
                .read_to_string(&mut body)
                .context("failed to read stdin")?;
            if body.trim().is_empty() {
                bail!("no data received on stdin");
            }
            parse_base(&body).context("invalid JSON on stdin")
        }
    }
}

/// Parse a JSON document that must be an object
pub fn parse_base(body: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(body)? {
        Value::Object(map) => Ok(map),
        other => bail!("expected a JSON object, got {}", kind(&other)),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Query parameters derived from the base document
pub fn base_params(base: &Map<String, Value>) -> BTreeMap<String, String> {
    base.iter()
        .filter(|(key, value)| !RESERVED_KEYS.contains(&key.as_str()) && !value.is_null())
        .map(|(key, value)| (key.clone(), param_value(value)))
        .collect()
}

fn param_value(value: &Value) -> String {
    match value {
        Value::Array(items) => items.iter().map(plain).collect::<Vec<_>>().join(","),
        other => plain(other),
    }
}

/// Apply the flags the user actually passed on top of `params`
pub fn apply_flags(params: &mut BTreeMap<String, String>, flags: &OptionFlags) {
    if let Some(disabled) = flags.disabled {
        params.insert("disabled".to_string(), disabled.to_string());
    }
    if let Some(catalog) = non_empty(&flags.catalog) {
        params.insert("catalog".to_string(), catalog.to_string());
    }
    if let Some(addresses) = non_empty(&flags.primary_name_server_addresses) {
        params.insert("primaryNameServerAddresses".to_string(), join_csv(addresses));
    }
    if let Some(key) = non_empty(&flags.primary_zone_transfer_tsig_key_name) {
        params.insert("primaryZoneTransferTsigKeyName".to_string(), key.to_string());
    }
    if let Some(validate) = flags.validate_zone {
        params.insert("validateZone".to_string(), validate.to_string());
    }
    if let Some(notify) = non_empty(&flags.notify) {
        params.insert("notify".to_string(), notify.to_string());
    }
    if let Some(servers) = non_empty(&flags.notify_name_servers) {
        params.insert("notifyNameServers".to_string(), join_csv(servers));
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Merge the base document and flags into the final option set
pub fn merge(base: &Map<String, Value>, flags: &OptionFlags) -> Result<BTreeMap<String, String>> {
    let mut params = base_params(base);
    apply_flags(&mut params, flags);

    if params.is_empty() {
        bail!("no options provided — use flags and/or --data-file/--stdin");
    }

    Ok(params)
}

/// Normalize a comma-separated list: trim entries and drop empty ones
pub fn join_csv(s: &str) -> String {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Convenience for callers holding a path and a flag pair
pub fn load_from(data_file: Option<&Path>, stdin: bool) -> Result<Map<String, Value>> {
    let source = OptionSource::new(data_file.map(Path::to_path_buf), stdin)?;
    load_base(&source, std::io::stdin())
}
