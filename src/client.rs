//! Technitium DNS API Client
//!
//! Thin wrapper over the server's HTTP API. Every endpoint answers with an
//! envelope of the form `{"status": "ok", "response": {...}}` or
//! `{"status": "error", "errorMessage": "..."}`; this module issues the
//! request, decodes the envelope and turns failures into [`ApiError`]s.
//! A handful of endpoints (zone export, log download, settings backup) return
//! raw bodies instead, and have their own entry points here.

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

use crate::error::ApiError;
use crate::models::ZoneType;

const USER_AGENT: &str = concat!("tdns/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sections included in settings backups and restores
pub const SETTINGS_SECTIONS: [&str; 10] = [
    "blockLists",
    "logs",
    "scopes",
    "stats",
    "zones",
    "allowedZones",
    "blockedZones",
    "dnsSettings",
    "logSettings",
    "authConfig",
];

/// Query parameters for a single request
pub type Params<'a> = [(&'a str, String)];

// ============================================================
// Envelope
// ============================================================

/// A decoded API reply whose `status` was `ok`
#[derive(Debug, Clone)]
pub struct Envelope {
    raw: Value,
}

impl Envelope {
    /// Validate a decoded body and wrap it
    pub fn from_value(raw: Value) -> Result<Self, ApiError> {
        check_status(&raw)?;
        Ok(Self { raw })
    }

    /// The whole reply, as sent by the server
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The `response` member, or `null` when the server sent none
    pub fn response(&self) -> &Value {
        self.raw.get("response").unwrap_or(&Value::Null)
    }

    /// The `response` member, which must be an object
    pub fn response_object(&self) -> Result<&Map<String, Value>, ApiError> {
        self.response()
            .as_object()
            .ok_or_else(|| ApiError::Structure("response is not an object".to_string()))
    }

    /// Deserialize the `response` member into a typed model
    pub fn response_as<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_value(self.response().clone())
            .map_err(|e| ApiError::Structure(e.to_string()))
    }
}

/// Check the `status` field of an envelope
pub fn check_status(raw: &Value) -> Result<(), ApiError> {
    if raw.get("status").and_then(Value::as_str) == Some("ok") {
        return Ok(());
    }

    match raw.get("errorMessage").and_then(Value::as_str) {
        Some(msg) if !msg.trim().is_empty() => Err(ApiError::Api(msg.to_string())),
        _ => Err(ApiError::Unexpected),
    }
}

// ============================================================
// Client Implementation
// ============================================================

/// Technitium DNS API client
#[derive(Debug, Clone)]
pub struct TechnitiumClient {
    http: Client,
    host: String,
    token: String,
}

impl TechnitiumClient {
    /// Create a new client for the server at `host`, authenticating with `token`
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let host = host.into().trim_end_matches('/').to_string();

        Ok(Self {
            http,
            host,
            token: token.into(),
        })
    }

    /// Base URL of the server, without a trailing slash
    pub fn host(&self) -> &str {
        &self.host
    }

    fn request(&self, method: Method, path: &str, params: &Params<'_>) -> RequestBuilder {
        let url = format!("{}{}", self.host, path);
        debug!(method = %method, url = %url, params = ?redact(params), "Calling API");

        let mut builder = self.http.request(method, &url);
        if !self.token.is_empty() {
            builder = builder
                .bearer_auth(&self.token)
                .query(&[("token", self.token.as_str())]);
        }
        builder.query(params)
    }

    async fn decode(response: Response) -> Result<Envelope, ApiError> {
        let status = response.status();
        let body = response.bytes().await?;

        let raw: Value = match serde_json::from_slice(&body) {
            Ok(raw) => raw,
            Err(_) if !status.is_success() => return Err(ApiError::Http(status.as_u16())),
            Err(e) => return Err(ApiError::Decode(e)),
        };

        debug!(http_status = status.as_u16(), "Decoded API envelope");
        Envelope::from_value(raw)
    }

    /// Issue a GET and decode the envelope
    pub async fn get(&self, path: &str, params: &Params<'_>) -> Result<Envelope, ApiError> {
        let response = self.request(Method::GET, path, params).send().await?;
        Self::decode(response).await
    }

    /// Issue a DELETE and decode the envelope
    pub async fn delete(&self, path: &str, params: &Params<'_>) -> Result<Envelope, ApiError> {
        let response = self.request(Method::DELETE, path, params).send().await?;
        Self::decode(response).await
    }

    /// Issue a GET for a binary download; any non-2xx status is an error
    pub async fn get_raw(&self, path: &str, params: &Params<'_>) -> Result<Vec<u8>, ApiError> {
        let response = self.request(Method::GET, path, params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Issue a GET whose body is plain text unless the server reports an error
    pub async fn get_text(&self, path: &str, params: &Params<'_>) -> Result<String, ApiError> {
        let response = self.request(Method::GET, path, params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if let Ok(raw @ Value::Object(_)) = serde_json::from_str::<Value>(&body) {
            if raw.get("status").is_some() {
                check_status(&raw)?;
            }
        } else if !status.is_success() {
            return Err(ApiError::Http(status.as_u16()));
        }

        Ok(body)
    }

    /// POST a `text/plain` body; a JSON reply must carry an `ok` status
    pub async fn post_text(
        &self,
        path: &str,
        params: &Params<'_>,
        body: String,
    ) -> Result<String, ApiError> {
        let response = self
            .request(Method::POST, path, params)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str::<Value>(&text) {
            Ok(raw) => check_status(&raw)?,
            Err(_) if !status.is_success() => return Err(ApiError::Http(status.as_u16())),
            Err(_) => {}
        }

        Ok(text)
    }

    /// Upload a file as `multipart/form-data` under `field`
    pub async fn post_file(
        &self,
        path: &str,
        params: &Params<'_>,
        field: &str,
        file_name: String,
        contents: Vec<u8>,
    ) -> Result<Envelope, ApiError> {
        let part = reqwest::multipart::Part::bytes(contents).file_name(file_name);
        let form = reqwest::multipart::Form::new().part(field.to_string(), part);

        let response = self
            .request(Method::POST, path, params)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http(status.as_u16()));
        }

        Self::decode(response).await
    }
}

// ============================================================
// Endpoints
// ============================================================

impl TechnitiumClient {
    /// List all zones
    pub async fn list_zones(&self) -> Result<Envelope, ApiError> {
        self.get("/api/zones/list", &[]).await
    }

    /// Create a zone
    pub async fn create_zone(
        &self,
        zone: &str,
        zone_type: ZoneType,
        use_soa_serial_date_scheme: bool,
        primary_name_server_addresses: Option<&str>,
    ) -> Result<Envelope, ApiError> {
        let mut params = vec![
            ("zone", zone.to_string()),
            ("type", zone_type.to_string()),
            (
                "useSoaSerialDateScheme",
                use_soa_serial_date_scheme.to_string(),
            ),
        ];
        if let Some(addresses) = primary_name_server_addresses.filter(|a| !a.is_empty()) {
            params.push(("primaryNameServerAddresses", addresses.to_string()));
        }

        self.get("/api/zones/create", &params).await
    }

    /// Delete a zone
    pub async fn delete_zone(&self, zone: &str) -> Result<Envelope, ApiError> {
        self.delete("/api/zones/delete", &[("zone", zone.to_string())])
            .await
    }

    /// Enable a zone
    pub async fn enable_zone(&self, zone: &str) -> Result<Envelope, ApiError> {
        self.get("/api/zones/enable", &[("zone", zone.to_string())])
            .await
    }

    /// Disable a zone
    pub async fn disable_zone(&self, zone: &str) -> Result<Envelope, ApiError> {
        self.get("/api/zones/disable", &[("zone", zone.to_string())])
            .await
    }

    /// Resynchronize a secondary/stub zone with its primary
    pub async fn resync_zone(&self, zone: &str) -> Result<Envelope, ApiError> {
        self.get("/api/zones/resync", &[("zone", zone.to_string())])
            .await
    }

    /// Convert a zone to another type
    pub async fn convert_zone(&self, zone: &str, zone_type: ZoneType) -> Result<Envelope, ApiError> {
        let params = [("zone", zone.to_string()), ("type", zone_type.to_string())];
        self.get("/api/zones/convert", &params).await
    }

    /// Export a zone in zone-file format
    pub async fn export_zone(&self, zone: &str) -> Result<String, ApiError> {
        self.get_text("/api/zones/export", &[("zone", zone.to_string())])
            .await
    }

    /// Import zone-file text into a zone
    pub async fn import_zone(
        &self,
        zone: &str,
        overwrite: bool,
        data: String,
    ) -> Result<String, ApiError> {
        let params = [("zone", zone.to_string()), ("overwrite", overwrite.to_string())];
        self.post_text("/api/zones/import", &params, data).await
    }

    /// Read the options of a zone
    pub async fn zone_options(
        &self,
        zone: &str,
        include_available_tsig_key_names: bool,
    ) -> Result<Envelope, ApiError> {
        let params = [
            ("zone", zone.to_string()),
            (
                "includeAvailableTsigKeyNames",
                include_available_tsig_key_names.to_string(),
            ),
        ];
        self.get("/api/zones/options/get", &params).await
    }

    /// Write zone options; `options` are sent as query parameters
    pub async fn set_zone_options<'a, I>(&self, zone: &str, options: I) -> Result<Envelope, ApiError>
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        let mut params = vec![("zone", zone.to_string())];
        params.extend(options);
        self.get("/api/zones/options/set", &params).await
    }

    /// List every record of a zone
    pub async fn zone_records(&self, zone: &str) -> Result<Envelope, ApiError> {
        let params = [
            ("domain", zone.to_string()),
            ("zone", zone.to_string()),
            ("listZone", "true".to_string()),
        ];
        self.get("/api/zones/records/get", &params).await
    }

    /// Add a record; `params` carry the zone, domain, type and record data
    pub async fn add_record(&self, params: &Params<'_>) -> Result<Envelope, ApiError> {
        self.get("/api/zones/records/add", params).await
    }

    /// Delete a record matching `params`
    pub async fn delete_record(&self, params: &Params<'_>) -> Result<Envelope, ApiError> {
        self.get("/api/zones/records/delete", params).await
    }

    /// List the server's log files
    pub async fn list_logs(&self) -> Result<Envelope, ApiError> {
        self.get("/api/logs/list", &[]).await
    }

    /// Download a log file
    pub async fn download_log(&self, file_name: &str) -> Result<Vec<u8>, ApiError> {
        self.get_raw("/api/logs/download", &[("fileName", file_name.to_string())])
            .await
    }

    /// Delete a log file
    pub async fn delete_log(&self, file_name: &str) -> Result<Envelope, ApiError> {
        self.get("/api/logs/delete", &[("log", file_name.to_string())])
            .await
    }

    /// Delete every log file
    pub async fn delete_all_logs(&self) -> Result<Envelope, ApiError> {
        self.get("/api/logs/deleteAll", &[]).await
    }

    /// Read the server settings
    pub async fn settings(&self) -> Result<Envelope, ApiError> {
        self.get("/api/settings/get", &[]).await
    }

    /// Download a backup archive covering every settings section
    pub async fn backup_settings(&self) -> Result<Vec<u8>, ApiError> {
        let params = section_params(false);
        self.get_raw("/api/settings/backup", &params).await
    }

    /// Upload a backup archive, replacing existing files
    pub async fn restore_settings(
        &self,
        file_name: String,
        contents: Vec<u8>,
    ) -> Result<Envelope, ApiError> {
        let params = section_params(true);
        self.post_file("/api/settings/restore", &params, "file", file_name, contents)
            .await
    }

    /// List active sessions
    pub async fn list_sessions(&self) -> Result<Envelope, ApiError> {
        self.get("/api/admin/sessions/list", &[]).await
    }

    /// Delete a session by its partial token
    pub async fn delete_session(&self, partial_token: &str) -> Result<Envelope, ApiError> {
        self.get(
            "/api/admin/sessions/delete",
            &[("partialToken", partial_token.to_string())],
        )
        .await
    }

    /// Create a non-expiring API token for a user
    pub async fn create_token(&self, user: &str, token_name: &str) -> Result<Envelope, ApiError> {
        let params = [("user", user.to_string()), ("tokenName", token_name.to_string())];
        self.get("/api/admin/sessions/createToken", &params).await
    }

    /// List users
    pub async fn list_users(&self) -> Result<Envelope, ApiError> {
        self.get("/api/admin/users/list", &[]).await
    }

    /// Read a single user, including group membership
    pub async fn user(&self, user: &str) -> Result<Envelope, ApiError> {
        let params = [("user", user.to_string()), ("includeGroups", "true".to_string())];
        self.get("/api/admin/users/get", &params).await
    }

    /// Ask the server whether a newer release exists
    pub async fn check_for_update(&self) -> Result<Envelope, ApiError> {
        self.get("/api/user/checkForUpdate", &[]).await
    }
}

fn section_params(restore: bool) -> Vec<(&'static str, String)> {
    let mut params: Vec<(&'static str, String)> = SETTINGS_SECTIONS
        .iter()
        .map(|section| (*section, "true".to_string()))
        .collect();
    if restore {
        params.push(("deleteExistingFiles", "true".to_string()));
    }
    params
}

fn redact(params: &Params<'_>) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(key, value)| {
            let shown = if key.eq_ignore_ascii_case("token") {
                "***".to_string()
            } else {
                value.clone()
            };
            (key.to_string(), shown)
        })
        .collect()
}
