//! API Response Types
//!
//! Typed views over the `response` member of the envelopes the CLI renders
//! field by field. Servers omit fields freely between versions, so every
//! struct defaults missing members instead of failing.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

// ============================================================
// Zones
// ============================================================

/// Zone types accepted by the create and convert endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneType {
    Primary,
    Secondary,
    Stub,
    Forwarder,
    SecondaryForwarder,
    Catalog,
    SecondaryCatalog,
}

impl ZoneType {
    pub const ALL: [ZoneType; 7] = [
        ZoneType::Primary,
        ZoneType::Secondary,
        ZoneType::Stub,
        ZoneType::Forwarder,
        ZoneType::SecondaryForwarder,
        ZoneType::Catalog,
        ZoneType::SecondaryCatalog,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneType::Primary => "Primary",
            ZoneType::Secondary => "Secondary",
            ZoneType::Stub => "Stub",
            ZoneType::Forwarder => "Forwarder",
            ZoneType::SecondaryForwarder => "SecondaryForwarder",
            ZoneType::Catalog => "Catalog",
            ZoneType::SecondaryCatalog => "SecondaryCatalog",
        }
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZoneType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ZoneType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = ZoneType::ALL.iter().map(ZoneType::as_str).collect();
                format!(
                    "Invalid zone type: {}\nValid types are: {}",
                    s,
                    valid.join(", ")
                )
            })
    }
}

/// Treat an explicit `null` like a missing field.
///
/// `#[serde(default)]` only covers absent members; the server also sends
/// `null` for unset strings and lists.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ZoneList {
    #[serde(deserialize_with = "null_as_default")]
    pub zones: Vec<Zone>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Zone {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub zone_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub internal: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub disabled: bool,
    pub dnssec_status: Option<String>,
    pub soa_serial: Option<u64>,
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreatedZone {
    #[serde(deserialize_with = "null_as_default")]
    pub domain: String,
}

// ============================================================
// Records
// ============================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecordList {
    #[serde(deserialize_with = "null_as_default")]
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Record {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub record_type: String,
    pub ttl: Value,
    pub r_data: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub disabled: bool,
}

// ============================================================
// Logs
// ============================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogList {
    #[serde(deserialize_with = "null_as_default")]
    pub log_files: Vec<LogFile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogFile {
    #[serde(deserialize_with = "null_as_default")]
    pub file_name: String,
    pub size: Value,
}

// ============================================================
// Sessions & Users
// ============================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SessionList {
    #[serde(deserialize_with = "null_as_default")]
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Session {
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_current_session: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub partial_token: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub session_type: String,
    pub token_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub last_seen: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_seen_remote_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_seen_user_agent: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserList {
    #[serde(deserialize_with = "null_as_default")]
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub disabled: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub previous_session_logged_on: String,
    #[serde(deserialize_with = "null_as_default")]
    pub previous_session_remote_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub recent_session_logged_on: String,
    #[serde(deserialize_with = "null_as_default")]
    pub recent_session_remote_address: String,
    pub session_timeout_seconds: Option<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub groups: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreatedToken {
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub token_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub update_available: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub current_version: String,
    pub update_version: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub update_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub update_message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub download_link: String,
    #[serde(deserialize_with = "null_as_default")]
    pub instructions_link: String,
    #[serde(deserialize_with = "null_as_default")]
    pub change_log_link: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_zone_type_round_trip_names() {
        for zone_type in ZoneType::ALL {
            assert_eq!(zone_type.as_str().parse::<ZoneType>(), Ok(zone_type));
        }
    }

    #[test]
    fn test_zone_type_rejects_unknown() {
        let err = "Master".parse::<ZoneType>().unwrap_err();
        assert!(err.contains("Invalid zone type: Master"));
        assert!(err.contains("SecondaryForwarder"));

        // names are case-sensitive, as the server expects them
        assert!("primary".parse::<ZoneType>().is_err());
    }

    #[test]
    fn test_zone_defaults_missing_fields() {
        let zone: Zone = serde_json::from_value(json!({
            "name": "example.com",
            "type": "Forwarder",
            "disabled": false
        }))
        .unwrap();

        assert_eq!(zone.zone_type, "Forwarder");
        assert!(zone.soa_serial.is_none());
        assert!(!zone.internal);
    }

    #[test]
    fn test_record_rdata_is_kept_raw() {
        let records: RecordList = serde_json::from_value(json!({
            "records": [
                {"name": "example.com", "type": "A", "ttl": 3600, "rData": {"ipAddress": "192.0.2.1"}}
            ]
        }))
        .unwrap();

        let record = &records.records[0];
        assert_eq!(record.ttl, json!(3600));
        assert_eq!(record.r_data.as_ref().unwrap()["ipAddress"], "192.0.2.1");
    }

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        let sessions: SessionList = serde_json::from_value(json!({
            "sessions": [{
                "username": "admin",
                "isCurrentSession": null,
                "partialToken": "272f4890427b9ab5",
                "type": "ApiToken",
                "tokenName": null,
                "lastSeen": "2024-05-01T08:00:00Z",
                "lastSeenRemoteAddress": null,
                "lastSeenUserAgent": null
            }]
        }))
        .unwrap();

        let session = &sessions.sessions[0];
        assert_eq!(session.partial_token, "272f4890427b9ab5");
        assert!(!session.is_current_session);
        assert!(session.token_name.is_none());
        assert_eq!(session.last_seen_user_agent, "");

        let user: User = serde_json::from_value(json!({
            "username": "ops",
            "displayName": null,
            "groups": null,
            "sessions": null,
            "previousSessionLoggedOn": null
        }))
        .unwrap();
        assert_eq!(user.username, "ops");
        assert!(user.groups.is_empty());
        assert!(user.sessions.is_empty());

        let update: UpdateInfo = serde_json::from_value(json!({
            "updateAvailable": false,
            "currentVersion": "13.2",
            "updateTitle": null,
            "downloadLink": null
        }))
        .unwrap();
        assert_eq!(update.current_version, "13.2");
        assert_eq!(update.download_link, "");

        let zones: ZoneList = serde_json::from_value(json!({"zones": null})).unwrap();
        assert!(zones.zones.is_empty());
    }

    #[test]
    fn test_session_type_field() {
        let session: Session = serde_json::from_value(json!({
            "username": "admin",
            "isCurrentSession": true,
            "partialToken": "272f4890427b9ab5",
            "type": "Standard"
        }))
        .unwrap();

        assert!(session.is_current_session);
        assert_eq!(session.session_type, "Standard");
        assert!(session.token_name.is_none());
    }
}
