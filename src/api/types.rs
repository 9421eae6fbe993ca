//! Wire types for zones and DNS records

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// TTL sentinel the API uses for "automatic".
pub const AUTO_TTL: u32 = 1;

/// Query-string filters sent with a list request (`name`, `type`, `page`, ...).
pub type Filters = BTreeMap<String, String>;

/// One page of a list endpoint.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub result: Vec<T>,
    pub total_pages: Option<u32>,
}

/// A domain managed by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<ZonePlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<ZoneAccount>,
    /// Passthrough fields kept for JSON output
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZonePlan {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneAccount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// DNS record as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "auto_ttl")]
    pub ttl: u32,
    #[serde(default)]
    pub proxied: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn auto_ttl() -> u32 {
    AUTO_TTL
}

/// Structured SRV fields the API wants instead of a flat content string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrvData {
    pub service: String,
    pub proto: String,
    pub name: String,
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

impl SrvData {
    /// Decompose `_service._proto.name` and `priority weight port target`.
    ///
    /// When the name carries nothing after the protocol label, `fallback_name`
    /// (the zone) is used as the SRV owner name.
    pub fn parse(name: &str, content: &str, fallback_name: &str) -> Result<Self, String> {
        let labels: Vec<&str> = name.split('.').collect();
        if labels.len() < 2 {
            return Err(format!(
                "SRV record name must look like _service._proto[.name], got '{}'",
                name
            ));
        }
        let owner = labels[2..].join(".");

        let parts: Vec<&str> = content.split_whitespace().collect();
        let [priority, weight, port, target] = parts.as_slice() else {
            return Err(format!(
                "SRV content must be 'priority weight port target', got '{}'",
                content
            ));
        };

        Ok(Self {
            service: labels[0].to_string(),
            proto: labels[1].to_string(),
            name: if owner.is_empty() {
                fallback_name.to_string()
            } else {
                owner
            },
            priority: parse_number("priority", priority)?,
            weight: parse_number("weight", weight)?,
            port: parse_number("port", port)?,
            target: target.to_string(),
        })
    }
}

fn parse_number(field: &str, value: &str) -> Result<u16, String> {
    value
        .parse()
        .map_err(|_| format!("SRV {} must be a number between 0 and 65535, got '{}'", field, value))
}

/// Body for record create and update calls.
///
/// Only declared fields reach the wire; CLI plumbing never leaks into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordPayload {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<SrvData>,
}

/// Body for the purge_cache endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PurgeRequest {
    Files { files: Vec<String> },
    Everything { purge_everything: bool },
}

/// Result of a delete call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deleted {
    pub id: String,
}
