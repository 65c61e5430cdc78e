// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumIter, EnumString};

// --- Tipi di Protocollo ---
// Protocol Types

// The protocol a template or target descriptor declares. The caller has
// already determined this value; the transform engine never infers it
// from the raw input itself.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolType {
    Dns,
    Whois,
    File,
    OfflineHttp,
    Http,
    Headless,
    Network,
    Ssl,
    Websocket,
    // These two carry their own execution context and take targets verbatim;
    // no transformation rule exists for them.
    Workflow,
    Code,
}

// The rewrite algorithm selected for a protocol type. Each variant governs
// one branch of the transform engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformationKind {
    HostOnly,
    HostWithPort,
    HostWithOptionalPort,
    Url,
    Filepath,
    Websocket,
}

// --- Record API di Scansione ---
// Scan API Records
// Pure serialization shapes exchanged with the remote scanning service over
// its JSON boundary. No behavior beyond marshal/unmarshal lives here.

// A single raw target as submitted to the scanning service, optionally
// pinned to a specific IP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDescriptor {
    pub input: String,
    #[serde(rename = "customIP", skip_serializing_if = "Option::is_none", default)]
    pub custom_ip: Option<String>,
}

impl TargetDescriptor {
    // A constructor for the common case of a plain target with no pinned IP.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
            custom_ip: None,
        }
    }
}

// The request record submitting a new scan: raw targets, named public
// template identifiers, and optionally the bodies of templates private to
// the requesting user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddScanRequest {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub raw_targets: Vec<TargetDescriptor>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub public_templates: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub private_templates: Option<HashMap<String, String>>,
    pub is_temporary: bool,
}

// Progress record polled while a scan runs: counters, completion flag and
// the timestamps bracketing the scan's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetScanProgress {
    pub id: String,
    pub total: i32,
    pub current: i32,
    pub finished: bool,
    pub created_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub targets: i32,
    pub templates: i32,
    pub matches: i64,
}

// A page of raw scan results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResultsResponse {
    pub finished: bool,
    pub items: Vec<GetResultsResponseItem>,
}

// One raw result payload with its numeric identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResultsResponseItem {
    pub id: i64,
    pub raw: String,
}

// Acknowledgement returned when stored scan results are deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteScanResults {
    pub ok: bool,
}
