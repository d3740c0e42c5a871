//! Engine data model types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;

/// Hardware vendor a device is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partner {
    Qualcomm,
    Amd,
    Intel,
    Unknown,
}

impl Partner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Partner::Qualcomm => "qualcomm",
            Partner::Amd => "amd",
            Partner::Intel => "intel",
            Partner::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Partner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical device health. Every summary count and UI color is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Online,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Online => "online",
            Status::Warning => "warning",
            Status::Critical => "critical",
            Status::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering key of an observation.
///
/// Epoch values compare numerically and text values lexicographically. When
/// both kinds show up in one record, every epoch orders below every text value;
/// such records are reported by the aggregator.
#[derive(Debug, Clone, PartialEq)]
pub enum Timestamp {
    Epoch(f64),
    Text(String),
}

impl Timestamp {
    pub fn is_epoch(&self) -> bool {
        matches!(self, Timestamp::Epoch(_))
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Timestamp::Epoch(a), Timestamp::Epoch(b)) => a.total_cmp(b),
            (Timestamp::Text(a), Timestamp::Text(b)) => a.cmp(b),
            (Timestamp::Epoch(_), Timestamp::Text(_)) => Ordering::Less,
            (Timestamp::Text(_), Timestamp::Epoch(_)) => Ordering::Greater,
        }
    }
}

/// One timestamped telemetry sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observation {
    /// Ordering key; `None` orders below any present key.
    pub timestamp: Option<Timestamp>,
    /// Timestamp as shown to users.
    pub display_timestamp: String,
    pub severity: Option<String>,
    pub system_state: Option<String>,
    pub metrics: Option<Map<String, Value>>,
}

/// All observations known for one device.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDeviceRecord {
    /// Unique within one source read.
    pub identifier: String,
    /// Display name supplied by the source. When absent the name is derived
    /// from the identifier.
    pub name: Option<String>,
    pub observations: Vec<Observation>,
}

impl RawDeviceRecord {
    pub fn new(identifier: impl Into<String>, observations: Vec<Observation>) -> Self {
        Self {
            identifier: identifier.into(),
            name: None,
            observations,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A device as exposed by `/api/devices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedDevice {
    pub id: String,
    pub name: String,
    pub partner: Partner,
    pub status: Status,
    pub severity: String,
    pub system_state: String,
    pub timestamp: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Map<String, Value>>,
}

/// Fleet-wide counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetSummary {
    pub total: u64,
    pub online: u64,
    pub warning: u64,
    pub critical: u64,
    pub unknown: u64,
}

impl FleetSummary {
    /// Count one device under `total` and exactly one status bucket.
    pub fn record(&mut self, status: Status) {
        self.total += 1;
        match status {
            Status::Online => self.online += 1,
            Status::Warning => self.warning += 1,
            Status::Critical => self.critical += 1,
            Status::Unknown => self.unknown += 1,
        }
    }
}
