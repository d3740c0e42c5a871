//! Severity vocabulary mapping and display message composition.

use super::models::{Observation, Status};

/// Map a free-text severity onto the canonical status.
///
/// Matching ignores case and surrounding whitespace. The synonym sets cover
/// every vocabulary the upstream producers emit.
pub fn map_status(severity: Option<&str>) -> Status {
    let Some(severity) = severity else {
        return Status::Unknown;
    };

    match severity.trim().to_lowercase().as_str() {
        "low" | "online" => Status::Online,
        "medium" | "moderate" | "warning" => Status::Warning,
        "high" | "critical" => Status::Critical,
        _ => Status::Unknown,
    }
}

/// Build the message shown next to a device.
///
/// Healthy devices show their raw severity word; unhealthy ones show the
/// state description.
pub fn compose_message(status: Status, observation: Option<&Observation>) -> String {
    let Some(obs) = observation else {
        return String::new();
    };

    match status {
        Status::Online => obs.severity.clone().unwrap_or_default(),
        Status::Warning | Status::Critical => obs.system_state.clone().unwrap_or_default(),
        Status::Unknown => String::new(),
    }
}
