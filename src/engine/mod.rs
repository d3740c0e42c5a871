//! Telemetry normalization and status aggregation.
//!
//! Turns raw per-device records into normalized devices and a fleet summary:
//! partner classification, latest-observation selection, severity mapping and
//! message composition.

mod latest;
mod models;
mod partner;
mod severity;

pub use latest::*;
pub use models::*;
pub use partner::*;
pub use severity::*;

use crate::source::RecordError;

use serde::Serialize;
use std::time::Instant;

/// Name markers that end the display name of a device.
const NAME_MARKERS: &[&str] = &["_anomaly", "-anomaly"];

/// Result of one aggregation pass.
#[derive(Debug, Default, Serialize)]
pub struct FleetReport {
    pub devices: Vec<NormalizedDevice>,
    pub summary: FleetSummary,
    /// Set when a deadline cut the pass short.
    #[serde(skip_serializing_if = "is_false")]
    pub partial: bool,
    /// Records that failed to load. Not part of the response body.
    #[serde(skip)]
    pub dropped: Vec<RecordError>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl FleetReport {
    fn push(&mut self, device: NormalizedDevice) {
        self.summary.record(device.status);
        self.devices.push(device);
    }
}

/// Derive the display name: the identifier up to the first anomaly marker.
pub fn device_name(identifier: &str) -> String {
    let mut name = identifier;
    for marker in NAME_MARKERS {
        if let Some((head, _)) = name.split_once(marker) {
            name = head;
        }
    }
    name.to_string()
}

/// Normalize a single device record.
pub fn normalize(record: &RawDeviceRecord) -> NormalizedDevice {
    if has_mixed_timestamps(&record.observations) {
        tracing::warn!(
            "Device {} mixes epoch and text timestamps; latest selection may be wrong",
            record.identifier
        );
    }

    let latest = select_latest(&record.observations);
    let severity = latest.and_then(|o| o.severity.as_deref());
    let status = map_status(severity);
    let message = compose_message(status, latest);

    // Source-supplied names carry the vendor keywords; otherwise the identifier does.
    let partner = classify(record.name.as_deref().unwrap_or(&record.identifier));
    tracing::debug!("Device {} is {} ({})", record.identifier, status, partner);

    NormalizedDevice {
        id: record.identifier.clone(),
        name: record
            .name
            .clone()
            .unwrap_or_else(|| device_name(&record.identifier)),
        partner,
        status,
        severity: severity.unwrap_or_default().to_string(),
        system_state: latest
            .and_then(|o| o.system_state.clone())
            .unwrap_or_default(),
        timestamp: latest
            .map(|o| o.display_timestamp.clone())
            .unwrap_or_default(),
        message,
        metrics: latest.and_then(|o| o.metrics.clone()),
    }
}

/// Aggregate records into devices and a summary, preserving input order.
pub fn aggregate(records: &[RawDeviceRecord]) -> FleetReport {
    let mut report = FleetReport::default();
    for record in records {
        report.push(normalize(record));
    }
    report
}

/// Aggregate the output of a source read.
///
/// Records that failed to load are logged and left out of the devices and
/// summary. When `deadline` passes, the remaining records are skipped and the
/// report is marked partial.
pub fn aggregate_loaded(
    loaded: Vec<Result<RawDeviceRecord, RecordError>>,
    deadline: Option<Instant>,
) -> FleetReport {
    let mut report = FleetReport::default();
    let total = loaded.len();

    for (i, item) in loaded.into_iter().enumerate() {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            tracing::warn!(
                "Aggregation deadline exceeded after {} of {} records",
                i,
                total
            );
            report.partial = true;
            break;
        }

        match item {
            Ok(record) => report.push(normalize(&record)),
            Err(e) => {
                tracing::warn!("Dropping device record: {}", e);
                report.dropped.push(e);
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obs(ts: &str, severity: &str, state: &str) -> Observation {
        Observation {
            timestamp: Some(Timestamp::Text(ts.to_string())),
            display_timestamp: ts.to_string(),
            severity: Some(severity.to_string()),
            system_state: Some(state.to_string()),
            metrics: None,
        }
    }

    #[test]
    fn test_device_name() {
        assert_eq!(device_name("lnl_board1_anomaly.json"), "lnl_board1");
        assert_eq!(device_name("strx-7-anomaly.json"), "strx-7");
        assert_eq!(device_name("a_anomaly_b-anomaly.json"), "a");
        assert_eq!(device_name("plain.json"), "plain.json");
    }

    #[test]
    fn test_end_to_end_critical() {
        let records = vec![RawDeviceRecord::new(
            "lnl_board1_anomaly.json",
            vec![obs("2024-01-01T00:00:00", "High", "overheat")],
        )];
        let report = aggregate(&records);

        let device = &report.devices[0];
        assert_eq!(device.id, "lnl_board1_anomaly.json");
        assert_eq!(device.name, "lnl_board1");
        assert_eq!(device.partner, Partner::Intel);
        assert_eq!(device.status, Status::Critical);
        assert_eq!(device.message, "overheat");
        assert_eq!(device.timestamp, "2024-01-01T00:00:00");
        assert_eq!(
            report.summary,
            FleetSummary {
                total: 1,
                online: 0,
                warning: 0,
                critical: 1,
                unknown: 0,
            }
        );
    }

    #[test]
    fn test_end_to_end_no_observations() {
        let report = aggregate(&[RawDeviceRecord::new("qc_dev.json", vec![])]);

        let device = &report.devices[0];
        assert_eq!(device.status, Status::Unknown);
        assert_eq!(device.message, "");
        assert_eq!(device.severity, "");
        assert_eq!(report.summary.total, 1);
        assert_eq!(report.summary.online + report.summary.warning + report.summary.critical, 0);
        assert_eq!(report.summary.unknown, 1);
    }

    #[test]
    fn test_end_to_end_low_keeps_raw_severity() {
        let report = aggregate(&[RawDeviceRecord::new(
            "strx_1.json",
            vec![obs("2024-01-01T00:00:00", "low", "fine")],
        )]);
        assert_eq!(report.devices[0].status, Status::Online);
        assert_eq!(report.devices[0].message, "low");
    }

    #[test]
    fn test_uses_latest_observation() {
        let mut old = obs("2024-01-01T00:00:00", "high", "was hot");
        old.metrics = json!({"cpu": 99}).as_object().cloned();
        let mut new = obs("2024-01-02T00:00:00", "moderate", "cooling down");
        new.metrics = json!({"cpu": 60}).as_object().cloned();

        let report = aggregate(&[RawDeviceRecord::new("cadmus_x.json", vec![new, old])]);
        let device = &report.devices[0];
        assert_eq!(device.status, Status::Warning);
        assert_eq!(device.message, "cooling down");
        assert_eq!(device.metrics.as_ref().unwrap()["cpu"], 60);
    }

    #[test]
    fn test_source_name_drives_display_and_partner() {
        let observations = vec![obs("1", "warning", "unstable")];
        let record = RawDeviceRecord::new("7", observations).with_name("QC-2");
        let device = normalize(&record);

        assert_eq!(device.id, "7");
        assert_eq!(device.name, "QC-2");
        assert_eq!(device.partner, Partner::Qualcomm);
        assert_eq!(device.partner.to_string(), "qualcomm");
    }

    #[test]
    fn test_order_and_idempotence() {
        let records = vec![
            RawDeviceRecord::new("b.json", vec![obs("1", "low", "")]),
            RawDeviceRecord::new("a.json", vec![obs("1", "medium", "slow")]),
            RawDeviceRecord::new("c.json", vec![obs("1", "bogus", "")]),
        ];
        let first = aggregate(&records);
        let second = aggregate(&records);

        let ids: Vec<_> = first.devices.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["b.json", "a.json", "c.json"]);
        assert_eq!(first.devices, second.devices);
        assert_eq!(first.summary, second.summary);

        let s = first.summary;
        assert!(s.online + s.warning + s.critical <= s.total);
        assert_eq!(s.online + s.warning + s.critical + s.unknown, s.total);
    }

    #[test]
    fn test_loaded_drops_failed_records() {
        let loaded = vec![
            Ok(RawDeviceRecord::new("ok.json", vec![obs("1", "low", "")])),
            Err(RecordError::Malformed {
                identifier: "bad.json".to_string(),
                reason: "expected an array".to_string(),
            }),
        ];
        let report = aggregate_loaded(loaded, None);
        assert_eq!(report.devices.len(), 1);
        assert_eq!(report.summary.total, 1);
        assert_eq!(report.dropped.len(), 1);
        assert!(!report.partial);
    }

    #[test]
    fn test_all_failed_differs_from_empty() {
        let failed = aggregate_loaded(
            vec![Err(RecordError::Malformed {
                identifier: "x.json".to_string(),
                reason: "not json".to_string(),
            })],
            None,
        );
        let empty = aggregate_loaded(vec![], None);

        assert_eq!(failed.summary, empty.summary);
        assert_eq!(failed.dropped.len(), 1);
        assert!(empty.dropped.is_empty());
    }

    #[test]
    fn test_expired_deadline_gives_partial_report() {
        let loaded = vec![Ok(RawDeviceRecord::new("a.json", vec![]))];
        let report = aggregate_loaded(loaded, Some(Instant::now()));

        assert!(report.partial);
        assert!(report.devices.is_empty());
        assert_eq!(report.summary.total, 0);
    }

    #[test]
    fn test_report_serialization_shape() {
        let report = aggregate(&[RawDeviceRecord::new("lnl.json", vec![])]);
        let value = serde_json::to_value(&report).unwrap();

        assert!(value.get("partial").is_none());
        assert!(value.get("dropped").is_none());
        assert!(value["devices"][0].get("metrics").is_none());
        assert_eq!(value["devices"][0]["partner"], "intel");
        assert_eq!(value["summary"]["total"], 1);
    }
}
