//! On-disk telemetry entry format shared by the file-based sources.

use crate::engine::{Observation, Timestamp};

use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use super::{RecordError, SourceError};

/// One anomaly/trend entry as written by the upstream producers.
#[derive(Debug, Deserialize)]
pub(crate) struct RawEntry {
    #[serde(default)]
    pub epoch_timestamp: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub system_state: Option<String>,
    #[serde(default, alias = "system_metrics")]
    pub metrics: Option<Map<String, Value>>,
}

impl RawEntry {
    /// Convert into an observation ordered by `epoch_timestamp` when
    /// `epoch_keyed`, by `timestamp` otherwise.
    fn into_observation(self, epoch_keyed: bool) -> Observation {
        let display_timestamp = match &self.timestamp {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        let timestamp = if epoch_keyed {
            self.epoch_timestamp.map(Timestamp::Epoch)
        } else {
            match self.timestamp {
                Some(Value::Number(n)) => n.as_f64().map(Timestamp::Epoch),
                Some(Value::String(s)) => Some(Timestamp::Text(s)),
                _ => None,
            }
        };

        Observation {
            timestamp,
            display_timestamp,
            severity: self.severity,
            system_state: self.system_state,
            metrics: self.metrics,
        }
    }
}

/// Convert one device's entries into observations sharing one ordering key.
///
/// If any entry carries `epoch_timestamp`, the whole record is ordered by it
/// and entries without one order below all others. Otherwise the `timestamp`
/// field is the key.
pub(crate) fn observations(entries: Vec<RawEntry>) -> Vec<Observation> {
    let epoch_keyed = entries.iter().any(|e| e.epoch_timestamp.is_some());
    entries
        .into_iter()
        .map(|e| e.into_observation(epoch_keyed))
        .collect()
}

/// List the `*.json` files directly inside `dir`, sorted by file name.
pub(crate) fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let to_source_error = |source| SourceError::Directory {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(to_source_error)? {
        let path = entry.map_err(to_source_error)?.path();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// The identifier of a file-backed device: its file name.
pub(crate) fn file_identifier(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read and parse a JSON file into `T`.
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(
    path: &Path,
    identifier: &str,
) -> Result<T, RecordError> {
    let bytes = fs::read(path).map_err(|source| RecordError::Unreadable {
        identifier: identifier.to_string(),
        source,
    })?;

    serde_json::from_slice(&bytes).map_err(|e| RecordError::Malformed {
        identifier: identifier.to_string(),
        reason: e.to_string(),
    })
}
