//! Directory of per-device trend files made of anomaly batches.

use crate::engine::RawDeviceRecord;

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::entry::{file_identifier, list_json_files, observations, read_json, RawEntry};
use super::{LoadedRecords, RecordError, SourceError, SourceReader};

/// One upload from a device: the anomalies detected in a collection window.
#[derive(Debug, Deserialize)]
struct Batch {
    #[serde(default)]
    anomalies: Option<Vec<RawEntry>>,
}

/// Reads `<dir>/*.json`, one device per file, each file a JSON array of
/// batches whose `anomalies` are flattened into the device history.
#[derive(Debug, Clone)]
pub struct BatchDirSource {
    dir: PathBuf,
}

impl BatchDirSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn load(path: &Path) -> Result<RawDeviceRecord, RecordError> {
        let identifier = file_identifier(path);
        let batches: Vec<Batch> = read_json(path, &identifier)?;
        let entries = batches
            .into_iter()
            .filter_map(|b| b.anomalies)
            .flatten()
            .collect();
        Ok(RawDeviceRecord::new(identifier, observations(entries)))
    }
}

impl SourceReader for BatchDirSource {
    fn describe(&self) -> String {
        format!("batches:{}", self.dir.display())
    }

    fn read_records(&self) -> Result<LoadedRecords, SourceError> {
        let files = list_json_files(&self.dir)?;
        tracing::debug!("Found {} trend files in {}", files.len(), self.dir.display());
        Ok(files.iter().map(|path| Self::load(path)).collect())
    }
}
