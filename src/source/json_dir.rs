//! Directory of per-device anomaly files.

use crate::engine::RawDeviceRecord;

use std::path::{Path, PathBuf};

use super::entry::{file_identifier, list_json_files, observations, read_json, RawEntry};
use super::{LoadedRecords, RecordError, SourceError, SourceReader};

/// Reads `<dir>/*.json`, one device per file, each file a JSON array of
/// entries.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn load(path: &Path) -> Result<RawDeviceRecord, RecordError> {
        let identifier = file_identifier(path);
        let entries: Vec<RawEntry> = read_json(path, &identifier)?;
        Ok(RawDeviceRecord::new(identifier, observations(entries)))
    }
}

impl SourceReader for JsonDirSource {
    fn describe(&self) -> String {
        format!("json:{}", self.dir.display())
    }

    fn read_records(&self) -> Result<LoadedRecords, SourceError> {
        let files = list_json_files(&self.dir)?;
        tracing::debug!("Found {} device files in {}", files.len(), self.dir.display());
        Ok(files.iter().map(|path| Self::load(path)).collect())
    }
}
