//! Telemetry sources.
//!
//! Each source produces one `RawDeviceRecord` per device, or a `RecordError`
//! for a device whose data could not be loaded. Failing to reach the source at
//! all is a `SourceError`.

mod batch_dir;
mod entry;
mod json_dir;
mod sqlite;

pub use batch_dir::*;
pub use json_dir::*;
pub use sqlite::*;

use crate::engine::RawDeviceRecord;

use std::path::PathBuf;
use thiserror::Error;

/// The whole source is unreachable.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("cannot read telemetry directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// A single device's data could not be loaded.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("cannot read {identifier}: {source}")]
    Unreadable {
        identifier: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed record {identifier}: {reason}")]
    Malformed { identifier: String, reason: String },
    #[error("cannot decode row {identifier}: {source}")]
    Row {
        identifier: String,
        #[source]
        source: rusqlite::Error,
    },
}

impl RecordError {
    pub fn identifier(&self) -> &str {
        match self {
            RecordError::Unreadable { identifier, .. }
            | RecordError::Malformed { identifier, .. }
            | RecordError::Row { identifier, .. } => identifier,
        }
    }
}

/// Outcome of reading every device from a source.
pub type LoadedRecords = Vec<Result<RawDeviceRecord, RecordError>>;

/// A producer of raw device records, read fresh on every call.
pub trait SourceReader: Send + Sync {
    /// Short human-readable description, e.g. `json:/var/lib/telemetry`.
    fn describe(&self) -> String;

    /// Read every device currently present in the source.
    fn read_records(&self) -> Result<LoadedRecords, SourceError>;
}
