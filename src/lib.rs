//! devicewatch - device telemetry status service.
//!
//! Reads per-device anomaly telemetry from JSON files, trend batches or a
//! SQLite table and serves one normalized status per device plus a fleet
//! summary.

pub mod config;
pub mod engine;
pub mod source;
pub mod web;

use config::{ServerConfig, SourceKind};
use source::{BatchDirSource, JsonDirSource, SourceReader, SqliteSource};

use std::sync::Arc;

/// Build the telemetry source selected by the configuration.
pub fn build_source(cfg: &ServerConfig) -> Arc<dyn SourceReader> {
    match cfg.source {
        SourceKind::Json => Arc::new(JsonDirSource::new(&cfg.data_dir)),
        SourceKind::Batches => Arc::new(BatchDirSource::new(&cfg.data_dir)),
        SourceKind::Sqlite => Arc::new(SqliteSource::new(&cfg.db_path)),
    }
}
