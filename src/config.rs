//! Configuration module for devicewatch.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Which telemetry source backs `/api/devices`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Directory of per-device anomaly files.
    Json,
    /// Directory of per-device trend files made of batches.
    Batches,
    /// SQLite `devices` table.
    Sqlite,
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(SourceKind::Json),
            "batches" => Ok(SourceKind::Batches),
            "sqlite" => Ok(SourceKind::Sqlite),
            other => Err(format!("unknown source kind: {}", other)),
        }
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port for the web server (default: 5000)
    pub http_port: u16,
    /// Telemetry source (default: json)
    pub source: SourceKind,
    /// Directory scanned by the file-based sources (default: "jsondata")
    pub data_dir: PathBuf,
    /// Path to the SQLite database file (default: "devices.db")
    pub db_path: PathBuf,
    /// Upper bound on one aggregation pass (default: none)
    pub deadline: Option<Duration>,
    /// Directory of dashboard assets served at `/` (default: none)
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 5000,
            source: SourceKind::Json,
            data_dir: PathBuf::from("jsondata"),
            db_path: PathBuf::from("devices.db"),
            deadline: None,
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DEVICEWATCH_HTTP_PORT`: HTTP port (default: 5000)
    /// - `DEVICEWATCH_SOURCE`: `json`, `batches` or `sqlite` (default: json)
    /// - `DEVICEWATCH_DATA_DIR`: telemetry directory (default: "jsondata")
    /// - `DEVICEWATCH_DB_PATH`: database file path (default: "devices.db")
    /// - `DEVICEWATCH_DEADLINE_MS`: aggregation deadline in milliseconds
    /// - `DEVICEWATCH_STATIC_DIR`: dashboard asset directory
    pub fn load() -> Self {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn load_from<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(port_str) = lookup("DEVICEWATCH_HTTP_PORT") {
            match port_str.parse() {
                Ok(port) => cfg.http_port = port,
                Err(_) => tracing::warn!("Ignoring invalid DEVICEWATCH_HTTP_PORT: {}", port_str),
            }
        }

        if let Some(kind) = lookup("DEVICEWATCH_SOURCE") {
            match kind.parse() {
                Ok(kind) => cfg.source = kind,
                Err(e) => tracing::warn!("Ignoring DEVICEWATCH_SOURCE: {}", e),
            }
        }

        if let Some(dir) = lookup("DEVICEWATCH_DATA_DIR") {
            cfg.data_dir = PathBuf::from(dir);
        }

        if let Some(db_path) = lookup("DEVICEWATCH_DB_PATH") {
            cfg.db_path = PathBuf::from(db_path);
        }

        if let Some(ms) = lookup("DEVICEWATCH_DEADLINE_MS") {
            match ms.parse::<u64>() {
                Ok(0) => cfg.deadline = None,
                Ok(ms) => cfg.deadline = Some(Duration::from_millis(ms)),
                Err(_) => tracing::warn!("Ignoring invalid DEVICEWATCH_DEADLINE_MS: {}", ms),
            }
        }

        if let Some(dir) = lookup("DEVICEWATCH_STATIC_DIR") {
            cfg.static_dir = Some(PathBuf::from(dir));
        }

        cfg
    }
}
