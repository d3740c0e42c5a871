//! SQLite `devices` table source.

use crate::engine::{Observation, RawDeviceRecord};

use rusqlite::{Connection, OpenFlags, Row};
use std::path::{Path, PathBuf};

use super::{LoadedRecords, RecordError, SourceError, SourceReader};

/// Reads device rows from an existing SQLite database.
///
/// A fresh read-only connection is opened for every read; the database is
/// never written.
#[derive(Debug, Clone)]
pub struct SqliteSource {
    path: PathBuf,
}

impl SqliteSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn open(&self) -> Result<Connection, SourceError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        Ok(Connection::open_with_flags(&self.path, flags)?)
    }
}

impl SourceReader for SqliteSource {
    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }

    fn read_records(&self) -> Result<LoadedRecords, SourceError> {
        let conn = self.open()?;
        let mut stmt = conn.prepare("SELECT id, name, status, message FROM devices ORDER BY id")?;
        let mut rows = stmt.query([])?;

        let mut loaded = Vec::new();
        while let Some(row) = rows.next()? {
            loaded.push(decode_row(row));
        }
        Ok(loaded)
    }
}

/// A row carries its current status only: one observation, no timestamp.
///
/// The row id is the identifier since `name` is not unique; `name` is kept
/// for display and partner inference.
fn decode_row(row: &Row<'_>) -> Result<RawDeviceRecord, RecordError> {
    let identifier = match row.get::<_, i64>(0) {
        Ok(id) => id.to_string(),
        Err(source) => {
            return Err(RecordError::Row {
                identifier: "?".to_string(),
                source,
            })
        }
    };
    let row_error = |source| RecordError::Row {
        identifier: identifier.clone(),
        source,
    };

    let name: String = row.get(1).map_err(row_error)?;
    let status: Option<String> = row.get(2).map_err(row_error)?;
    let message: Option<String> = row.get(3).map_err(row_error)?;

    let observation = Observation {
        severity: status,
        system_state: message,
        ..Default::default()
    };
    Ok(RawDeviceRecord::new(identifier, vec![observation]).with_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{aggregate_loaded, Partner, Status};
    use rusqlite::params;
    use tempfile::NamedTempFile;

    fn seed(path: &Path, rows: &[(Option<&str>, &str, Option<&str>)]) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE devices (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT,
                status TEXT NOT NULL,
                message TEXT
            )",
        )
        .unwrap();
        for (name, status, message) in rows {
            conn.execute(
                "INSERT INTO devices (name, status, message) VALUES (?1, ?2, ?3)",
                params![name, status, message],
            )
            .unwrap();
        }
    }

    #[test]
    fn test_reads_rows_in_id_order() {
        let tmp = NamedTempFile::new().unwrap();
        seed(
            tmp.path(),
            &[
                (Some("AMD-1"), "online", None),
                (
                    Some("QC-1"),
                    "warning",
                    Some("device is not stable as cpu utilization is very high"),
                ),
                (Some("NVIDIA-1"), "critical", Some("device is not reachable")),
            ],
        );

        let source = SqliteSource::new(tmp.path());
        let report = aggregate_loaded(source.read_records().unwrap(), None);

        let names: Vec<_> = report.devices.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["AMD-1", "QC-1", "NVIDIA-1"]);
        let ids: Vec<_> = report.devices.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);

        let qc = &report.devices[1];
        assert_eq!(qc.partner, Partner::Qualcomm);
        assert_eq!(qc.status, Status::Warning);
        assert_eq!(qc.message, "device is not stable as cpu utilization is very high");

        assert_eq!(report.devices[0].message, "online");
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.critical, 1);
    }

    #[test]
    fn test_undecodable_row_is_dropped() {
        let tmp = NamedTempFile::new().unwrap();
        seed(tmp.path(), &[(None, "online", None), (Some("Intel-1"), "online", None)]);

        let loaded = SqliteSource::new(tmp.path()).read_records().unwrap();
        assert_eq!(loaded.len(), 2);
        let err = loaded[0].as_ref().unwrap_err();
        assert_eq!(err.identifier(), "1");

        let report = aggregate_loaded(loaded, None);
        assert_eq!(report.summary.total, 1);
        assert_eq!(report.dropped.len(), 1);
    }

    #[test]
    fn test_duplicate_names_keep_distinct_ids() {
        let tmp = NamedTempFile::new().unwrap();
        seed(
            tmp.path(),
            &[(Some("QC-1"), "online", None), (Some("QC-1"), "critical", Some("down"))],
        );

        let loaded = SqliteSource::new(tmp.path()).read_records().unwrap();
        let report = aggregate_loaded(loaded, None);

        let ids: Vec<_> = report.devices.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
        for device in &report.devices {
            assert_eq!(device.name, "QC-1");
            assert_eq!(device.partner, Partner::Qualcomm);
        }
        assert_eq!(report.devices[1].message, "down");
        assert_eq!(report.summary.online, 1);
        assert_eq!(report.summary.critical, 1);
    }

    #[test]
    fn test_missing_database_is_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = SqliteSource::new(dir.path().join("absent.db"));
        assert!(matches!(source.read_records(), Err(SourceError::Sqlite(_))));
    }

    #[test]
    fn test_missing_table_is_source_error() {
        let tmp = NamedTempFile::new().unwrap();
        Connection::open(tmp.path()).unwrap();
        assert!(SqliteSource::new(tmp.path()).read_records().is_err());
    }
}
