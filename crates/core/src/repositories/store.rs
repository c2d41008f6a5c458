//! SQLite record store.
//!
//! The store owns the `patients`, `scan_activities` and `logs` tables. It keeps no open
//! connection: every logical operation opens one, runs inside a transaction and commits only on
//! success. Dropping an uncommitted transaction rolls it back.

use crate::constants::{LOGS_TABLE, PATIENTS_TABLE, SCAN_ACTIVITIES_TABLE, TIMESTAMP_FORMAT};
use crate::{PatientError, PatientResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Transaction};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS patients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        uuid TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        age INTEGER NOT NULL,
        nin TEXT NOT NULL UNIQUE,
        phone TEXT NOT NULL UNIQUE,
        emergency_contact TEXT NOT NULL,
        genotype TEXT NOT NULL,
        blood_type TEXT NOT NULL,
        allergies TEXT NOT NULL DEFAULT '',
        medical_history TEXT NOT NULL DEFAULT '',
        patient_id TEXT NOT NULL UNIQUE,
        qr_link TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS scan_activities (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        patient_uuid TEXT NOT NULL,
        timestamp DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (patient_uuid) REFERENCES patients(uuid)
    );

    CREATE TABLE IF NOT EXISTS logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        level TEXT NOT NULL,
        message TEXT NOT NULL
    );
";

/// A local table that can be mirrored to a spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MirroredTable {
    Patients,
    ScanActivities,
    Logs,
}

impl MirroredTable {
    pub const ALL: [MirroredTable; 3] = [Self::Patients, Self::ScanActivities, Self::Logs];

    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Patients => PATIENTS_TABLE,
            Self::ScanActivities => SCAN_ACTIVITIES_TABLE,
            Self::Logs => LOGS_TABLE,
        }
    }
}

impl fmt::Display for MirroredTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for MirroredTable {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let wanted = match wanted.as_str() {
            "scans" => SCAN_ACTIVITIES_TABLE,
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|t| t.table_name() == wanted)
            .ok_or_else(|| PatientError::InvalidInput(format!("unknown table '{}'", s.trim())))
    }
}

/// Handle to the SQLite file. Cheap to clone; holds only the path.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a fresh connection with foreign keys enforced.
    ///
    /// The parent directory is created if it does not exist.
    pub fn connect(&self) -> PatientResult<Connection> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(PatientError::StorageDirCreation)?;
        }
        let conn = Connection::open(&self.path).map_err(|source| PatientError::StoreOpen {
            path: self.path.clone(),
            source,
        })?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Creates all tables if they are missing. Safe to call on every startup.
    pub fn init_schema(&self) -> PatientResult<()> {
        let conn = self.connect()?;
        conn.execute_batch(SCHEMA)?;
        tracing::info!("record store ready at {}", self.path.display());
        Ok(())
    }

    /// Runs `f` inside a single transaction, committing only if it returns `Ok`.
    pub fn with_transaction<T, F>(&self, f: F) -> PatientResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> PatientResult<T>,
    {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Runs a read-only closure against a fresh connection.
    pub fn read<T, F>(&self, f: F) -> PatientResult<T>
    where
        F: FnOnce(&Connection) -> PatientResult<T>,
    {
        let conn = self.connect()?;
        f(&conn)
    }

    /// Reads a whole table as text: the column names, then every row in insertion order.
    ///
    /// NULL becomes an empty string.
    pub fn read_table(&self, table: MirroredTable) -> PatientResult<Vec<Vec<String>>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!("SELECT * FROM {} ORDER BY id", table.table_name()))?;

        let header: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = header.len();

        let mut table_rows = vec![header];
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(width);
            for idx in 0..width {
                cells.push(cell_text(row.get_ref(idx)?));
            }
            table_rows.push(cells);
        }
        Ok(table_rows)
    }
}

fn cell_text(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    }
}

pub(crate) fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn parse_timestamp(raw: &str) -> PatientResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| PatientError::CorruptRow(format!("bad timestamp '{}': {}", raw, e)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    pub(crate) fn temp_store() -> (TempDir, RecordStore) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = RecordStore::new(temp_dir.path().join("patients.db"));
        store.init_schema().expect("init_schema should succeed");
        (temp_dir, store)
    }

    #[test]
    fn test_init_schema_is_idempotent() {
        let (_temp_dir, store) = temp_store();
        store.init_schema().expect("second init should succeed");
        store.init_schema().expect("third init should succeed");

        for table in MirroredTable::ALL {
            let rows = store.read_table(table).unwrap();
            assert_eq!(rows.len(), 1, "{} should only have a header", table);
        }
    }

    #[test]
    fn test_connect_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("nested/deeper/patients.db"));
        store.init_schema().expect("init should create parents");
        assert!(store.path().exists());
    }

    #[test]
    fn test_read_table_header_and_rows() {
        let (_temp_dir, store) = temp_store();
        store
            .with_transaction(|tx| {
                tx.execute(
                    "INSERT INTO logs (timestamp, level, message) VALUES ('2026-01-02 03:04:05', 'INFO', 'one')",
                    [],
                )?;
                Ok(())
            })
            .unwrap();

        let rows = store.read_table(MirroredTable::Logs).unwrap();
        assert_eq!(rows[0], vec!["id", "timestamp", "level", "message"]);
        assert_eq!(rows[1], vec!["1", "2026-01-02 03:04:05", "INFO", "one"]);
    }

    #[test]
    fn test_failed_transaction_rolls_back() {
        let (_temp_dir, store) = temp_store();
        let result: PatientResult<()> = store.with_transaction(|tx| {
            tx.execute("INSERT INTO logs (level, message) VALUES ('INFO', 'kept?')", [])?;
            Err(PatientError::InvalidInput("abort".into()))
        });
        assert!(result.is_err());
        assert_eq!(store.read_table(MirroredTable::Logs).unwrap().len(), 1);
    }

    #[test]
    fn test_scan_activity_requires_existing_patient() {
        let (_temp_dir, store) = temp_store();
        let err = store
            .with_transaction(|tx| {
                tx.execute(
                    "INSERT INTO scan_activities (patient_uuid) VALUES ('missing')",
                    [],
                )?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, PatientError::Database(_)));
    }

    #[test]
    fn test_mirrored_table_from_str() {
        assert_eq!("patients".parse::<MirroredTable>().unwrap(), MirroredTable::Patients);
        assert_eq!("Logs".parse::<MirroredTable>().unwrap(), MirroredTable::Logs);
        assert_eq!("scans".parse::<MirroredTable>().unwrap(), MirroredTable::ScanActivities);
        assert_eq!(
            "scan_activities".parse::<MirroredTable>().unwrap(),
            MirroredTable::ScanActivities
        );
        assert!("visits".parse::<MirroredTable>().is_err());
    }

    #[test]
    fn test_timestamp_round_trip() {
        let parsed = parse_timestamp("2026-10-18 09:30:00").unwrap();
        assert_eq!(format_timestamp(&parsed), "2026-10-18 09:30:00");
        assert!(parse_timestamp("yesterday").is_err());
    }
}
