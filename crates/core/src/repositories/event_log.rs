//! Persistent application event log (`logs` table).

use super::store::{format_timestamp, parse_timestamp};
use crate::{PatientError, PatientResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventLevel {
    Info,
    Warn,
    Error,
}

impl EventLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for EventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventLevel {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INFO" => Ok(Self::Info),
            "WARN" | "WARNING" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            other => Err(PatientError::CorruptRow(format!("unknown log level '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub level: EventLevel,
    pub message: String,
}

pub fn record_event(conn: &Connection, level: EventLevel, message: &str) -> PatientResult<()> {
    conn.execute(
        "INSERT INTO logs (timestamp, level, message) VALUES (?1, ?2, ?3)",
        params![format_timestamp(&Utc::now()), level.as_str(), message],
    )?;
    Ok(())
}

pub fn list_events(conn: &Connection) -> PatientResult<Vec<LogEntry>> {
    let mut stmt = conn.prepare("SELECT id, timestamp, level, message FROM logs ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut entries = Vec::new();
    for row in rows {
        let (id, timestamp, level, message) = row?;
        entries.push(LogEntry {
            id,
            timestamp: parse_timestamp(&timestamp)?,
            level: level.parse()?,
            message,
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::store::tests::temp_store;

    #[test]
    fn test_record_and_list_events() {
        let (_temp_dir, store) = temp_store();
        let conn = store.connect().unwrap();

        record_event(&conn, EventLevel::Info, "patient registered").unwrap();
        record_event(&conn, EventLevel::Warn, "mirror unavailable").unwrap();

        let events = list_events(&conn).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].level, EventLevel::Info);
        assert_eq!(events[0].message, "patient registered");
        assert_eq!(events[1].level, EventLevel::Warn);
        assert!(events[0].timestamp <= events[1].timestamp);
    }

    #[test]
    fn test_rows_written_by_default_timestamp_are_readable() {
        let (_temp_dir, store) = temp_store();
        let conn = store.connect().unwrap();
        conn.execute(
            "INSERT INTO logs (level, message) VALUES ('ERROR', 'from sqlite default')",
            [],
        )
        .unwrap();

        let events = list_events(&conn).unwrap();
        assert_eq!(events[0].level, EventLevel::Error);
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("WARNING".parse::<EventLevel>().unwrap(), EventLevel::Warn);
        assert!("debug".parse::<EventLevel>().is_err());
        assert_eq!(EventLevel::Error.to_string(), "ERROR");
    }
}
