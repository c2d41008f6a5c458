//! Append-only record of lookups made through a patient's scannable code.

use super::store::{format_timestamp, parse_timestamp};
use crate::PatientResult;
use chrono::{DateTime, SubsecRound, Utc};
use emis_uuid::PatientUuid;
use rusqlite::{params, Connection};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanActivity {
    pub id: i64,
    pub patient_uuid: PatientUuid,
    pub timestamp: DateTime<Utc>,
}

/// Appends a scan of `patient_uuid` stamped with `at` (truncated to whole seconds).
pub fn record_scan(
    conn: &Connection,
    patient_uuid: &PatientUuid,
    at: DateTime<Utc>,
) -> PatientResult<ScanActivity> {
    let timestamp = at.trunc_subsecs(0);
    conn.execute(
        "INSERT INTO scan_activities (patient_uuid, timestamp) VALUES (?1, ?2)",
        params![patient_uuid.to_string(), format_timestamp(&timestamp)],
    )?;

    Ok(ScanActivity {
        id: conn.last_insert_rowid(),
        patient_uuid: patient_uuid.clone(),
        timestamp,
    })
}

pub fn list_scans(conn: &Connection) -> PatientResult<Vec<ScanActivity>> {
    collect(
        conn,
        "SELECT id, patient_uuid, timestamp FROM scan_activities ORDER BY id",
        params![],
    )
}

fn collect(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> PatientResult<Vec<ScanActivity>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut scans = Vec::new();
    for row in rows {
        let (id, uuid, timestamp) = row?;
        scans.push(ScanActivity {
            id,
            patient_uuid: PatientUuid::parse(&uuid)?,
            timestamp: parse_timestamp(&timestamp)?,
        });
    }
    Ok(scans)
}
