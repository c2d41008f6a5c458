//! Patient rows.
//!
//! Free functions over a borrowed connection, so callers decide the transaction boundary.

use crate::identity::{Age, EntryList, NationalId, PhoneNumber, PublicId};
use crate::validation::ValidatedSubmission;
use crate::{PatientError, PatientResult};
use emis_types::{BloodType, Genotype, NonEmptyText};
use emis_uuid::PatientUuid;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use serde::Serialize;

const PATIENT_COLUMNS: &str = "id, uuid, name, age, nin, phone, emergency_contact, genotype, \
     blood_type, allergies, medical_history, patient_id, qr_link";

/// One registered individual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patient {
    pub id: i64,
    pub uuid: PatientUuid,
    pub name: NonEmptyText,
    pub age: Age,
    pub nin: NationalId,
    pub phone: PhoneNumber,
    pub emergency_contact: PhoneNumber,
    pub genotype: Genotype,
    pub blood_type: BloodType,
    pub allergies: EntryList,
    pub medical_history: EntryList,
    pub public_id: PublicId,
    pub link: String,
}

impl Patient {
    /// Copies the mutable fields of a submission onto this patient.
    ///
    /// National ID, phone, opaque identifier, public identifier and link are left alone.
    pub(crate) fn apply(&mut self, submission: &ValidatedSubmission) {
        self.name = submission.name().clone();
        self.age = submission.age();
        self.emergency_contact = submission.emergency_contact().clone();
        self.genotype = submission.genotype();
        self.blood_type = submission.blood_type();
        self.allergies = submission.allergies().clone();
        self.medical_history = submission.medical_history().clone();
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Finds every patient whose national ID or phone matches, oldest first.
///
/// The two fields can match different rows.
pub fn find_by_nin_or_phone(
    conn: &Connection,
    nin: &NationalId,
    phone: &PhoneNumber,
) -> PatientResult<Vec<Patient>> {
    let sql = format!(
        "SELECT {} FROM patients WHERE nin = ?1 OR phone = ?2 ORDER BY id",
        PATIENT_COLUMNS
    );
    query_all(conn, &sql, params![nin.as_str(), phone.as_str()])
}

pub fn get_by_public_id(conn: &Connection, public_id: &str) -> PatientResult<Option<Patient>> {
    let sql = format!("SELECT {} FROM patients WHERE patient_id = ?1", PATIENT_COLUMNS);
    query_one(conn, &sql, params![public_id])
}

/// All patients in registration order.
pub fn list_patients(conn: &Connection) -> PatientResult<Vec<Patient>> {
    let sql = format!("SELECT {} FROM patients ORDER BY id", PATIENT_COLUMNS);
    query_all(conn, &sql, params![])
}

fn query_all(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> PatientResult<Vec<Patient>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, read_row)?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(patient_from_row(row?)?);
    }
    Ok(patients)
}

fn query_one(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> PatientResult<Option<Patient>> {
    let row = conn.query_row(sql, params, read_row).optional()?;
    row.map(patient_from_row).transpose()
}

// ============================================================================
// Writes
// ============================================================================

/// Inserts a new patient and returns the stored record.
///
/// # Errors
///
/// Returns `PatientError::PublicIdTaken` if another patient already holds `public_id`.
pub fn insert_patient(
    conn: &Connection,
    uuid: &PatientUuid,
    submission: &ValidatedSubmission,
    public_id: &PublicId,
    link: &str,
) -> PatientResult<Patient> {
    let result = conn.execute(
        "INSERT INTO patients (uuid, name, age, nin, phone, emergency_contact, genotype,
         blood_type, allergies, medical_history, patient_id, qr_link)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            uuid.to_string(),
            submission.name().as_str(),
            submission.age().years(),
            submission.nin().as_str(),
            submission.phone().as_str(),
            submission.emergency_contact().as_str(),
            submission.genotype().as_str(),
            submission.blood_type().as_str(),
            submission.allergies().as_str(),
            submission.medical_history().as_str(),
            public_id.as_str(),
            link,
        ],
    );

    match result {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e, "patients.patient_id") => {
            return Err(PatientError::PublicIdTaken(public_id.to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Patient {
        id: conn.last_insert_rowid(),
        uuid: uuid.clone(),
        name: submission.name().clone(),
        age: submission.age(),
        nin: submission.nin().clone(),
        phone: submission.phone().clone(),
        emergency_contact: submission.emergency_contact().clone(),
        genotype: submission.genotype(),
        blood_type: submission.blood_type(),
        allergies: submission.allergies().clone(),
        medical_history: submission.medical_history().clone(),
        public_id: public_id.clone(),
        link: link.to_owned(),
    })
}

/// Writes the mutable fields and link of an existing patient, addressed by opaque identifier.
pub fn update_patient(conn: &Connection, patient: &Patient) -> PatientResult<()> {
    let changed = conn.execute(
        "UPDATE patients
         SET name = ?1, age = ?2, emergency_contact = ?3, genotype = ?4, blood_type = ?5,
             allergies = ?6, medical_history = ?7, qr_link = ?8
         WHERE uuid = ?9",
        params![
            patient.name.as_str(),
            patient.age.years(),
            patient.emergency_contact.as_str(),
            patient.genotype.as_str(),
            patient.blood_type.as_str(),
            patient.allergies.as_str(),
            patient.medical_history.as_str(),
            patient.link,
            patient.uuid.to_string(),
        ],
    )?;

    if changed != 1 {
        return Err(PatientError::CorruptRow(format!(
            "expected to update one patient with uuid {}, updated {}",
            patient.uuid, changed
        )));
    }
    Ok(())
}

fn is_unique_violation(err: &rusqlite::Error, column: &str) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, Some(msg)) => {
            e.code == ErrorCode::ConstraintViolation && msg.contains(column)
        }
        _ => false,
    }
}

// ============================================================================
// Row mapping
// ============================================================================

struct PatientRow {
    id: i64,
    uuid: String,
    name: String,
    age: i64,
    nin: String,
    phone: String,
    emergency_contact: String,
    genotype: String,
    blood_type: String,
    allergies: String,
    medical_history: String,
    public_id: String,
    link: String,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok(PatientRow {
        id: row.get(0)?,
        uuid: row.get(1)?,
        name: row.get(2)?,
        age: row.get(3)?,
        nin: row.get(4)?,
        phone: row.get(5)?,
        emergency_contact: row.get(6)?,
        genotype: row.get(7)?,
        blood_type: row.get(8)?,
        allergies: row.get(9)?,
        medical_history: row.get(10)?,
        public_id: row.get(11)?,
        link: row.get(12)?,
    })
}

fn patient_from_row(row: PatientRow) -> PatientResult<Patient> {
    let corrupt = |field: &str, value: &str| {
        PatientError::CorruptRow(format!("patient {} has invalid {} '{}'", row.id, field, value))
    };

    Ok(Patient {
        id: row.id,
        uuid: PatientUuid::parse(&row.uuid)?,
        name: NonEmptyText::new(&row.name).map_err(|_| corrupt("name", &row.name))?,
        age: u16::try_from(row.age)
            .ok()
            .and_then(Age::new)
            .ok_or_else(|| corrupt("age", &row.age.to_string()))?,
        nin: NationalId::parse(&row.nin).ok_or_else(|| corrupt("nin", &row.nin))?,
        phone: PhoneNumber::try_from(row.phone.clone())
            .map_err(|_| corrupt("phone", &row.phone))?,
        emergency_contact: PhoneNumber::try_from(row.emergency_contact.clone())
            .map_err(|_| corrupt("emergency_contact", &row.emergency_contact))?,
        genotype: row
            .genotype
            .parse()
            .map_err(|_| corrupt("genotype", &row.genotype))?,
        blood_type: row
            .blood_type
            .parse()
            .map_err(|_| corrupt("blood_type", &row.blood_type))?,
        allergies: EntryList::clean(&row.allergies),
        medical_history: EntryList::clean(&row.medical_history),
        public_id: PublicId::parse(&row.public_id)
            .ok_or_else(|| corrupt("patient_id", &row.public_id))?,
        link: row.link,
    })
}
