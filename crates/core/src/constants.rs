//! Constants used throughout the EMIS core crate.
//!
//! Table names double as the default sheet names of the spreadsheet mirror, so the local
//! schema and the remote layout line up one-to-one.

/// Table holding one row per registered patient.
pub const PATIENTS_TABLE: &str = "patients";

/// Append-only table of lookups made through a scannable code.
pub const SCAN_ACTIVITIES_TABLE: &str = "scan_activities";

/// Append-only application event log.
pub const LOGS_TABLE: &str = "logs";

/// Default sheet receiving the event log.
pub const DEFAULT_LOGS_SHEET: &str = "Logs";

/// Default SQLite database file.
pub const DEFAULT_DATABASE_PATH: &str = "patients.db";

/// Default public origin embedded in patient links.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default directory for generated QR code images.
pub const DEFAULT_QR_DIR: &str = "qr_codes";

/// Default service-account key file for the spreadsheet mirror.
pub const DEFAULT_CREDENTIALS_PATH: &str = "mainCredentials.json";

/// Query parameter that carries the public identifier in a patient link.
pub const PATIENT_ID_QUERY_PARAM: &str = "patient_id";

/// Prefix of every public identifier.
pub const PUBLIC_ID_PREFIX: &str = "PAT";

/// Country calling code applied to domestic numbers.
pub const COUNTRY_CODE: &str = "234";

/// Domestic trunk prefix dropped when converting to international form.
pub const TRUNK_PREFIX: char = '0';

/// Length of a national identification number.
pub const NIN_LENGTH: usize = 11;

/// Oldest age accepted on the registration form.
pub const MAX_AGE: u8 = 120;

/// Timestamp format used for `scan_activities` and `logs` rows (matches SQLite's
/// `CURRENT_TIMESTAMP`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Environment variables resolved once at startup.
pub const ENV_DATABASE_PATH: &str = "EMIS_DATABASE_PATH";
pub const ENV_BASE_URL: &str = "EMIS_BASE_URL";
pub const ENV_QR_DIR: &str = "EMIS_QR_DIR";
pub const ENV_SHEET_ID: &str = "EMIS_SHEET_ID";
pub const ENV_CREDENTIALS_PATH: &str = "EMIS_CREDENTIALS_PATH";
pub const ENV_PATIENTS_SHEET: &str = "EMIS_PATIENTS_SHEET";
pub const ENV_SCANS_SHEET: &str = "EMIS_SCANS_SHEET";
pub const ENV_LOGS_SHEET: &str = "EMIS_LOGS_SHEET";
