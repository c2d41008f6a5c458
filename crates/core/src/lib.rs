//! # EMIS Core
//!
//! Core business logic for the EMIS patient registration and emergency lookup tool.
//!
//! This crate contains pure data operations:
//! - Validation and normalization of submitted identity fields
//! - The SQLite record store (`patients`, `scan_activities`, `logs`)
//! - Identity resolution and the insert-or-update flow
//! - Lookups that record scan activity
//! - Full-table resyncs to the spreadsheet mirror
//! - Writing scannable code artifacts
//!
//! **No API concerns**: HTTP servers, form rendering and command-line handling belong in
//! `api-rest`, `api-shared` and `emis-cli`.

pub mod config;
pub mod constants;
pub mod error;
pub mod identity;
pub mod mirror;
pub mod patient;
pub mod repositories;
pub mod validation;

pub use config::{resolve_config, CoreConfig, SheetNames, SheetsTarget};
pub use error::{PatientError, PatientResult};
pub use identity::{Age, EntryList, NationalId, PhoneNumber, PublicId};
pub use mirror::{MirrorStatus, RemoteMirror};
pub use patient::{IssuedCode, PatientService, ResolvedPatient, UpsertOutcome};
pub use repositories::event_log::{EventLevel, LogEntry};
pub use repositories::patients::Patient;
pub use repositories::scan_activity::ScanActivity;
pub use repositories::store::{MirroredTable, RecordStore};
pub use validation::{PatientSubmission, ValidatedSubmission, ValidationError};

pub use emis_sheets::SheetWriter;
pub use emis_types::{BloodType, Genotype, NonEmptyText};
pub use emis_uuid::PatientUuid;
