//! Patient registration and lookup.
//!
//! [`PatientService`] ties the record store, the spreadsheet mirror and the code generator
//! together:
//!
//! - [`PatientService::upsert`] updates the existing patients with the same national ID or the
//!   same phone, or registers a new one, then resyncs the patients sheet.
//! - [`PatientService::resolve`] looks a public identifier up, records a scan activity on a hit,
//!   then resyncs the scan activity sheet.
//!
//! Each of these performs exactly one local write transaction. The resync that follows is best
//! effort: a mirror failure is returned as a warning next to the committed result and never
//! undoes the local write.

use crate::config::CoreConfig;
use crate::mirror::{MirrorStatus, RemoteMirror};
use crate::repositories::event_log::{self, EventLevel, LogEntry};
use crate::repositories::patients::{self, Patient};
use crate::repositories::scan_activity::{self, ScanActivity};
use crate::repositories::store::{MirroredTable, RecordStore};
use crate::validation::ValidatedSubmission;
use crate::PatientResult;
use chrono::Utc;
use emis_qr::QrCodeService;
use emis_sheets::SheetWriter;
use emis_uuid::PatientUuid;
use std::path::PathBuf;
use std::sync::Arc;

/// Result of [`PatientService::upsert`].
#[derive(Debug, Clone)]
pub struct UpsertOutcome {
    pub patient: Patient,
    /// `true` if a new row was inserted, `false` if an existing patient was updated.
    pub created: bool,
    pub link: String,
    /// Set when the local write succeeded but the patients sheet could not be resynced.
    pub mirror_warning: Option<String>,
}

/// Result of a successful [`PatientService::resolve`].
#[derive(Debug, Clone)]
pub struct ResolvedPatient {
    pub patient: Patient,
    pub scan: ScanActivity,
    pub mirror_warning: Option<String>,
}

/// A scannable code written to disk.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub path: PathBuf,
    pub png: Vec<u8>,
}

#[derive(Clone, Debug)]
pub struct PatientService {
    cfg: Arc<CoreConfig>,
    store: RecordStore,
    mirror: RemoteMirror,
    codes: QrCodeService,
}

impl PatientService {
    /// Creates a service over `cfg`'s store. `writer` is the mirror target, or `None` to run
    /// without a spreadsheet.
    pub fn new(cfg: Arc<CoreConfig>, writer: Option<Arc<dyn SheetWriter>>) -> Self {
        let store = RecordStore::new(cfg.database_path());
        let mirror = RemoteMirror::new(store.clone(), writer, cfg.sheet_names().clone());
        Self {
            cfg,
            store,
            mirror,
            codes: QrCodeService::default(),
        }
    }

    /// Creates a service whose mirror is the spreadsheet configured in `cfg`, if any.
    pub fn from_config(cfg: Arc<CoreConfig>) -> PatientResult<Self> {
        let mirror = RemoteMirror::from_config(&cfg)?;
        Ok(Self {
            store: RecordStore::new(cfg.database_path()),
            cfg,
            mirror,
            codes: QrCodeService::default(),
        })
    }

    /// Creates the schema if needed.
    pub fn initialise(&self) -> PatientResult<()> {
        self.store.init_schema()
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn mirror_enabled(&self) -> bool {
        self.mirror.is_enabled()
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Inserts or updates the patient matching `submission` and returns their link.
    ///
    /// A patient matches if either the national ID or the phone number is already stored. Every
    /// matching row is updated and the oldest is returned. On a match only name, age, emergency
    /// contact, genotype, blood type, allergies and medical history change; identifiers and link
    /// stay as first assigned.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Database` (or another storage variant) if the local write fails,
    /// and `PatientError::PublicIdTaken` if a new patient's derived public identifier is
    /// already held by someone else. Nothing is committed in either case.
    pub fn upsert(&self, submission: &ValidatedSubmission) -> PatientResult<UpsertOutcome> {
        let written = self.store.with_transaction(|tx| {
            let matches =
                patients::find_by_nin_or_phone(tx, submission.nin(), submission.phone())?;

            let mut primary = None;
            for mut existing in matches {
                existing.apply(submission);
                existing.link = self.cfg.link_for(&existing.public_id);
                patients::update_patient(tx, &existing)?;
                event_log::record_event(
                    tx,
                    EventLevel::Info,
                    &format!("patient {} updated", existing.public_id),
                )?;
                if primary.is_none() {
                    primary = Some(existing);
                }
            }
            if let Some(patient) = primary {
                return Ok((patient, false));
            }

            let public_id = submission.public_id();
            let link = self.cfg.link_for(&public_id);
            let patient = patients::insert_patient(
                tx,
                &PatientUuid::new(),
                submission,
                &public_id,
                &link,
            )?;
            event_log::record_event(
                tx,
                EventLevel::Info,
                &format!("patient {} registered", patient.public_id),
            )?;
            Ok((patient, true))
        });

        let (patient, created) = match written {
            Ok(written) => written,
            Err(e) => {
                let message = format!("failed to store patient submission: {}", e);
                tracing::error!("{}", message);
                self.record_event_best_effort(EventLevel::Error, &message);
                return Err(e);
            }
        };

        tracing::info!(
            "{} patient {}",
            if created { "registered" } else { "updated" },
            patient.public_id
        );

        let mirror_warning = self.resync_best_effort(MirroredTable::Patients);
        Ok(UpsertOutcome {
            link: patient.link.clone(),
            patient,
            created,
            mirror_warning,
        })
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Resolves a public identifier and records the view.
    ///
    /// Returns `Ok(None)` for unknown identifiers without writing anything.
    pub fn resolve(&self, public_id: &str) -> PatientResult<Option<ResolvedPatient>> {
        let public_id = public_id.trim();
        let found = self.store.with_transaction(|tx| {
            let Some(patient) = patients::get_by_public_id(tx, public_id)? else {
                return Ok(None);
            };
            let scan = scan_activity::record_scan(tx, &patient.uuid, Utc::now())?;
            event_log::record_event(
                tx,
                EventLevel::Info,
                &format!("patient {} viewed via code", patient.public_id),
            )?;
            Ok(Some((patient, scan)))
        });

        let (patient, scan) = match found {
            Ok(Some(found)) => found,
            Ok(None) => {
                tracing::info!("no patient with public identifier '{}'", public_id);
                return Ok(None);
            }
            Err(e) => {
                let message = format!("failed to look up patient '{}': {}", public_id, e);
                tracing::error!("{}", message);
                self.record_event_best_effort(EventLevel::Error, &message);
                return Err(e);
            }
        };

        let mirror_warning = self.resync_best_effort(MirroredTable::ScanActivities);
        Ok(Some(ResolvedPatient {
            patient,
            scan,
            mirror_warning,
        }))
    }

    // ========================================================================
    // Scannable codes
    // ========================================================================

    /// Encodes the patient's link and writes it to `<qr_dir>/<name>_<public_id>.png`.
    pub fn issue_code(&self, patient: &Patient) -> PatientResult<IssuedCode> {
        let file_name = format!(
            "{}_{}.png",
            file_safe_name(patient.name.as_str()),
            patient.public_id
        );
        let path = self.cfg.qr_dir().join(file_name);
        let png = self.codes.encode_to_path(&patient.link, &path)?;
        Ok(IssuedCode { path, png })
    }

    /// Issues a code for a stored patient without recording a scan.
    pub fn code_for(&self, public_id: &str) -> PatientResult<Option<IssuedCode>> {
        let patient = self
            .store
            .read(|conn| patients::get_by_public_id(conn, public_id.trim()))?;
        patient.map(|p| self.issue_code(&p)).transpose()
    }

    // ========================================================================
    // Listing and mirror maintenance
    // ========================================================================

    pub fn list_patients(&self) -> PatientResult<Vec<Patient>> {
        self.store.read(patients::list_patients)
    }

    pub fn list_scans(&self) -> PatientResult<Vec<ScanActivity>> {
        self.store.read(scan_activity::list_scans)
    }

    pub fn list_events(&self) -> PatientResult<Vec<LogEntry>> {
        self.store.read(event_log::list_events)
    }

    /// Resyncs one table on demand. Unlike the resync after a write, errors are returned.
    pub fn resync(&self, table: MirroredTable) -> PatientResult<MirrorStatus> {
        self.mirror.resync(table)
    }

    fn resync_best_effort(&self, table: MirroredTable) -> Option<String> {
        match self.mirror.resync(table) {
            Ok(_) => None,
            Err(e) => {
                let message = format!("failed to resync {} sheet: {}", table, e);
                tracing::warn!("{}", message);
                self.record_event_best_effort(EventLevel::Warn, &message);
                Some(message)
            }
        }
    }

    fn record_event_best_effort(&self, level: EventLevel, message: &str) {
        let recorded = self
            .store
            .with_transaction(|tx| event_log::record_event(tx, level, message));
        if let Err(e) = recorded {
            tracing::warn!("failed to record {} event: {}", level, e);
        }
    }
}

/// Reduces a display name to characters safe in a file name.
///
/// Whitespace runs become one underscore; anything other than ASCII letters, digits, `-` and
/// `_` is dropped.
fn file_safe_name(name: &str) -> String {
    let joined = name.split_whitespace().collect::<Vec<_>>().join("_");
    let safe: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect();
    if safe.is_empty() {
        "patient".to_string()
    } else {
        safe
    }
}
