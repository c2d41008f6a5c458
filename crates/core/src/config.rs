//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services. Request
//! handling never reads process-wide environment variables.

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_CREDENTIALS_PATH, DEFAULT_DATABASE_PATH, DEFAULT_LOGS_SHEET,
    DEFAULT_QR_DIR, ENV_BASE_URL, ENV_CREDENTIALS_PATH, ENV_DATABASE_PATH, ENV_LOGS_SHEET,
    ENV_PATIENTS_SHEET, ENV_QR_DIR, ENV_SCANS_SHEET, ENV_SHEET_ID, PATIENTS_TABLE,
    PATIENT_ID_QUERY_PARAM, SCAN_ACTIVITIES_TABLE,
};
use crate::identity::PublicId;
use crate::{PatientError, PatientResult};
use std::path::{Path, PathBuf};

/// Sheet names inside the mirror spreadsheet, one per mirrored table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetNames {
    pub patients: String,
    pub scan_activities: String,
    pub logs: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            patients: PATIENTS_TABLE.to_string(),
            scan_activities: SCAN_ACTIVITIES_TABLE.to_string(),
            logs: DEFAULT_LOGS_SHEET.to_string(),
        }
    }
}

/// Where the spreadsheet mirror writes and how it authenticates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetsTarget {
    pub spreadsheet_id: String,
    pub credentials_path: PathBuf,
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    database_path: PathBuf,
    base_url: String,
    qr_dir: PathBuf,
    sheet_names: SheetNames,
    sheets: Option<SheetsTarget>,
}

impl CoreConfig {
    /// Create a new `CoreConfig` with the mirror disabled.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::InvalidInput` if `base_url` is not an absolute `http(s)` origin.
    pub fn new(database_path: PathBuf, base_url: String, qr_dir: PathBuf) -> PatientResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        let has_scheme = base_url
            .strip_prefix("https://")
            .or_else(|| base_url.strip_prefix("http://"))
            .is_some_and(|rest| !rest.is_empty());
        if !has_scheme {
            return Err(PatientError::InvalidInput(format!(
                "base URL must start with http:// or https:// and name a host, got '{}'",
                base_url
            )));
        }

        Ok(Self {
            database_path,
            base_url,
            qr_dir,
            sheet_names: SheetNames::default(),
            sheets: None,
        })
    }

    pub fn with_sheets(mut self, target: SheetsTarget) -> Self {
        self.sheets = Some(target);
        self
    }

    pub fn with_sheet_names(mut self, names: SheetNames) -> Self {
        self.sheet_names = names;
        self
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn qr_dir(&self) -> &Path {
        &self.qr_dir
    }

    pub fn sheet_names(&self) -> &SheetNames {
        &self.sheet_names
    }

    pub fn sheets(&self) -> Option<&SheetsTarget> {
        self.sheets.as_ref()
    }

    /// The resolvable link for a public identifier.
    pub fn link_for(&self, public_id: &PublicId) -> String {
        format!(
            "{}/?{}={}",
            self.base_url, PATIENT_ID_QUERY_PARAM, public_id
        )
    }
}

/// Resolve a `CoreConfig` from key/value lookups (normally the process environment).
///
/// Unset or blank values fall back to defaults. The mirror is enabled only when a spreadsheet
/// id is provided.
pub fn resolve_config<F>(lookup: F) -> PatientResult<CoreConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let database_path = get(ENV_DATABASE_PATH).unwrap_or_else(|| DEFAULT_DATABASE_PATH.into());
    let base_url = get(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.into());
    let qr_dir = get(ENV_QR_DIR).unwrap_or_else(|| DEFAULT_QR_DIR.into());

    let defaults = SheetNames::default();
    let sheet_names = SheetNames {
        patients: get(ENV_PATIENTS_SHEET).unwrap_or(defaults.patients),
        scan_activities: get(ENV_SCANS_SHEET).unwrap_or(defaults.scan_activities),
        logs: get(ENV_LOGS_SHEET).unwrap_or(defaults.logs),
    };

    let mut cfg = CoreConfig::new(database_path.into(), base_url, qr_dir.into())?
        .with_sheet_names(sheet_names);

    if let Some(spreadsheet_id) = get(ENV_SHEET_ID) {
        let credentials_path =
            get(ENV_CREDENTIALS_PATH).unwrap_or_else(|| DEFAULT_CREDENTIALS_PATH.into());
        cfg = cfg.with_sheets(SheetsTarget {
            spreadsheet_id,
            credentials_path: credentials_path.into(),
        });
    }

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_resolve_config_uses_defaults() {
        let cfg = resolve_config(lookup_from(&[])).expect("defaults should resolve");

        assert_eq!(cfg.database_path(), Path::new(DEFAULT_DATABASE_PATH));
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
        assert_eq!(cfg.qr_dir(), Path::new(DEFAULT_QR_DIR));
        assert_eq!(cfg.sheet_names(), &SheetNames::default());
        assert!(cfg.sheets().is_none(), "mirror should be disabled without a sheet id");
    }

    #[test]
    fn test_resolve_config_enables_mirror_with_sheet_id() {
        let cfg = resolve_config(lookup_from(&[
            (ENV_SHEET_ID, "1iHn_DTx"),
            (ENV_LOGS_SHEET, "Events"),
        ]))
        .unwrap();

        let target = cfg.sheets().expect("mirror should be enabled");
        assert_eq!(target.spreadsheet_id, "1iHn_DTx");
        assert_eq!(target.credentials_path, PathBuf::from(DEFAULT_CREDENTIALS_PATH));
        assert_eq!(cfg.sheet_names().logs, "Events");
        assert_eq!(cfg.sheet_names().patients, "patients");
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let cfg = resolve_config(lookup_from(&[(ENV_SHEET_ID, "   "), (ENV_BASE_URL, "")])).unwrap();
        assert!(cfg.sheets().is_none());
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_new_trims_trailing_slash_from_base_url() {
        let cfg = CoreConfig::new(
            "p.db".into(),
            "https://emis.example/".into(),
            "qr".into(),
        )
        .unwrap();
        assert_eq!(cfg.base_url(), "https://emis.example");
    }

    #[test]
    fn test_new_rejects_base_url_without_scheme() {
        let err = CoreConfig::new("p.db".into(), "emis.example".into(), "qr".into()).unwrap_err();
        assert!(matches!(err, PatientError::InvalidInput(_)));

        let err = CoreConfig::new("p.db".into(), "https://".into(), "qr".into()).unwrap_err();
        assert!(matches!(err, PatientError::InvalidInput(_)));
    }

    #[test]
    fn test_link_for_embeds_public_id() {
        let cfg = CoreConfig::new(
            "p.db".into(),
            "https://emis.example".into(),
            "qr".into(),
        )
        .unwrap();
        let public_id = PublicId::parse("PAT8901295678").unwrap();
        assert_eq!(
            cfg.link_for(&public_id),
            "https://emis.example/?patient_id=PAT8901295678"
        );
    }
}
