//! Remote spreadsheet mirror.
//!
//! A resync reads one whole local table and overwrites the matching sheet with it. The mirror
//! holds no state of its own and is never transactional with the local write that triggered it.

use crate::config::{CoreConfig, SheetNames};
use crate::repositories::store::{MirroredTable, RecordStore};
use crate::PatientResult;
use emis_sheets::{GoogleSheetsClient, ServiceAccountKey, SheetWriter};
use std::sync::Arc;

/// Outcome of a resync request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorStatus {
    /// The sheet now holds the header and `rows` data rows.
    Synced { rows: usize },
    /// No spreadsheet is configured.
    Disabled,
}

#[derive(Clone)]
pub struct RemoteMirror {
    store: RecordStore,
    writer: Option<Arc<dyn SheetWriter>>,
    sheet_names: SheetNames,
}

impl RemoteMirror {
    pub fn new(
        store: RecordStore,
        writer: Option<Arc<dyn SheetWriter>>,
        sheet_names: SheetNames,
    ) -> Self {
        Self {
            store,
            writer,
            sheet_names,
        }
    }

    /// Builds the mirror described by `cfg`, loading service-account credentials if a
    /// spreadsheet is configured.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Mirror` if the credentials file cannot be loaded.
    pub fn from_config(cfg: &CoreConfig) -> PatientResult<Self> {
        let store = RecordStore::new(cfg.database_path());
        let writer: Option<Arc<dyn SheetWriter>> = match cfg.sheets() {
            Some(target) => {
                let key = ServiceAccountKey::from_file(&target.credentials_path)?;
                tracing::info!(
                    "spreadsheet mirror enabled for {} as {}",
                    target.spreadsheet_id,
                    key.client_email
                );
                Some(Arc::new(GoogleSheetsClient::new(
                    target.spreadsheet_id.clone(),
                    key,
                )))
            }
            None => {
                tracing::info!("spreadsheet mirror disabled: no spreadsheet configured");
                None
            }
        };
        Ok(Self::new(store, writer, cfg.sheet_names().clone()))
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    pub fn sheet_name(&self, table: MirroredTable) -> &str {
        match table {
            MirroredTable::Patients => &self.sheet_names.patients,
            MirroredTable::ScanActivities => &self.sheet_names.scan_activities,
            MirroredTable::Logs => &self.sheet_names.logs,
        }
    }

    /// Overwrites the sheet for `table` with the table's current contents.
    pub fn resync(&self, table: MirroredTable) -> PatientResult<MirrorStatus> {
        let Some(writer) = &self.writer else {
            tracing::debug!("skipping resync of {}: mirror disabled", table);
            return Ok(MirrorStatus::Disabled);
        };

        let rows = self.store.read_table(table)?;
        let data_rows = rows.len().saturating_sub(1);
        writer.overwrite(self.sheet_name(table), &rows)?;

        tracing::info!(
            "resynced {} to sheet '{}' ({} rows)",
            table,
            self.sheet_name(table),
            data_rows
        );
        Ok(MirrorStatus::Synced { rows: data_rows })
    }
}

impl std::fmt::Debug for RemoteMirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteMirror")
            .field("store", &self.store)
            .field("enabled", &self.is_enabled())
            .field("sheet_names", &self.sheet_names)
            .finish()
    }
}
