//! Local persistence.
//!
//! [`store::RecordStore`] owns the SQLite file and its schema. The other modules are free
//! functions over a borrowed connection, one per table, so a caller can combine several writes in
//! one transaction.

pub mod event_log;
pub mod patients;
pub mod scan_activity;
pub mod store;
