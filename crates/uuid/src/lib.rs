//! Opaque patient identifiers.
//!
//! Every patient row carries a globally unique identifier that is assigned once at creation and
//! never changes. It is the key scan activity rows point at, and it is never shown on the
//! scannable code (that uses the short public identifier instead).
//!
//! ## Canonical form
//! - Lowercase, hyphenated RFC 4122 text, 36 characters
//! - Example: `550e8400-e29b-41d4-a716-446655440000`
//!
//! Externally supplied identifiers (CLI arguments, API paths) must already be canonical; use
//! [`PatientUuid::parse`] to validate them.

mod patient_uuid;

pub use patient_uuid::{PatientUuid, Uuid};

/// Error type for UUID operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for UUID operations.
pub type UuidResult<T> = Result<T, UuidError>;
