//! Request and response bodies.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// A registration or update submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RegisterPatientReq {
    pub name: String,
    pub age: u16,
    /// 11-digit national identification number.
    pub nin: String,
    pub phone: String,
    pub emergency_contact: String,
    /// One of `AA, AC, AS, CC, SS, SC`.
    pub genotype: String,
    /// One of `A+, A-, B+, B-, AB+, AB-, O+, O-`.
    pub blood_type: String,
    /// Comma-separated.
    #[serde(default)]
    pub allergies: String,
    /// Comma-separated.
    #[serde(default)]
    pub medical_history: String,
    #[serde(default)]
    pub consent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RegisterPatientRes {
    pub public_id: String,
    pub link: String,
    /// `true` for a new patient, `false` when an existing record was updated.
    pub created: bool,
    /// The scannable code for `link`, as base64-encoded PNG.
    pub qr_png_base64: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirror_warning: Option<String>,
}

/// Read-only medical summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PatientSummary {
    pub public_id: String,
    pub name: String,
    pub age: u16,
    pub phone: String,
    pub emergency_contact: String,
    pub genotype: String,
    pub blood_type: String,
    pub allergies: Vec<String>,
    pub medical_history: Vec<String>,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LookupRes {
    pub patient: PatientSummary,
    /// Server time of the recorded scan, RFC 3339.
    pub scanned_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirror_warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListPatientsRes {
    pub patients: Vec<PatientSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResyncRes {
    pub table: String,
    /// `false` when no spreadsheet is configured.
    pub synced: bool,
    pub rows: usize,
}

/// Body of a rejected submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorRes {
    pub field: String,
    pub message: String,
}
