//! # EMIS Sheets
//!
//! Write side of the spreadsheet mirror.
//!
//! The mirror never edits cells in place. Every write replaces the whole sheet with a header
//! row followed by data rows, so the only operation a target has to support is
//! [`SheetWriter::overwrite`].
//!
//! [`GoogleSheetsClient`] implements it against the Google Sheets v4 REST API using a service
//! account key file.

mod credentials;
mod google;

pub use credentials::ServiceAccountKey;
pub use google::GoogleSheetsClient;

/// Errors raised while talking to a spreadsheet target.
#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    #[error("failed to read credentials file {path}: {source}", path = path.display())]
    CredentialsRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse credentials file: {0}")]
    CredentialsParse(serde_json::Error),
    #[error("failed to sign token request: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("invalid spreadsheet URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("spreadsheet API returned {status}: {body}")]
    Api { status: u16, body: String },
}

pub type SheetsResult<T> = std::result::Result<T, SheetsError>;

/// A destination that can hold a full copy of one local table per named sheet.
pub trait SheetWriter: Send + Sync {
    /// Replaces the entire content of `sheet_name` with `rows`.
    ///
    /// `rows[0]` is the header row. Implementations must clear any previous content first, so
    /// that a shorter table does not leave stale rows behind.
    fn overwrite(&self, sheet_name: &str, rows: &[Vec<String>]) -> SheetsResult<()>;
}
