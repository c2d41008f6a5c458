//! EMIS scannable codes
//!
//! Encodes a patient's resolvable link as a QR code PNG, at the highest error-correction level.
//!
//! Output is a pure function of the link and the [`QrSettings`]: the same inputs always produce
//! byte-identical PNG data.
//!
//! ```no_run
//! use emis_qr::QrCodeService;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), emis_qr::CodeError> {
//! let service = QrCodeService::default();
//! let png = service.encode_to_path(
//!     "https://emis.example/?patient_id=PAT8901295678",
//!     Path::new("qr_codes/Ada_Obi_PAT8901295678.png"),
//! )?;
//! assert!(!png.is_empty());
//! # Ok(())
//! # }
//! ```

mod codes;

pub use codes::{QrCodeService, QrSettings};

/// Errors that can occur while producing a scannable code
#[derive(Debug, thiserror::Error)]
pub enum CodeError {
    /// The payload was empty
    #[error("cannot encode an empty link")]
    EmptyPayload,

    /// The payload does not fit in a QR symbol at the requested error-correction level
    #[error("failed to build QR symbol: {0}")]
    Symbol(#[from] qrcode::types::QrError),

    /// PNG encoding failed
    #[error("failed to encode PNG: {0}")]
    Png(#[from] image::ImageError),

    /// The destination directory could not be created
    #[error("failed to create directory {path}: {source}", path = path.display())]
    CreateDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact could not be written
    #[error("failed to write {path}: {source}", path = path.display())]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type CodeResult<T> = Result<T, CodeError>;
