use crate::validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to open record store {path}: {source}", path = path.display())]
    StoreOpen {
        path: std::path::PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("record store error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("public identifier {0} is already assigned to another patient")]
    PublicIdTaken(String),
    #[error("stored row is not valid: {0}")]
    CorruptRow(String),

    #[error("UUID error: {0}")]
    Uuid(#[from] emis_uuid::UuidError),
    #[error("spreadsheet mirror error: {0}")]
    Mirror(#[from] emis_sheets::SheetsError),
    #[error("scannable code error: {0}")]
    Code(#[from] emis_qr::CodeError),
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
