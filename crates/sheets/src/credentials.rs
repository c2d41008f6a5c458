//! Service-account key files.

use crate::{SheetsError, SheetsResult};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The fields of a Google service-account JSON key that the client needs.
///
/// Other fields in the key file are ignored.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Loads a key from a JSON key file.
    ///
    /// # Errors
    ///
    /// Returns `SheetsError::CredentialsRead` if the file cannot be read, or
    /// `SheetsError::CredentialsParse` if it is not a service-account key.
    pub fn from_file(path: &Path) -> SheetsResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| SheetsError::CredentialsRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> SheetsResult<Self> {
        serde_json::from_str(raw).map_err(SheetsError::CredentialsParse)
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}
