//! Google Sheets v4 implementation of [`SheetWriter`].
//!
//! Each overwrite performs three requests: a service-account token exchange, a `values:clear`
//! on the whole sheet and a `values.update` from `A1`. Tokens are not cached between calls.

use crate::{ServiceAccountKey, SheetWriter, SheetsError, SheetsResult};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::blocking::Client;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::json;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const TOKEN_LIFETIME_SECS: i64 = 3600;
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Client for one spreadsheet document.
#[derive(Debug, Clone)]
pub struct GoogleSheetsClient {
    spreadsheet_id: String,
    key: ServiceAccountKey,
    api_base: String,
}

impl GoogleSheetsClient {
    pub fn new(spreadsheet_id: impl Into<String>, key: ServiceAccountKey) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            key,
            api_base: SHEETS_API_BASE.to_string(),
        }
    }

    /// Points the client at a different API root (for proxies or local emulators).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    fn access_token(&self, http: &Client) -> SheetsResult<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            iss: &self.key.client_email,
            scope: SHEETS_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
        };
        let signing_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())?;
        let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &signing_key)?;

        let response = http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()?;
        let token: TokenResponse = check_status(response)?.json()?;
        Ok(token.access_token)
    }

    pub(crate) fn values_url(&self, range: &str, suffix: &str) -> SheetsResult<Url> {
        let mut url = Url::parse(&self.api_base).map_err(|e| SheetsError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SheetsError::InvalidUrl(format!("{} cannot be a base", self.api_base)))?
            .pop_if_empty()
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&format!("{}{}", range, suffix));
        Ok(url)
    }
}

impl SheetWriter for GoogleSheetsClient {
    fn overwrite(&self, sheet_name: &str, rows: &[Vec<String>]) -> SheetsResult<()> {
        // Built per call: the blocking client owns a runtime and must not be dropped on an
        // async worker thread.
        let http = Client::new();
        let token = self.access_token(&http)?;

        let clear_url = self.values_url(&sheet_range(sheet_name), ":clear")?;
        check_status(http.post(clear_url).bearer_auth(&token).json(&json!({})).send()?)?;

        let start = a1_range(sheet_name, "A1");
        let mut update_url = self.values_url(&start, "")?;
        update_url
            .query_pairs_mut()
            .append_pair("valueInputOption", "RAW");
        let body = json!({
            "range": start,
            "majorDimension": "ROWS",
            "values": rows,
        });
        check_status(http.put(update_url).bearer_auth(&token).json(&body).send()?)?;

        tracing::info!(
            "overwrote sheet '{}' of {} with {} rows",
            sheet_name,
            self.spreadsheet_id,
            rows.len()
        );
        Ok(())
    }
}

fn check_status(response: reqwest::blocking::Response) -> SheetsResult<reqwest::blocking::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(SheetsError::Api {
        status: status.as_u16(),
        body,
    })
}

/// Quotes a sheet name for use in A1 notation.
pub(crate) fn sheet_range(sheet_name: &str) -> String {
    format!("'{}'", sheet_name.replace('\'', "''"))
}

pub(crate) fn a1_range(sheet_name: &str, cell: &str) -> String {
    format!("{}!{}", sheet_range(sheet_name), cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GoogleSheetsClient {
        let key = ServiceAccountKey::from_json(
            r#"{"client_email": "mirror@example.com", "private_key": "unused"}"#,
        )
        .unwrap();
        GoogleSheetsClient::new("1iHn_sheet", key)
    }

    #[test]
    fn test_sheet_range_quotes_and_escapes() {
        assert_eq!(sheet_range("patients"), "'patients'");
        assert_eq!(sheet_range("Ada's log"), "'Ada''s log'");
        assert_eq!(a1_range("Logs", "A1"), "'Logs'!A1");
    }

    #[test]
    fn test_values_url_for_clear() {
        let url = client()
            .values_url(&sheet_range("scan_activities"), ":clear")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/1iHn_sheet/values/'scan_activities':clear"
        );
    }

    #[test]
    fn test_values_url_encodes_spaces_in_sheet_name() {
        let url = client().values_url(&a1_range("My Sheet", "A1"), "").unwrap();
        assert!(url.path().ends_with("/values/'My%20Sheet'!A1"));
    }

    #[test]
    fn test_values_url_respects_custom_base() {
        let url = client()
            .with_api_base("http://127.0.0.1:9000/v4/spreadsheets/")
            .values_url("'patients'!A1", "")
            .unwrap();
        assert_eq!(url.host_str(), Some("127.0.0.1"));
        assert_eq!(url.path(), "/v4/spreadsheets/1iHn_sheet/values/'patients'!A1");
    }

    #[test]
    fn test_overwrite_fails_with_invalid_private_key() {
        let err = client().overwrite("patients", &[]).unwrap_err();
        assert!(matches!(err, SheetsError::Signing(_)));
    }
}
