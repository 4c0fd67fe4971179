//! Data models for Google Sheets and Drive API payloads and credential files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A rectangular block of cell values, as returned by `spreadsheets.values.get`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

/// Response from `spreadsheets.values.update`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateValuesResponse {
    #[serde(default)]
    pub updated_range: Option<String>,
    #[serde(default)]
    pub updated_rows: Option<u64>,
    #[serde(default)]
    pub updated_columns: Option<u64>,
    #[serde(default)]
    pub updated_cells: Option<u64>,
}

/// Properties of a single sheet within a spreadsheet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    #[serde(default)]
    pub sheet_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub index: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sheet {
    pub properties: SheetProperties,
}

/// Response from `spreadsheets.get`, reduced to the sheet list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetMetadata {
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

/// Single reply within a `spreadsheets.batchUpdate` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateReply {
    #[serde(default)]
    pub add_sheet: Option<AddSheetReply>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddSheetReply {
    pub properties: SheetProperties,
}

/// Response from `spreadsheets.batchUpdate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateResponse {
    #[serde(default)]
    pub replies: Vec<BatchUpdateReply>,
}

/// Metadata for a file in Google Drive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl std::fmt::Display for DriveFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mime = self.mime_type.as_deref().unwrap_or("-");
        write!(f, "{}\t{}\t{}", self.id, mime, self.name)
    }
}

/// Response from the Drive `files.list` endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<DriveFile>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Google API error response envelope.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: u16,
    pub message: String,
}

/// Service account credentials from a JSON key file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountCredentials {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

/// Installed-app OAuth client secret file (`credentials.json`).
///
/// The interesting fields live under the `installed` key.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub installed: InstalledApp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstalledApp {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

/// Persisted user token file (`token.json`), in the layout Google's
/// authorized-user flow writes. Serialized back after a refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizedUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

/// OAuth2 token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub expires_in: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_range_deserialize() {
        let json = r#"{
            "range": "'test'!A1:C3",
            "majorDimension": "ROWS",
            "values": [["a", "b"], [1, true]]
        }"#;

        let range: ValueRange = serde_json::from_str(json).unwrap();
        assert_eq!(range.range.as_deref(), Some("'test'!A1:C3"));
        assert_eq!(range.values.len(), 2);
        assert_eq!(range.values[1][0], serde_json::json!(1));
    }

    #[test]
    fn test_value_range_without_values() {
        // values is omitted entirely for an empty range
        let range: ValueRange = serde_json::from_str(r#"{"range": "'t'!A1:B2"}"#).unwrap();
        assert!(range.values.is_empty());
    }

    #[test]
    fn test_spreadsheet_metadata_deserialize() {
        let json = r#"{
            "spreadsheetId": "abc123",
            "sheets": [
                {"properties": {"sheetId": 0, "title": "test", "index": 0}},
                {"properties": {"sheetId": 42, "title": "test2", "index": 1}}
            ]
        }"#;

        let meta: SpreadsheetMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.sheets.len(), 2);
        assert_eq!(meta.sheets[1].properties.title, "test2");
        assert_eq!(meta.sheets[1].properties.sheet_id, Some(42));
    }

    #[test]
    fn test_batch_update_add_sheet_reply() {
        let json = r#"{
            "replies": [
                {"addSheet": {"properties": {"sheetId": 7, "title": "new"}}}
            ]
        }"#;

        let resp: BatchUpdateResponse = serde_json::from_str(json).unwrap();
        let sheet_id = resp.replies[0]
            .add_sheet
            .as_ref()
            .and_then(|r| r.properties.sheet_id);
        assert_eq!(sheet_id, Some(7));
    }

    #[test]
    fn test_authorized_user_roundtrip() {
        let json = r#"{
            "token": "ya29.abc",
            "refresh_token": "1//refresh",
            "token_uri": "https://oauth2.googleapis.com/token",
            "client_id": "id.apps.googleusercontent.com",
            "client_secret": "secret",
            "scopes": ["https://www.googleapis.com/auth/spreadsheets"],
            "expiry": "2030-01-01T00:00:00Z"
        }"#;

        let user: AuthorizedUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.token.as_deref(), Some("ya29.abc"));
        assert!(user.expiry.is_some());

        let out = serde_json::to_string(&user).unwrap();
        let back: AuthorizedUser = serde_json::from_str(&out).unwrap();
        assert_eq!(back.refresh_token.as_deref(), Some("1//refresh"));
    }

    #[test]
    fn test_client_secrets_deserialize() {
        let json = r#"{
            "installed": {
                "client_id": "id.apps.googleusercontent.com",
                "client_secret": "secret",
                "token_uri": "https://oauth2.googleapis.com/token",
                "redirect_uris": ["http://localhost"]
            }
        }"#;

        let secrets: ClientSecrets = serde_json::from_str(json).unwrap();
        assert_eq!(secrets.installed.client_secret, "secret");
    }

    #[test]
    fn test_drive_file_display() {
        let file = DriveFile {
            id: "abc123".to_string(),
            name: "report.csv".to_string(),
            mime_type: Some("text/csv".to_string()),
        };

        let display = format!("{}", file);
        assert!(display.contains("abc123"));
        assert!(display.contains("report.csv"));
        assert!(display.contains("text/csv"));
    }
}
