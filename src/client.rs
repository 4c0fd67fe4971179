//! Google Sheets and Drive API client.

use reqwest::{Client, Response};
use serde_json::json;
use tracing::{debug, error};

use crate::auth::Authenticator;
use crate::error::{Result, SheetsError};
use crate::frame::{Frame, Header};
use crate::models::{
    ApiErrorResponse, BatchUpdateResponse, DriveFile, FileListResponse, SpreadsheetMetadata,
    UpdateValuesResponse, ValueRange,
};
use crate::range::SheetRange;

/// Base URL for Google Sheets API v4.
const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";

/// Base URL for Google Drive API v3.
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// How the API renders cell values on read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueRenderOption {
    #[default]
    FormattedValue,
    UnformattedValue,
    Formula,
}

impl ValueRenderOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueRenderOption::FormattedValue => "FORMATTED_VALUE",
            ValueRenderOption::UnformattedValue => "UNFORMATTED_VALUE",
            ValueRenderOption::Formula => "FORMULA",
        }
    }
}

/// How the API interprets cell values on write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueInputOption {
    /// Store values as-is.
    #[default]
    Raw,
    /// Parse values as if typed into the UI (formulas, dates, numbers).
    UserEntered,
}

impl ValueInputOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueInputOption::Raw => "RAW",
            ValueInputOption::UserEntered => "USER_ENTERED",
        }
    }
}

/// Options for [`SheetsClient::download_with`].
#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    pub header: Header,
    pub value_render: ValueRenderOption,
}

/// Options for [`SheetsClient::upload_with`].
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Write the column names as the first row.
    pub write_header: bool,
    pub value_input: ValueInputOption,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            write_header: true,
            value_input: ValueInputOption::default(),
        }
    }
}

/// Client for moving tabular data between Google Sheets and a [`Frame`],
/// plus the small Drive surface needed to locate spreadsheets.
///
/// Cheap to clone; clones share the authenticator and connection pool.
#[derive(Clone)]
pub struct SheetsClient {
    auth: Authenticator,
    http: Client,
    sheets_base: String,
    drive_base: String,
}

impl SheetsClient {
    /// Create a new client against the production Google endpoints.
    pub fn new(auth: Authenticator) -> Self {
        Self::with_base_urls(auth, SHEETS_API_BASE, DRIVE_API_BASE)
    }

    /// Create a client against explicit base URLs. Used to point the client
    /// at a local mock server.
    pub fn with_base_urls(auth: Authenticator, sheets_base: &str, drive_base: &str) -> Self {
        Self {
            auth,
            http: Client::new(),
            sheets_base: sheets_base.trim_end_matches('/').to_string(),
            drive_base: drive_base.trim_end_matches('/').to_string(),
        }
    }

    /// Read a range into a [`Frame`], taking column names from the first row.
    pub async fn download(&self, spreadsheet_id: &str, range: &SheetRange) -> Result<Frame> {
        self.download_with(spreadsheet_id, range, &DownloadOptions::default())
            .await
    }

    /// Read a range into a [`Frame`] with explicit header and render options.
    pub async fn download_with(
        &self,
        spreadsheet_id: &str,
        range: &SheetRange,
        options: &DownloadOptions,
    ) -> Result<Frame> {
        let token = self.auth.get_access_token().await?;
        debug!(spreadsheet_id, %range, "downloading range");

        let response = self
            .http
            .get(format!(
                "{}/spreadsheets/{}/values/{}",
                self.sheets_base, spreadsheet_id, range
            ))
            .bearer_auth(&token)
            .query(&[("valueRenderOption", options.value_render.as_str())])
            .send()
            .await?;
        let response = check_response(response).await?;

        let value_range: ValueRange = response.json().await?;
        if value_range.values.is_empty() {
            return Err(SheetsError::EmptyData(range.to_string()));
        }

        Frame::from_values(value_range.values, &options.header)
    }

    /// Write a [`Frame`] to a range, header row included.
    ///
    /// The range is cleared first so stale rows below the new data do not
    /// survive the write.
    pub async fn upload(
        &self,
        frame: &Frame,
        spreadsheet_id: &str,
        range: &SheetRange,
    ) -> Result<UpdateValuesResponse> {
        self.upload_with(frame, spreadsheet_id, range, &UploadOptions::default())
            .await
    }

    /// Write a [`Frame`] to a range with explicit header and input options.
    pub async fn upload_with(
        &self,
        frame: &Frame,
        spreadsheet_id: &str,
        range: &SheetRange,
        options: &UploadOptions,
    ) -> Result<UpdateValuesResponse> {
        let token = self.auth.get_access_token().await?;
        let values = frame.to_values(options.write_header);
        debug!(
            spreadsheet_id,
            %range,
            rows = values.len(),
            "uploading range"
        );

        let response = self
            .http
            .post(format!(
                "{}/spreadsheets/{}/values/{}:clear",
                self.sheets_base, spreadsheet_id, range
            ))
            .bearer_auth(&token)
            .send()
            .await?;
        check_response(response).await?;

        let body = json!({
            "majorDimension": "ROWS",
            "values": values,
        });

        let response = self
            .http
            .put(format!(
                "{}/spreadsheets/{}/values/{}",
                self.sheets_base, spreadsheet_id, range
            ))
            .bearer_auth(&token)
            .query(&[("valueInputOption", options.value_input.as_str())])
            .json(&body)
            .send()
            .await?;
        let response = check_response(response).await?;

        let update: UpdateValuesResponse = response.json().await?;
        Ok(update)
    }

    /// List the sheet titles of a spreadsheet, in sheet order.
    pub async fn sheet_names(&self, spreadsheet_id: &str) -> Result<Vec<String>> {
        let token = self.auth.get_access_token().await?;

        let response = self
            .http
            .get(format!(
                "{}/spreadsheets/{}",
                self.sheets_base, spreadsheet_id
            ))
            .bearer_auth(&token)
            .query(&[("fields", "sheets.properties")])
            .send()
            .await?;
        let response = check_response(response).await?;

        let metadata: SpreadsheetMetadata = response.json().await?;
        Ok(metadata
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties.title)
            .collect())
    }

    /// Create a new sheet in an existing spreadsheet.
    ///
    /// Returns the new sheet's ID, or `None` when a sheet with that title
    /// already exists (the API reports that as HTTP 400).
    pub async fn create_sheet(&self, spreadsheet_id: &str, title: &str) -> Result<Option<i64>> {
        let token = self.auth.get_access_token().await?;

        let body = json!({
            "requests": [
                {"addSheet": {"properties": {"title": title}}}
            ]
        });

        let response = self
            .http
            .post(format!(
                "{}/spreadsheets/{}:batchUpdate",
                self.sheets_base, spreadsheet_id
            ))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;

        if response.status().as_u16() == 400 {
            debug!(spreadsheet_id, title, "sheet already exists");
            return Ok(None);
        }
        let response = check_response(response).await?;

        let batch: BatchUpdateResponse = response.json().await?;
        Ok(batch
            .replies
            .into_iter()
            .find_map(|reply| reply.add_sheet)
            .and_then(|reply| reply.properties.sheet_id))
    }

    /// List all files in a Drive folder, following pagination.
    pub async fn list_files(&self, folder_id: &str) -> Result<Vec<DriveFile>> {
        let token = self.auth.get_access_token().await?;
        let query = format!("'{}' in parents", folder_id.replace('\'', "\\'"));
        let mut all_files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(format!("{}/files", self.drive_base))
                .bearer_auth(&token)
                .query(&[
                    ("q", query.as_str()),
                    ("pageSize", "100"),
                    ("fields", "nextPageToken, files(id, name, mimeType)"),
                ]);

            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request.send().await?;
            let response = check_response(response).await?;

            let list_response: FileListResponse = response.json().await?;
            all_files.extend(list_response.files);

            match list_response.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(all_files)
    }
}

/// Map a non-success response to [`SheetsError::ApiError`], using Google's
/// error envelope when the body carries one.
async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_body = response.text().await.unwrap_or_default();
    error!(status = status.as_u16(), body = %error_body, "API request failed");
    if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&error_body) {
        return Err(SheetsError::ApiError {
            status: api_error.error.code,
            message: api_error.error.message,
        });
    }
    Err(SheetsError::ApiError {
        status: status.as_u16(),
        message: error_body,
    })
}

#[cfg(test)]
mod tests {
    // Tests are in tests/client_test.rs
}
