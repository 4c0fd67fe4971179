//! Blocking variant of the client, for callers without an async runtime.
//!
//! Owns a current-thread tokio runtime and drives the async client on it,
//! one call at a time. Must not be used from inside an async context.

use std::path::Path;

use tokio::runtime::{Builder, Runtime};

use crate::auth::Authenticator;
use crate::client::{DownloadOptions, UploadOptions};
use crate::error::{Result, SheetsError};
use crate::frame::Frame;
use crate::models::{DriveFile, UpdateValuesResponse};
use crate::range::SheetRange;

/// Blocking counterpart of [`crate::SheetsClient`].
pub struct SheetsClient {
    inner: crate::client::SheetsClient,
    runtime: Runtime,
}

impl SheetsClient {
    /// Create a blocking client from an authenticator.
    pub fn new(auth: Authenticator) -> Result<Self> {
        Self::wrap(crate::client::SheetsClient::new(auth))
    }

    /// Create a blocking client from credential file paths; see
    /// [`Authenticator::from_files`] for how the mode is chosen.
    pub fn from_files<P: AsRef<Path>>(
        credentials_path: P,
        token_path: Option<P>,
    ) -> Result<Self> {
        let auth = Authenticator::from_files(credentials_path, token_path)?;
        Self::new(auth)
    }

    /// Create a blocking client against explicit base URLs.
    pub fn with_base_urls(auth: Authenticator, sheets_base: &str, drive_base: &str) -> Result<Self> {
        Self::wrap(crate::client::SheetsClient::with_base_urls(
            auth,
            sheets_base,
            drive_base,
        ))
    }

    fn wrap(inner: crate::client::SheetsClient) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(SheetsError::RuntimeError)?;
        Ok(Self { inner, runtime })
    }

    pub fn download(&self, spreadsheet_id: &str, range: &SheetRange) -> Result<Frame> {
        self.runtime.block_on(self.inner.download(spreadsheet_id, range))
    }

    pub fn download_with(
        &self,
        spreadsheet_id: &str,
        range: &SheetRange,
        options: &DownloadOptions,
    ) -> Result<Frame> {
        self.runtime
            .block_on(self.inner.download_with(spreadsheet_id, range, options))
    }

    pub fn upload(
        &self,
        frame: &Frame,
        spreadsheet_id: &str,
        range: &SheetRange,
    ) -> Result<UpdateValuesResponse> {
        self.runtime
            .block_on(self.inner.upload(frame, spreadsheet_id, range))
    }

    pub fn upload_with(
        &self,
        frame: &Frame,
        spreadsheet_id: &str,
        range: &SheetRange,
        options: &UploadOptions,
    ) -> Result<UpdateValuesResponse> {
        self.runtime
            .block_on(self.inner.upload_with(frame, spreadsheet_id, range, options))
    }

    pub fn sheet_names(&self, spreadsheet_id: &str) -> Result<Vec<String>> {
        self.runtime.block_on(self.inner.sheet_names(spreadsheet_id))
    }

    pub fn create_sheet(&self, spreadsheet_id: &str, title: &str) -> Result<Option<i64>> {
        self.runtime
            .block_on(self.inner.create_sheet(spreadsheet_id, title))
    }

    pub fn list_files(&self, folder_id: &str) -> Result<Vec<DriveFile>> {
        self.runtime.block_on(self.inner.list_files(folder_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ServiceAccountCredentials;

    #[test]
    fn test_blocking_client_construction() {
        let auth = Authenticator::service_account(ServiceAccountCredentials {
            client_email: "test@project.iam.gserviceaccount.com".to_string(),
            private_key: "key".to_string(),
            token_uri: None,
        });

        assert!(SheetsClient::new(auth).is_ok());
    }

    #[test]
    fn test_from_files_missing_credentials() {
        let result = SheetsClient::from_files("/nonexistent/credentials.json", None);
        assert!(result.is_err());
    }
}
