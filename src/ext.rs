//! `from_gsheet` / `to_gsheet` convenience surface.
//!
//! The pandas original attached these as methods onto an externally-owned
//! type at setup time. Here they are an explicit trait on [`Frame`] plus
//! two free functions; nothing global is mutated.

use crate::client::{DownloadOptions, SheetsClient, UploadOptions};
use crate::error::Result;
use crate::frame::Frame;
use crate::models::UpdateValuesResponse;
use crate::range::SheetRange;

/// Download a range as a [`Frame`]. Equivalent to [`SheetsClient::download`].
pub async fn from_gsheet(
    client: &SheetsClient,
    spreadsheet_id: &str,
    range: &SheetRange,
) -> Result<Frame> {
    client.download(spreadsheet_id, range).await
}

/// Upload a [`Frame`] to a range. Equivalent to [`SheetsClient::upload`].
pub async fn to_gsheet(
    frame: &Frame,
    client: &SheetsClient,
    spreadsheet_id: &str,
    range: &SheetRange,
) -> Result<UpdateValuesResponse> {
    client.upload(frame, spreadsheet_id, range).await
}

/// Spreadsheet convenience methods for frame-like types.
#[allow(async_fn_in_trait)]
pub trait GsheetExt: Sized {
    /// Read a range into this type.
    async fn from_gsheet(
        client: &SheetsClient,
        spreadsheet_id: &str,
        range: &SheetRange,
    ) -> Result<Self>;

    /// Read a range into this type with explicit options.
    async fn from_gsheet_with(
        client: &SheetsClient,
        spreadsheet_id: &str,
        range: &SheetRange,
        options: &DownloadOptions,
    ) -> Result<Self>;

    /// Write this value to a range.
    async fn to_gsheet(
        &self,
        client: &SheetsClient,
        spreadsheet_id: &str,
        range: &SheetRange,
    ) -> Result<UpdateValuesResponse>;

    /// Write this value to a range with explicit options.
    async fn to_gsheet_with(
        &self,
        client: &SheetsClient,
        spreadsheet_id: &str,
        range: &SheetRange,
        options: &UploadOptions,
    ) -> Result<UpdateValuesResponse>;
}

impl GsheetExt for Frame {
    async fn from_gsheet(
        client: &SheetsClient,
        spreadsheet_id: &str,
        range: &SheetRange,
    ) -> Result<Self> {
        client.download(spreadsheet_id, range).await
    }

    async fn from_gsheet_with(
        client: &SheetsClient,
        spreadsheet_id: &str,
        range: &SheetRange,
        options: &DownloadOptions,
    ) -> Result<Self> {
        client.download_with(spreadsheet_id, range, options).await
    }

    async fn to_gsheet(
        &self,
        client: &SheetsClient,
        spreadsheet_id: &str,
        range: &SheetRange,
    ) -> Result<UpdateValuesResponse> {
        client.upload(self, spreadsheet_id, range).await
    }

    async fn to_gsheet_with(
        &self,
        client: &SheetsClient,
        spreadsheet_id: &str,
        range: &SheetRange,
        options: &UploadOptions,
    ) -> Result<UpdateValuesResponse> {
        client.upload_with(self, spreadsheet_id, range, options).await
    }
}
