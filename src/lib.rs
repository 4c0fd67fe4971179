//! gsheet-frame - move tabular data between Google Sheets and an in-memory
//! frame.
//!
//! This library provides:
//! - Credential management for service-account and authorized-user OAuth2
//!   files, with refresh and persistence
//! - An async [`SheetsClient`] with `download`/`upload` over A1 ranges,
//!   sheet listing/creation, and Drive folder listing
//! - A [`blocking`] facade for synchronous callers
//! - A [`ClientCache`] keyed by credential path for fan-out workloads
//!
//! # Example
//!
//! ```no_run
//! use gsheet_frame::{Authenticator, SheetRange, SheetsClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let auth = Authenticator::from_files("credentials.json", Some("token.json"))?;
//!     let client = SheetsClient::new(auth);
//!
//!     let range = SheetRange::new("Sheet1");
//!     let frame = client.download("spreadsheet-id", &range).await?;
//!     println!("{} rows x {} columns", frame.num_rows(), frame.num_columns());
//!
//!     client.upload(&frame, "spreadsheet-id", &range).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod blocking;
pub mod cache;
pub mod client;
pub mod error;
pub mod ext;
pub mod frame;
pub mod models;
pub mod range;

// Re-exports for convenience
pub use auth::Authenticator;
pub use cache::ClientCache;
pub use client::{
    DownloadOptions, SheetsClient, UploadOptions, ValueInputOption, ValueRenderOption,
};
pub use error::{Result, SheetsError};
pub use ext::{from_gsheet, to_gsheet, GsheetExt};
pub use frame::{Cell, Frame, Header};
pub use models::DriveFile;
pub use range::{extract_spreadsheet_id, SheetRange};
