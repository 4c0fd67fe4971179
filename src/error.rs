//! Error types for the gsheet-frame crate.

use thiserror::Error;

/// Errors that can occur when interacting with Google Sheets and Drive.
#[derive(Error, Debug)]
pub enum SheetsError {
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Failed to read credentials file: {0}")]
    CredentialsFileError(#[from] std::io::Error),

    #[error("Failed to parse credentials JSON: {0}")]
    CredentialsParseError(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid spreadsheet URL or ID: {0}")]
    InvalidUrlOrId(String),

    #[error("Empty data in range: {0}")]
    EmptyData(String),

    #[error("Header row {row} is out of bounds ({rows} rows returned)")]
    HeaderOutOfBounds { row: usize, rows: usize },

    #[error("JWT encoding error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Failed to start blocking runtime: {0}")]
    RuntimeError(std::io::Error),

    #[error("Token refresh failed: {0}")]
    TokenRefreshError(String),
}

/// Result type alias for SheetsError.
pub type Result<T> = std::result::Result<T, SheetsError>;
