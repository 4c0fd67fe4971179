//! A1 range construction and spreadsheet ID extraction.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Result, SheetsError};

/// Default cell span when none is given: wide and tall enough for any
/// practical sheet.
pub const DEFAULT_CELLS: &str = "A1:ZZ900000";

/// Regex patterns for Google Sheets URLs.
static SPREADSHEET_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://docs\.google\.com/spreadsheets/(?:u/\d+/)?d/([a-zA-Z0-9_-]+)")
        .expect("Invalid spreadsheet URL regex")
});

/// Valid spreadsheet ID pattern (alphanumeric, underscore, hyphen).
static ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("Invalid ID regex"));

/// Extract a spreadsheet ID from a URL or validate a raw ID.
///
/// Supports the following formats:
/// - `https://docs.google.com/spreadsheets/d/<ID>/edit`
/// - `https://docs.google.com/spreadsheets/u/0/d/<ID>`
/// - Raw ID string
///
/// # Examples
///
/// ```
/// use gsheet_frame::range::extract_spreadsheet_id;
///
/// let id = extract_spreadsheet_id("https://docs.google.com/spreadsheets/d/1abc123/edit#gid=0")
///     .unwrap();
/// assert_eq!(id, "1abc123");
///
/// let id = extract_spreadsheet_id("1abc123").unwrap();
/// assert_eq!(id, "1abc123");
/// ```
pub fn extract_spreadsheet_id(url_or_id: &str) -> Result<String> {
    let trimmed = url_or_id.trim();

    if let Some(captures) = SPREADSHEET_URL_REGEX.captures(trimmed) {
        if let Some(id) = captures.get(1) {
            return Ok(id.as_str().to_string());
        }
    }

    if ID_REGEX.is_match(trimmed) && !trimmed.is_empty() {
        return Ok(trimmed.to_string());
    }

    Err(SheetsError::InvalidUrlOrId(url_or_id.to_string()))
}

/// Quote a sheet name for use in an A1 range. Embedded single quotes are
/// doubled; an already-quoted name passes through unchanged.
pub fn escape_sheet_name(sheet_name: &str) -> String {
    if sheet_name.starts_with('\'') && sheet_name.ends_with('\'') && sheet_name.len() >= 2 {
        return sheet_name.to_string();
    }
    format!("'{}'", sheet_name.replace('\'', "''"))
}

/// A (sheet name, cell span) pair, rendered as an A1 range string like
/// `'Sheet1'!A1:C100`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    sheet: String,
    cells: Option<String>,
}

impl SheetRange {
    /// Range over the whole sheet ([`DEFAULT_CELLS`]).
    pub fn new<S: Into<String>>(sheet: S) -> Self {
        Self {
            sheet: sheet.into(),
            cells: None,
        }
    }

    /// Range over an explicit cell span like `A1:C100`.
    pub fn with_cells<S: Into<String>, C: Into<String>>(sheet: S, cells: C) -> Self {
        Self {
            sheet: sheet.into(),
            cells: Some(cells.into()),
        }
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn cells(&self) -> &str {
        self.cells.as_deref().unwrap_or(DEFAULT_CELLS)
    }
}

impl std::fmt::Display for SheetRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}!{}", escape_sheet_name(&self.sheet), self.cells())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_spreadsheet_url() {
        let url = "https://docs.google.com/spreadsheets/d/1abc123XYZ/edit#gid=0";
        assert_eq!(extract_spreadsheet_id(url).unwrap(), "1abc123XYZ");
    }

    #[test]
    fn test_extract_spreadsheet_url_with_user() {
        let url = "https://docs.google.com/spreadsheets/u/0/d/1abc123XYZ/edit";
        assert_eq!(extract_spreadsheet_id(url).unwrap(), "1abc123XYZ");
    }

    #[test]
    fn test_extract_raw_id() {
        assert_eq!(extract_spreadsheet_id("1abc123XYZ").unwrap(), "1abc123XYZ");
        assert_eq!(extract_spreadsheet_id("  1abc-12_3  ").unwrap(), "1abc-12_3");
    }

    #[test]
    fn test_extract_invalid() {
        assert!(extract_spreadsheet_id("https://example.com/spreadsheets/d/1abc").is_err());
        assert!(extract_spreadsheet_id("").is_err());
        assert!(extract_spreadsheet_id("has spaces").is_err());
    }

    #[test]
    fn test_escape_sheet_name() {
        assert_eq!(escape_sheet_name("Sheet1"), "'Sheet1'");
        assert_eq!(escape_sheet_name("it's"), "'it''s'");
        assert_eq!(escape_sheet_name("'Quoted'"), "'Quoted'");
    }

    #[test]
    fn test_range_display_default() {
        let range = SheetRange::new("test");
        assert_eq!(range.to_string(), "'test'!A1:ZZ900000");
    }

    #[test]
    fn test_range_display_explicit_cells() {
        let range = SheetRange::with_cells("My Sheet", "A1:C100");
        assert_eq!(range.to_string(), "'My Sheet'!A1:C100");
    }
}
