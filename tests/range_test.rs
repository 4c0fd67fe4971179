//! Tests for spreadsheet ID extraction and A1 range construction.

use gsheet_frame::range::{escape_sheet_name, DEFAULT_CELLS};
use gsheet_frame::{extract_spreadsheet_id, SheetRange};

#[test]
fn test_extract_from_edit_url() {
    let url = "https://docs.google.com/spreadsheets/d/1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms/edit#gid=0";
    assert_eq!(
        extract_spreadsheet_id(url).unwrap(),
        "1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms"
    );
}

#[test]
fn test_extract_from_share_url() {
    let url = "https://docs.google.com/spreadsheets/d/1abc123XYZ/edit?usp=sharing";
    assert_eq!(extract_spreadsheet_id(url).unwrap(), "1abc123XYZ");
}

#[test]
fn test_extract_from_user_scoped_url() {
    let url = "https://docs.google.com/spreadsheets/u/1/d/1abc123XYZ/edit";
    assert_eq!(extract_spreadsheet_id(url).unwrap(), "1abc123XYZ");
}

#[test]
fn test_extract_raw_id_with_whitespace() {
    assert_eq!(extract_spreadsheet_id("  1abc123XYZ  ").unwrap(), "1abc123XYZ");
}

#[test]
fn test_extract_rejects_foreign_urls() {
    assert!(extract_spreadsheet_id("https://drive.google.com/file/d/1abc/view").is_err());
    assert!(extract_spreadsheet_id("").is_err());
}

#[test]
fn test_default_range_spans_full_sheet() {
    let range = SheetRange::new("data");
    assert_eq!(range.cells(), DEFAULT_CELLS);
    assert_eq!(range.to_string(), "'data'!A1:ZZ900000");
}

#[test]
fn test_explicit_cells_preserved() {
    let range = SheetRange::with_cells("data", "B2:D10");
    assert_eq!(range.to_string(), "'data'!B2:D10");
    assert_eq!(range.sheet(), "data");
}

#[test]
fn test_sheet_name_with_spaces_and_quotes() {
    let range = SheetRange::new("Q1 'final'");
    assert_eq!(range.to_string(), "'Q1 ''final'''!A1:ZZ900000");

    assert_eq!(escape_sheet_name("plain"), "'plain'");
    assert_eq!(escape_sheet_name("'pre-quoted'"), "'pre-quoted'");
}
