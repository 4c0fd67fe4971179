//! In-memory tabular data exchanged with a spreadsheet range.
//!
//! A [`Frame`] is the boundary representation: ordered column names plus
//! row-major cells. Conversion to and from the API's JSON value grid is
//! pure and lives here, so the client only moves bytes.

use serde_json::Value;

use crate::error::{Result, SheetsError};

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    /// Coerce a JSON value from the API into a cell.
    ///
    /// With `FORMATTED_VALUE` rendering everything arrives as strings; with
    /// `UNFORMATTED_VALUE` numbers and booleans keep their JSON type.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Cell::Empty,
            Value::Bool(b) => Cell::Bool(b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => Cell::Number(f),
                None => Cell::Text(n.to_string()),
            },
            Value::String(s) if s.is_empty() => Cell::Empty,
            Value::String(s) => Cell::Text(s),
            other => Cell::Text(other.to_string()),
        }
    }

    /// Convert a cell into the JSON value written to the API.
    ///
    /// Empty cells and non-finite numbers become empty strings; the API has
    /// no representation for either.
    pub fn to_json(&self) -> Value {
        match self {
            Cell::Empty => Value::String(String::new()),
            Cell::Bool(b) => Value::Bool(*b),
            Cell::Number(f) => match serde_json::Number::from_f64(*f) {
                Some(n) => Value::Number(n),
                None => Value::String(String::new()),
            },
            Cell::Text(s) => Value::String(s.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// The text content, if this is a text cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The numeric content, if this is a number cell.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(f) => Some(*f),
            _ => None,
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(f: f64) -> Self {
        Cell::Number(f)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Number(i as f64)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

/// Where column names come from when reading a range.
#[derive(Debug, Clone, PartialEq)]
pub enum Header {
    /// Use this row (0-based within the returned range) as column names;
    /// data starts on the next row.
    Row(usize),
    /// Use these names; every returned row is data.
    Names(Vec<String>),
    /// No header anywhere; columns are named by position ("0", "1", ...).
    None,
}

impl Default for Header {
    /// Header in the first returned row, the common case.
    fn default() -> Self {
        Header::Row(0)
    }
}

/// Ordered columns plus row-major cell data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Frame {
    /// Create an empty frame with the given column names.
    pub fn new<S: Into<String>>(columns: Vec<S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row, padding with [`Cell::Empty`] or truncating to the
    /// frame's width.
    pub fn push_row<C: Into<Cell>>(&mut self, row: Vec<C>) {
        let mut row: Vec<Cell> = row.into_iter().map(Into::into).collect();
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (row, column), if in bounds.
    pub fn get(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// All cells of a named column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().filter_map(|row| row.get(idx)).collect())
    }

    /// Build a frame from the value grid returned by the API.
    ///
    /// Rows are padded or truncated to the header width so every row has
    /// the same shape.
    pub fn from_values(values: Vec<Vec<Value>>, header: &Header) -> Result<Self> {
        if values.is_empty() {
            return Err(SheetsError::EmptyData("no values returned".to_string()));
        }

        let (columns, data) = match header {
            Header::Row(row) => {
                if *row >= values.len() {
                    return Err(SheetsError::HeaderOutOfBounds {
                        row: *row,
                        rows: values.len(),
                    });
                }
                let mut iter = values.into_iter();
                let columns: Vec<String> = iter
                    .by_ref()
                    .nth(*row)
                    .unwrap_or_default()
                    .into_iter()
                    .map(stringify)
                    .collect();
                (columns, iter.collect::<Vec<_>>())
            }
            Header::Names(names) => (names.clone(), values),
            Header::None => {
                let width = values.iter().map(Vec::len).max().unwrap_or(0);
                let columns = (0..width).map(|i| i.to_string()).collect();
                (columns, values)
            }
        };

        let width = columns.len();
        let rows = data
            .into_iter()
            .map(|row| {
                let mut row: Vec<Cell> = row.into_iter().take(width).map(Cell::from_json).collect();
                row.resize(width, Cell::Empty);
                row
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Convert to the value grid sent to the API. The header row comes
    /// first unless `write_header` is false.
    pub fn to_values(&self, write_header: bool) -> Vec<Vec<Value>> {
        let mut values = Vec::with_capacity(self.rows.len() + 1);
        if write_header {
            values.push(
                self.columns
                    .iter()
                    .map(|c| Value::String(c.clone()))
                    .collect(),
            );
        }
        for row in &self.rows {
            values.push(row.iter().map(Cell::to_json).collect());
        }
        values
    }
}

fn stringify(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
