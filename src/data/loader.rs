//! Tabular Loader Module
//! Reads CSV and Excel interval reports into a Polars DataFrame.

use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::*;
use std::borrow::Cow;
use std::collections::HashSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// How many leading spreadsheet rows are scanned for a header row.
const HEADER_SCAN_ROWS: usize = 5;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error(
        "Unsupported file type: {extension:?} for {}. Supported types: .csv, .xls, .xlsx",
        path.display()
    )]
    UnsupportedExtension { path: PathBuf, extension: String },
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Failed to open workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        source: calamine::Error,
    },
    #[error("Workbook has no sheets: {}", .0.display())]
    NoSheets(PathBuf),
    #[error("No data loaded")]
    NoData,
}

/// Closed set of supported input formats, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Spreadsheet,
}

impl FileFormat {
    /// Pure dispatch on the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, LoaderError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" | "xls" => Ok(FileFormat::Spreadsheet),
            _ => Err(LoaderError::UnsupportedExtension {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

/// Handles report loading with Polars as the in-memory table format.
pub struct DataLoader {
    df: Option<DataFrame>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { df: None }
    }

    /// Load a report, dispatching on the file extension.
    pub fn load(&mut self, path: &Path) -> Result<&DataFrame, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::FileNotFound(path.to_path_buf()));
        }

        let df = match FileFormat::from_path(path)? {
            FileFormat::Csv => Self::read_csv(path)?,
            FileFormat::Spreadsheet => Self::read_spreadsheet(path)?,
        };
        debug!(rows = df.height(), cols = df.width(), "loaded input table");

        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Read a CSV file, decoding UTF-8 (optional BOM) with a Latin-1 fallback.
    fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        let bytes = std::fs::read(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = decode_text(&bytes);

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .into_reader_with_file_handle(Cursor::new(text.into_owned().into_bytes()))
            .finish()?;
        Ok(df)
    }

    /// Read the first sheet of an Excel workbook, auto-detecting the header row.
    fn read_spreadsheet(path: &Path) -> Result<DataFrame, LoaderError> {
        let mut workbook = open_workbook_auto(path).map_err(|source| LoaderError::Workbook {
            path: path.to_path_buf(),
            source,
        })?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| LoaderError::NoSheets(path.to_path_buf()))?
            .map_err(|source| LoaderError::Workbook {
                path: path.to_path_buf(),
                source,
            })?;

        let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
        let header_row = detect_header_row(&rows).unwrap_or(0);
        debug!(header_row, "selected spreadsheet header row");

        Ok(build_frame(&rows, header_row)?)
    }

    /// Get list of column names from the loaded table.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the loaded table.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded table.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }
}

/// Decode raw CSV bytes. UTF-8 first (stripping a BOM if present); anything
/// that is not valid UTF-8 is re-read as Latin-1, which accepts every byte.
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text.strip_prefix('\u{feff}').unwrap_or(text)),
        Err(_) => encoding_rs::mem::decode_latin1(bytes),
    }
}

/// Find the header row within the first [`HEADER_SCAN_ROWS`] rows: the first
/// row with any non-empty cell and at least one string cell containing an
/// internal space. Real headers are multi-word phrases like
/// "Interval Start Time"; pure data rows of dates and numbers do not match.
/// Known to misfire on single-word headers, kept as-is for compatibility
/// with the report exports this tool targets.
fn detect_header_row(rows: &[Vec<Data>]) -> Option<usize> {
    rows.iter().take(HEADER_SCAN_ROWS).position(|row| {
        let has_content = row.iter().any(|cell| !matches!(cell, Data::Empty));
        let has_phrase = row
            .iter()
            .any(|cell| matches!(cell, Data::String(s) if s.contains(' ')));
        has_content && has_phrase
    })
}

/// Render a cell to its string form; `None` marks an empty cell.
fn render_cell(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.is_finite() {
                Some(format!("{}", *f as i64))
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}

/// Build a string-typed DataFrame from spreadsheet rows, taking column names
/// from `header_row`. When the header sits below row 0, fully-empty rows are
/// dropped to account for blank spacer rows above it.
fn build_frame(rows: &[Vec<Data>], header_row: usize) -> PolarsResult<DataFrame> {
    let header = rows.get(header_row).map(|r| r.as_slice()).unwrap_or(&[]);
    let width = header.len();

    let mut seen = HashSet::new();
    let names: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = render_cell(cell).unwrap_or_else(|| format!("column_{i}"));
            if seen.insert(name.clone()) {
                name
            } else {
                format!("{name}_{i}")
            }
        })
        .collect();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    for row in rows.iter().skip(header_row + 1) {
        let rendered: Vec<Option<String>> = (0..width)
            .map(|c| row.get(c).and_then(render_cell))
            .collect();
        if header_row > 0 && rendered.iter().all(|c| c.is_none()) {
            continue;
        }
        for (column, value) in cells.iter_mut().zip(rendered) {
            column.push(value);
        }
    }

    let columns: Vec<Column> = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name.as_str().into(), values))
        .collect();
    DataFrame::new(columns)
}
