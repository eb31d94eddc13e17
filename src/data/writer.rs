//! Output Writer Module
//! Serializes the ordered grid to a UTF-8 CSV file.

use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::data::aggregator::PivotTable;

/// Output date labels use the ISO calendar-date rendering.
pub const DATE_LABEL_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("Failed to create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] PolarsError),
}

/// Writes the ordered result; the index column keeps a blank header label.
pub struct OutputWriter;

impl OutputWriter {
    pub fn write_csv(table: &PivotTable, path: &Path) -> Result<(), WriterError> {
        let mut df = Self::to_dataframe(table)?;

        let file = File::create(path).map_err(|source| WriterError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        CsvWriter::new(file).finish(&mut df)?;
        Ok(())
    }

    /// Render the grid as a DataFrame: blank-named date-label column first,
    /// then one integer column per time bucket in the grid's column order.
    fn to_dataframe(table: &PivotTable) -> Result<DataFrame, WriterError> {
        let labels: Vec<String> = table
            .dates
            .iter()
            .map(|date| date.format(DATE_LABEL_FORMAT).to_string())
            .collect();

        let mut columns = Vec::with_capacity(table.buckets.len() + 1);
        columns.push(Column::new("".into(), labels));
        for (col, bucket) in table.buckets.iter().enumerate() {
            let sums: Vec<i64> = table.values.iter().map(|row| row[col]).collect();
            columns.push(Column::new(bucket.as_str().into(), sums));
        }

        Ok(DataFrame::new(columns)?)
    }
}
