//! Row Normalizer Module
//! Turns raw report rows into (date, time bucket, calls) records.

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use thiserror::Error;

/// Required input columns, matched by name (case-sensitive).
pub const START_COLUMN: &str = "Interval Start Time";
pub const END_COLUMN: &str = "Interval End Time";
pub const CALLS_COLUMN: &str = "Calls Presented";

/// Pivot column labels: zero-padded 12-hour clock, e.g. "08:00:00 AM".
pub const TIME_BUCKET_FORMAT: &str = "%I:%M:%S %p";

/// Accepted timestamp renderings, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%y %I:%M:%S %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%y %I:%M %p",
    "%m/%d/%Y %I:%M %p",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %H:%M",
];

/// Date-only fallbacks, interpreted as midnight.
const DATE_FORMATS: &[&str] = &["%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d"];

#[derive(Error, Debug)]
pub enum NormalizerError {
    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error(
        "Error parsing datetime value {value:?} in column '{column}'. Make sure your data has \
         'Interval Start Time' and 'Interval End Time' columns with interval timestamps"
    )]
    BadTimestamp {
        column: &'static str,
        value: String,
    },
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// One interval observation with derived keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    /// Calendar date of the interval start (timezone-naive).
    pub date: NaiveDate,
    /// Interval start time-of-day rendered with [`TIME_BUCKET_FORMAT`].
    pub time_bucket: String,
    /// Call count for the interval, never null.
    pub calls: i64,
}

/// Handles cleanup and key derivation on the raw table.
pub struct RowNormalizer;

impl RowNormalizer {
    /// Normalize the raw table into one record per usable row.
    ///
    /// Rows whose first column is null or blank are dropped (decorative blank
    /// rows left by upstream report exports). A row with an unparseable
    /// timestamp aborts the whole run rather than being skipped.
    pub fn normalize(df: &DataFrame) -> Result<Vec<NormalizedRow>, NormalizerError> {
        for name in [START_COLUMN, END_COLUMN, CALLS_COLUMN] {
            if df.column(name).is_err() {
                return Err(NormalizerError::MissingColumn(name));
            }
        }
        let Some(first) = df.get_columns().first() else {
            return Ok(Vec::new());
        };

        let start = df.column(START_COLUMN)?;
        let end = df.column(END_COLUMN)?;
        let calls = df.column(CALLS_COLUMN)?;

        let mut rows = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            if cell_text(first, i).is_none() {
                continue;
            }

            let start_dt = parse_timestamp_cell(cell_text(start, i), START_COLUMN)?;
            // The end timestamp is validated even though only the start
            // contributes derived keys.
            parse_timestamp_cell(cell_text(end, i), END_COLUMN)?;

            rows.push(NormalizedRow {
                date: start_dt.date(),
                time_bucket: start_dt.format(TIME_BUCKET_FORMAT).to_string(),
                calls: coerce_calls(cell_text(calls, i).as_deref()),
            });
        }
        Ok(rows)
    }
}

/// Render a cell to trimmed text; `None` for null or blank cells.
fn cell_text(column: &Column, index: usize) -> Option<String> {
    let value = column.get(index).ok()?;
    if value.is_null() {
        return None;
    }
    let rendered = value.to_string();
    let trimmed = rendered.trim_matches('"').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_timestamp_cell(
    raw: Option<String>,
    column: &'static str,
) -> Result<NaiveDateTime, NormalizerError> {
    let raw = raw.ok_or(NormalizerError::BadTimestamp {
        column,
        value: String::new(),
    })?;
    parse_timestamp(&raw).ok_or(NormalizerError::BadTimestamp { column, value: raw })
}

/// Parse a human-readable timestamp against the accepted format list.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Coerce a call count to an integer. Non-numeric, empty and null values
/// become 0; fractional values truncate. Negative values pass through
/// unclamped: only unparseable cells are zeroed, matching the source
/// reports' observable behavior.
fn coerce_calls(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .map(|v| v.trunc() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new(
                "CSQ Name".into(),
                vec![
                    Some("TEST QUEUE"),
                    Some("TEST QUEUE"),
                    None,
                    Some("TEST QUEUE"),
                ],
            ),
            Column::new(
                START_COLUMN.into(),
                vec![
                    Some("10/14/25 8:00:00 AM"),
                    Some("10/14/25 8:00:00 AM"),
                    None,
                    Some("10/15/25 1:00:00 PM"),
                ],
            ),
            Column::new(
                END_COLUMN.into(),
                vec![
                    Some("10/14/25 9:00:00 AM"),
                    Some("10/14/25 9:00:00 AM"),
                    None,
                    Some("10/15/25 2:00:00 PM"),
                ],
            ),
            Column::new(
                CALLS_COLUMN.into(),
                vec![Some("41"), Some("4"), None, Some("30")],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn derives_date_and_zero_padded_bucket() {
        let rows = RowNormalizer::normalize(&sample_frame()).unwrap();
        assert_eq!(rows.len(), 3, "blank sentinel row must be dropped");

        let first = &rows[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2025, 10, 14).unwrap());
        assert_eq!(first.time_bucket, "08:00:00 AM");
        assert_eq!(first.calls, 41);

        let last = &rows[2];
        assert_eq!(last.date, NaiveDate::from_ymd_opt(2025, 10, 15).unwrap());
        assert_eq!(last.time_bucket, "01:00:00 PM");
    }

    #[test]
    fn missing_column_named_in_error() {
        let df = DataFrame::new(vec![
            Column::new("CSQ Name".into(), vec!["TEST"]),
            Column::new(START_COLUMN.into(), vec!["10/14/25 8:00:00 AM"]),
            Column::new(CALLS_COLUMN.into(), vec!["41"]),
        ])
        .unwrap();

        let err = RowNormalizer::normalize(&df).unwrap_err();
        assert!(matches!(
            err,
            NormalizerError::MissingColumn("Interval End Time")
        ));
        assert!(err.to_string().contains("Interval End Time"));
    }

    #[test]
    fn bad_timestamp_is_fatal_and_names_the_value() {
        let df = DataFrame::new(vec![
            Column::new("CSQ Name".into(), vec!["TEST"]),
            Column::new(START_COLUMN.into(), vec!["not a timestamp"]),
            Column::new(END_COLUMN.into(), vec!["10/14/25 9:00:00 AM"]),
            Column::new(CALLS_COLUMN.into(), vec!["41"]),
        ])
        .unwrap();

        let err = RowNormalizer::normalize(&df).unwrap_err();
        assert!(err.to_string().contains("not a timestamp"));
        assert!(err.to_string().contains(START_COLUMN));
    }

    #[test]
    fn call_count_coercion_zeroes_only_unparseable_cells() {
        assert_eq!(coerce_calls(Some("41")), 41);
        assert_eq!(coerce_calls(Some("invalid")), 0);
        assert_eq!(coerce_calls(Some("")), 0);
        assert_eq!(coerce_calls(None), 0);
        assert_eq!(coerce_calls(Some("12.9")), 12);
        // Negative counts pass through unclamped.
        assert_eq!(coerce_calls(Some("-3")), -3);
    }

    #[test]
    fn numeric_typed_calls_column_is_accepted() {
        let df = DataFrame::new(vec![
            Column::new("CSQ Name".into(), vec!["TEST", "TEST"]),
            Column::new(
                START_COLUMN.into(),
                vec!["10/14/25 8:00:00 AM", "10/14/25 9:00:00 AM"],
            ),
            Column::new(
                END_COLUMN.into(),
                vec!["10/14/25 9:00:00 AM", "10/14/25 10:00:00 AM"],
            ),
            Column::new(CALLS_COLUMN.into(), vec![41i64, 18]),
        ])
        .unwrap();

        let rows = RowNormalizer::normalize(&df).unwrap();
        assert_eq!(rows[0].calls, 41);
        assert_eq!(rows[1].calls, 18);
    }

    #[test]
    fn accepts_four_digit_years_and_iso_timestamps() {
        assert!(parse_timestamp("10/14/2025 8:00:00 AM").is_some());
        assert!(parse_timestamp("2025-10-14 08:00:00").is_some());
        assert!(parse_timestamp("2025-10-14T08:00:00").is_some());
        assert!(parse_timestamp("10/14/25").is_some());
        assert!(parse_timestamp("nonsense").is_none());
    }
}
