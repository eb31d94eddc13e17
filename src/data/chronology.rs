//! Chronological Orderer Module
//! Sorts pivot columns by the wall-clock time their bucket label denotes and
//! rows by ascending date.

use chrono::NaiveTime;
use thiserror::Error;

use crate::data::aggregator::PivotTable;
use crate::data::normalizer::TIME_BUCKET_FORMAT;

#[derive(Error, Debug)]
pub enum ChronologyError {
    #[error("Unrecognized time bucket label {0:?}, expected a HH:MM:SS AM/PM time")]
    BadBucket(String),
}

/// Orders the pivoted grid chronologically.
pub struct Chronology;

impl Chronology {
    /// Reorder columns so buckets ascend by time-of-day rather than
    /// lexically: "12:00:00 PM" sorts after "11:00:00 AM". Rows are sorted
    /// by ascending date.
    pub fn order(table: PivotTable) -> Result<PivotTable, ChronologyError> {
        let mut col_order: Vec<(NaiveTime, usize)> = table
            .buckets
            .iter()
            .enumerate()
            .map(|(index, bucket)| {
                NaiveTime::parse_from_str(bucket, TIME_BUCKET_FORMAT)
                    .map(|time| (time, index))
                    .map_err(|_| ChronologyError::BadBucket(bucket.clone()))
            })
            .collect::<Result<_, _>>()?;
        col_order.sort_by_key(|(time, _)| *time);

        let mut row_order: Vec<usize> = (0..table.dates.len()).collect();
        row_order.sort_by_key(|&row| table.dates[row]);

        let buckets = col_order
            .iter()
            .map(|(_, col)| table.buckets[*col].clone())
            .collect();
        let dates = row_order.iter().map(|&row| table.dates[row]).collect();
        let values = row_order
            .iter()
            .map(|&row| {
                col_order
                    .iter()
                    .map(|(_, col)| table.values[row][*col])
                    .collect()
            })
            .collect();

        Ok(PivotTable {
            dates,
            buckets,
            values,
        })
    }
}
