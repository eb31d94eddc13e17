//! Aggregator Module
//! Groups normalized rows by (date, time bucket) and pivots them into a
//! dense date x time-of-day grid.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use crate::data::normalizer::NormalizedRow;

/// Summed call counts keyed by (date, time bucket).
pub type BucketSums = BTreeMap<(NaiveDate, String), i64>;

/// Dense date x time-bucket grid of summed call counts.
///
/// `values[r][c]` is the sum for `dates[r]` and `buckets[c]`; combinations
/// with no contributing rows hold 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotTable {
    pub dates: Vec<NaiveDate>,
    pub buckets: Vec<String>,
    pub values: Vec<Vec<i64>>,
}

impl PivotTable {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Look up the sum for a (date, bucket) pair.
    pub fn value(&self, date: NaiveDate, bucket: &str) -> Option<i64> {
        let row = self.dates.iter().position(|d| *d == date)?;
        let col = self.buckets.iter().position(|b| b == bucket)?;
        Some(self.values[row][col])
    }
}

/// Handles grouping and pivoting of normalized rows.
pub struct Aggregator;

impl Aggregator {
    /// Single-pass fold summing calls per (date, time bucket). Rows sharing
    /// a key are summed, never overwritten.
    pub fn sum_by_interval(rows: &[NormalizedRow]) -> BucketSums {
        let mut sums = BucketSums::new();
        for row in rows {
            *sums
                .entry((row.date, row.time_bucket.clone()))
                .or_insert(0) += row.calls;
        }
        sums
    }

    /// Pivot grouped sums into a dense grid over the union of observed dates
    /// and buckets, filling absent combinations with 0. Dates come out
    /// ascending; bucket order is left for the chronological orderer.
    pub fn pivot(sums: &BucketSums) -> PivotTable {
        let dates: Vec<NaiveDate> = sums
            .keys()
            .map(|(date, _)| *date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let buckets: Vec<String> = sums
            .keys()
            .map(|(_, bucket)| bucket.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let values = dates
            .iter()
            .map(|date| {
                buckets
                    .iter()
                    .map(|bucket| {
                        sums.get(&(*date, bucket.clone())).copied().unwrap_or(0)
                    })
                    .collect()
            })
            .collect();

        PivotTable {
            dates,
            buckets,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: (i32, u32, u32), bucket: &str, calls: i64) -> NormalizedRow {
        NormalizedRow {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            time_bucket: bucket.to_string(),
            calls,
        }
    }

    #[test]
    fn duplicate_intervals_are_summed() {
        let rows = vec![
            row((2025, 10, 14), "08:00:00 AM", 41),
            row((2025, 10, 14), "08:00:00 AM", 4),
        ];
        let sums = Aggregator::sum_by_interval(&rows);
        assert_eq!(
            sums[&(
                NaiveDate::from_ymd_opt(2025, 10, 14).unwrap(),
                "08:00:00 AM".to_string()
            )],
            45
        );
    }

    #[test]
    fn pivot_fills_missing_combinations_with_zero() {
        let rows = vec![
            row((2025, 10, 14), "08:00:00 AM", 45),
            row((2025, 10, 15), "09:00:00 AM", 30),
        ];
        let table = Aggregator::pivot(&Aggregator::sum_by_interval(&rows));

        assert_eq!(table.dates.len(), 2);
        assert_eq!(table.buckets.len(), 2);
        let d14 = NaiveDate::from_ymd_opt(2025, 10, 14).unwrap();
        let d15 = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();
        assert_eq!(table.value(d14, "08:00:00 AM"), Some(45));
        assert_eq!(table.value(d14, "09:00:00 AM"), Some(0));
        assert_eq!(table.value(d15, "08:00:00 AM"), Some(0));
        assert_eq!(table.value(d15, "09:00:00 AM"), Some(30));
    }

    #[test]
    fn pivot_of_nothing_is_empty() {
        let table = Aggregator::pivot(&BucketSums::new());
        assert!(table.is_empty());
        assert!(table.buckets.is_empty());
    }

    #[test]
    fn aggregation_matches_per_key_sum() {
        let rows = vec![
            row((2025, 10, 14), "08:00:00 AM", 41),
            row((2025, 10, 14), "09:00:00 AM", 18),
            row((2025, 10, 14), "08:00:00 AM", 4),
            row((2025, 10, 15), "08:00:00 AM", 30),
        ];
        let table = Aggregator::pivot(&Aggregator::sum_by_interval(&rows));

        for date in &table.dates {
            for bucket in &table.buckets {
                let expected: i64 = rows
                    .iter()
                    .filter(|r| r.date == *date && r.time_bucket == *bucket)
                    .map(|r| r.calls)
                    .sum();
                assert_eq!(table.value(*date, bucket), Some(expected));
            }
        }
    }
}
