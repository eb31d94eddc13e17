//! CallGrid - Call-Center Interval Report Pivot Tool
//!
//! Reshapes interval-based call activity exports (CSV or Excel) into a
//! date x time-of-day grid of summed call counts, written as CSV.

pub mod app;
pub mod data;
pub mod dialog;
pub mod progress;
