//! Progress Sink Module
//! Lifecycle notifications for display. The pipeline produces correct output
//! with zero registered sinks; delivery is never a correctness dependency.

use std::path::Path;

/// Receives pipeline lifecycle events. Every method defaults to a no-op so
/// implementors only override what they display.
pub trait ProgressSink {
    fn on_file_selected(&self, _path: &Path) {}
    fn on_data_loaded(&self, _row_count: usize, _columns: &[String]) {}
    fn on_processing_started(&self) {}
    fn on_processing_complete(&self, _date_count: usize, _bucket_count: usize) {}
    fn on_file_saved(&self, _path: &Path) {}
    fn on_error(&self, _message: &str) {}
}

/// Prints status lines to the console.
pub struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn on_file_selected(&self, path: &Path) {
        println!("Selected file: {}", path.display());
    }

    fn on_data_loaded(&self, row_count: usize, columns: &[String]) {
        println!("Loaded {} rows, {} columns", row_count, columns.len());
    }

    fn on_processing_started(&self) {
        println!("Processing call rate data...");
    }

    fn on_processing_complete(&self, date_count: usize, bucket_count: usize) {
        println!(
            "Processing complete: {date_count} unique dates, {bucket_count} time intervals"
        );
    }

    fn on_file_saved(&self, path: &Path) {
        println!("Results saved to: {}", path.display());
    }

    fn on_error(&self, message: &str) {
        eprintln!("Error: {message}");
    }
}

/// Discards every event.
pub struct SilentSink;

impl ProgressSink for SilentSink {}
