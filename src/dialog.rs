//! File Dialog Module
//! Thin rfd glue for choosing input and output paths when the CLI omits them.

use std::path::PathBuf;

/// Prompt for an input report. Only the first sheet of Excel files is read.
pub fn pick_input_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select the input file (csv or Excel)")
        .add_filter("Call reports", &["csv", "xlsx", "xls"])
        .add_filter("All files", &["*"])
        .pick_file()
}

/// Prompt for the output CSV location.
pub fn pick_output_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select location to save output csv")
        .add_filter("CSV files", &["csv"])
        .set_file_name("output.csv")
        .save_file()
}
