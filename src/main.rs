//! CallGrid - Call-Center Interval Report Pivot Tool
//!
//! CLI entry point: takes input/output paths as arguments or falls back to
//! file dialogs, then runs the pivot pipeline.

use anyhow::{bail, Context, Result};
use callgrid::app::CallRatesApp;
use callgrid::dialog;
use callgrid::progress::ConsoleSink;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "callgrid",
    version,
    about = "Pivot interval call reports into a date x time-of-day CSV"
)]
struct Cli {
    /// Input report (.csv, .xlsx or .xls); prompts with a file dialog when omitted
    input: Option<PathBuf>,

    /// Output CSV path; prompts with a save dialog when omitted
    output: Option<PathBuf>,

    /// Suppress console progress output
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let Some(input) = cli.input.or_else(dialog::pick_input_file) else {
        bail!("no input file selected");
    };
    let Some(output) = cli.output.or_else(dialog::pick_output_file) else {
        bail!("no output location selected");
    };

    let mut app = CallRatesApp::new();
    if !cli.quiet {
        app.add_sink(Box::new(ConsoleSink));
    }

    app.process_file(&input, &output)
        .with_context(|| format!("failed to process {}", input.display()))?;
    Ok(())
}
