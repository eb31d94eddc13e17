//! Application Orchestrator
//! Runs the load -> normalize -> aggregate -> order -> save pipeline and
//! notifies progress sinks at each lifecycle point.

use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::data::{
    Aggregator, Chronology, ChronologyError, DataLoader, LoaderError, NormalizerError,
    OutputWriter, PivotTable, RowNormalizer, WriterError,
};
use crate::progress::ProgressSink;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Normalize(#[from] NormalizerError),
    #[error(transparent)]
    Order(#[from] ChronologyError),
    #[error(transparent)]
    Write(#[from] WriterError),
}

/// Counts from a completed run.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub rows_loaded: usize,
    pub date_count: usize,
    pub bucket_count: usize,
}

/// Orchestrates the pipeline for one input file per run; no state is shared
/// between runs beyond the registered sinks.
pub struct CallRatesApp {
    sinks: Vec<Box<dyn ProgressSink>>,
}

impl Default for CallRatesApp {
    fn default() -> Self {
        Self::new()
    }
}

impl CallRatesApp {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add_sink(&mut self, sink: Box<dyn ProgressSink>) {
        self.sinks.push(sink);
    }

    fn notify(&self, event: impl Fn(&dyn ProgressSink)) {
        for sink in &self.sinks {
            event(sink.as_ref());
        }
    }

    /// Run the full pipeline: read `input`, pivot it, write CSV to `output`.
    pub fn process_file(&self, input: &Path, output: &Path) -> Result<RunSummary, PipelineError> {
        self.notify(|sink| sink.on_file_selected(input));

        let result = self.run_pipeline(input, output);
        if let Err(error) = &result {
            let message = error.to_string();
            self.notify(|sink| sink.on_error(&message));
        }
        result
    }

    /// Produce the ordered pivot without writing it out.
    pub fn build_pivot(&self, input: &Path) -> Result<(PivotTable, usize), PipelineError> {
        let mut loader = DataLoader::new();
        loader.load(input)?;
        let row_count = loader.get_row_count();
        let columns = loader.get_columns();
        self.notify(|sink| sink.on_data_loaded(row_count, &columns));

        self.notify(|sink| sink.on_processing_started());
        let df = loader.get_dataframe().ok_or(LoaderError::NoData)?;
        let rows = RowNormalizer::normalize(df)?;
        debug!(normalized = rows.len(), "normalized usable rows");

        let sums = Aggregator::sum_by_interval(&rows);
        let table = Chronology::order(Aggregator::pivot(&sums))?;
        Ok((table, row_count))
    }

    fn run_pipeline(&self, input: &Path, output: &Path) -> Result<RunSummary, PipelineError> {
        let (table, rows_loaded) = self.build_pivot(input)?;
        self.notify(|sink| sink.on_processing_complete(table.dates.len(), table.buckets.len()));

        OutputWriter::write_csv(&table, output)?;
        self.notify(|sink| sink.on_file_saved(output));

        Ok(RunSummary {
            rows_loaded,
            date_count: table.dates.len(),
            bucket_count: table.buckets.len(),
        })
    }
}
