//! Data module - report loading, normalization, aggregation and ordering

mod aggregator;
mod chronology;
mod loader;
mod normalizer;
mod writer;

pub use aggregator::{Aggregator, BucketSums, PivotTable};
pub use chronology::{Chronology, ChronologyError};
pub use loader::{DataLoader, FileFormat, LoaderError};
pub use normalizer::{
    NormalizedRow, NormalizerError, RowNormalizer, CALLS_COLUMN, END_COLUMN, START_COLUMN,
    TIME_BUCKET_FORMAT,
};
pub use writer::{OutputWriter, WriterError, DATE_LABEL_FORMAT};
