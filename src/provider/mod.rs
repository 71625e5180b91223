//! Sources of reference-range records.

pub mod csv_file;

pub use csv_file::{parse_metrics_csv, CsvMetricProvider};

use std::path::PathBuf;

use thiserror::Error;

use crate::models::MetricRecord;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to read metrics file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed metrics CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid number in row {row}, column {field}: {value:?}")]
    InvalidNumber {
        row: usize,
        field: &'static str,
        value: String,
    },
}

/// Anything that can produce the full metric table in one call.
pub trait MetricProvider: Send + Sync {
    fn load_metrics(&self) -> Result<Vec<MetricRecord>, ProviderError>;
}

/// In-memory provider for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticMetricProvider(pub Vec<MetricRecord>);

impl MetricProvider for StaticMetricProvider {
    fn load_metrics(&self) -> Result<Vec<MetricRecord>, ProviderError> {
        Ok(self.0.clone())
    }
}
