//! Error types for the reporting engine and its loaders

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    /// A filter option carried a value the engine does not understand.
    /// This is the only failure the classification core raises itself.
    #[error("Invalid filter value for '{field}': {value}")]
    InvalidFilter { field: &'static str, value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Region table row {row}: {reason}")]
    RegionTable { row: usize, reason: String },
}

impl ReportError {
    pub fn invalid_filter(field: &'static str, value: impl ToString) -> Self {
        ReportError::InvalidFilter {
            field,
            value: value.to_string(),
        }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
