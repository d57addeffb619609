//! Disconnection records, the churn extract loader and record sources

mod data;
pub mod loader;
pub mod source;

pub use data::{ChurnReason, DisconnectionRecord, ReasonClass, ServiceLineType};
pub use loader::{load_default_records, load_records, load_records_from_reader, parse_source_date};
pub use source::{
    last_update_label, latest_churn_date, newer_than, CsvRecordSource, InMemorySource, IngestMode,
    IngestOutcome, PrefilterHints, RecordSource,
};
