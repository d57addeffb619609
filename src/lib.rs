//! PEO TV churn - account-level classification of disconnection records
//!
//! This library provides:
//! - Loading of the churn extract and record sources with replace/incremental ingest
//! - Region area to DGM/GM lookup
//! - Report filters compiled into a coarse (category) and a fine (count) scope
//! - Grouping of records by account and copper/fiber/TV-only classification
//! - Category totals, overall or per calendar month

pub mod error;
pub mod config;
pub mod record;
pub mod region;
pub mod tenure;
pub mod filter;
pub mod classify;
pub mod report;

// Re-export commonly used types
pub use error::{ReportError, ReportResult};
pub use config::AppConfig;
pub use record::{DisconnectionRecord, ServiceLineType, ChurnReason, ReasonClass, RecordSource};
pub use region::{RegionHierarchy, RegionTiers, TierKind};
pub use tenure::{duration_years, DurationBucket};
pub use filter::FilterSpec;
pub use classify::{Category, CategoryCounts};
pub use report::{ReportEngine, MonthlyCounts};
