//! Runtime configuration shared by the CLI and the Lambda handler
//!
//! Reads from the environment:
//!   DISCONNECTION_CSV  path of the churn extract (default data/disconnections.csv)
//!   REGION_TABLE_CSV   optional region table replacing the built-in one

use crate::error::ReportResult;
use crate::record::loader::DEFAULT_RECORDS_PATH;
use crate::region::{load_region_table, RegionHierarchy};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub records_path: PathBuf,
    pub region_table_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            records_path: PathBuf::from(DEFAULT_RECORDS_PATH),
            region_table_path: None,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by whatever is set in the environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let defaults = Self::default();

        let records_path = lookup("DISCONNECTION_CSV")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.records_path);

        let region_table_path = lookup("REGION_TABLE_CSV")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Self {
            records_path,
            region_table_path,
        }
    }

    /// Region table to use: the configured file, or the built-in table
    pub fn region_hierarchy(&self) -> ReportResult<RegionHierarchy> {
        match &self.region_table_path {
            Some(path) => load_region_table(path),
            None => Ok(RegionHierarchy::default_table()),
        }
    }
}
