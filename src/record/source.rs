//! Record sources feeding the reporting engine
//!
//! A source hands the engine a snapshot of disconnection records. It may narrow the
//! snapshot by churn year (a pure coarse-scope criterion) but never by month or day:
//! the coarse/fine split belongs to the engine.

use super::{load_records, DisconnectionRecord};
use crate::error::ReportResult;
use chrono::NaiveDate;
use log::{debug, info};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Optional narrowing a source is allowed to apply before handing records over
#[derive(Debug, Clone, Default)]
pub struct PrefilterHints {
    /// Churn years of interest (empty = all years)
    pub years: BTreeSet<i32>,
}

impl PrefilterHints {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_years<I: IntoIterator<Item = i32>>(years: I) -> Self {
        Self { years: years.into_iter().collect() }
    }

    /// Records with no churn date are kept so the engine decides their fate
    fn admits(&self, record: &DisconnectionRecord) -> bool {
        if self.years.is_empty() {
            return true;
        }
        match record.churn_year() {
            Some(year) => self.years.contains(&year),
            None => true,
        }
    }
}

/// Supplier of disconnection record snapshots
pub trait RecordSource {
    fn fetch_records(&self, hints: &PrefilterHints) -> ReportResult<Vec<DisconnectionRecord>>;
}

/// Reads the churn extract from disk on every fetch
#[derive(Debug, Clone)]
pub struct CsvRecordSource {
    path: PathBuf,
}

impl CsvRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for CsvRecordSource {
    fn fetch_records(&self, hints: &PrefilterHints) -> ReportResult<Vec<DisconnectionRecord>> {
        let mut records = load_records(&self.path)?;
        records.retain(|r| hints.admits(r));
        Ok(records)
    }
}

/// How a new batch is merged into an in-memory store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestMode {
    /// Drop everything currently held and keep the batch
    Replace,
    /// Keep only batch records churned strictly after the latest held churn date
    Incremental,
}

/// Result of an ingest call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    pub inserted: usize,
    /// Latest churn date held before the batch arrived (Incremental only)
    pub cutoff: Option<NaiveDate>,
}

/// In-memory record store
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<DisconnectionRecord>,
}

impl InMemorySource {
    pub fn new(records: Vec<DisconnectionRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[DisconnectionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Merge a batch of freshly loaded records
    pub fn ingest(&mut self, batch: Vec<DisconnectionRecord>, mode: IngestMode) -> IngestOutcome {
        match mode {
            IngestMode::Replace => {
                info!("Replacing {} held records with {} new records", self.records.len(), batch.len());
                let inserted = batch.len();
                self.records = batch;
                IngestOutcome { inserted, cutoff: None }
            }
            IngestMode::Incremental => {
                let cutoff = latest_churn_date(&self.records);
                let fresh = newer_than(batch, cutoff);
                debug!("Incremental ingest after {:?}: {} new records", cutoff, fresh.len());
                let inserted = fresh.len();
                self.records.extend(fresh);
                IngestOutcome { inserted, cutoff }
            }
        }
    }
}

impl RecordSource for InMemorySource {
    fn fetch_records(&self, hints: &PrefilterHints) -> ReportResult<Vec<DisconnectionRecord>> {
        Ok(self.records.iter().filter(|r| hints.admits(r)).cloned().collect())
    }
}

/// Most recent churn date across the records
pub fn latest_churn_date(records: &[DisconnectionRecord]) -> Option<NaiveDate> {
    records.iter().filter_map(|r| r.churn_date).max()
}

/// Keep records churned strictly after `cutoff` (all dated records when there is no cutoff)
pub fn newer_than(records: Vec<DisconnectionRecord>, cutoff: Option<NaiveDate>) -> Vec<DisconnectionRecord> {
    records
        .into_iter()
        .filter(|r| match (r.churn_date, cutoff) {
            (Some(date), Some(cutoff)) => date > cutoff,
            (Some(_), None) => true,
            (None, _) => false,
        })
        .collect()
}

/// Human readable "last updated" label, e.g. "April 1, 2024"
pub fn last_update_label(records: &[DisconnectionRecord]) -> String {
    match latest_churn_date(records) {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => "No data available".to_string(),
    }
}
