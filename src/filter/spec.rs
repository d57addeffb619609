//! Declarative report filter as received from callers

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Report filter specification
///
/// Every option is optional: an empty set means "unrestricted" and several values
/// in one set are OR-ed. Labels (reason class, duration buckets) stay as raw strings
/// here and are validated when the filter is compiled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    /// Churn years
    pub years: BTreeSet<i32>,

    /// Churn months (1-12)
    pub months: BTreeSet<u32>,

    /// Churn days of month (1-31)
    pub days: BTreeSet<u32>,

    /// Exact region area codes
    pub region_areas: BTreeSet<String>,

    /// Reason class label, e.g. "Customer Requested" or "Non Payment"
    pub churn_reason_class: Option<String>,

    /// Duration bucket labels, e.g. "below 1 year"
    pub duration_buckets: Vec<String>,

    /// DGM tier labels
    pub org_tier_dgm: BTreeSet<String>,

    /// GM tier labels
    pub org_tier_gm: BTreeSet<String>,
}

impl FilterSpec {
    /// Unrestricted filter
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_years<I: IntoIterator<Item = i32>>(mut self, years: I) -> Self {
        self.years.extend(years);
        self
    }

    pub fn with_months<I: IntoIterator<Item = u32>>(mut self, months: I) -> Self {
        self.months.extend(months);
        self
    }

    pub fn with_days<I: IntoIterator<Item = u32>>(mut self, days: I) -> Self {
        self.days.extend(days);
        self
    }

    pub fn with_region_area(mut self, area: impl Into<String>) -> Self {
        self.region_areas.insert(area.into());
        self
    }

    pub fn with_reason_class(mut self, label: impl Into<String>) -> Self {
        self.churn_reason_class = Some(label.into());
        self
    }

    pub fn with_duration_bucket(mut self, label: impl Into<String>) -> Self {
        self.duration_buckets.push(label.into());
        self
    }

    pub fn with_dgm(mut self, label: impl Into<String>) -> Self {
        self.org_tier_dgm.insert(label.into());
        self
    }

    pub fn with_gm(mut self, label: impl Into<String>) -> Self {
        self.org_tier_gm.insert(label.into());
        self
    }

    /// Same filter pinned to a single churn month
    pub fn for_month(&self, year: i32, month: u32) -> Self {
        let mut spec = self.clone();
        spec.years = BTreeSet::from([year]);
        spec.months = BTreeSet::from([month]);
        spec
    }

    pub fn has_org_tier(&self) -> bool {
        !self.org_tier_dgm.is_empty() || !self.org_tier_gm.is_empty()
    }
}
