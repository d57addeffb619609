//! Coarse and fine record predicates compiled from a [`FilterSpec`]
//!
//! The coarse scope decides which records make up an account group and therefore
//! which category the account lands in. The fine scope adds month and day and only
//! decides which members are counted. Keeping them as separate types means narrowing
//! a report to a single day can shrink a count but never move an account between
//! categories.

use super::FilterSpec;
use crate::error::{ReportError, ReportResult};
use crate::record::{DisconnectionRecord, ReasonClass};
use crate::region::{RegionHierarchy, TierKind};
use crate::tenure::{duration_years, DurationBucket};
use log::debug;
use std::collections::BTreeSet;

/// A predicate over single disconnection records
pub trait RecordPredicate {
    fn matches(&self, record: &DisconnectionRecord) -> bool;
}

/// Region, org tier, reason, duration and year
#[derive(Debug, Clone, Default)]
pub struct CoarseScope {
    years: BTreeSet<i32>,
    region_areas: BTreeSet<String>,
    /// Areas allowed by the org-tier filters; `None` when no tier filter is active
    tier_areas: Option<BTreeSet<String>>,
    reason: Option<ReasonClass>,
    buckets: BTreeSet<DurationBucket>,
}

impl CoarseScope {
    /// Records of `records` inside the coarse scope
    pub fn select<'a>(&self, records: &'a [DisconnectionRecord]) -> Vec<&'a DisconnectionRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

impl RecordPredicate for CoarseScope {
    fn matches(&self, record: &DisconnectionRecord) -> bool {
        if !self.years.is_empty() {
            match record.churn_year() {
                Some(year) if self.years.contains(&year) => {}
                _ => return false,
            }
        }

        if !self.region_areas.is_empty() && !self.region_areas.contains(&record.region_area) {
            return false;
        }

        if let Some(allowed) = &self.tier_areas {
            if !allowed.contains(&record.region_area) {
                return false;
            }
        }

        if let Some(reason) = self.reason {
            if record.churn_reason.class() != Some(reason) {
                return false;
            }
        }

        if !self.buckets.is_empty() {
            let Some(years) = duration_years(record.activated_date, record.churn_date) else {
                return false;
            };
            if !self.buckets.iter().any(|b| b.contains(years)) {
                return false;
            }
        }

        true
    }
}

/// Coarse scope plus churn month and day
#[derive(Debug, Clone, Default)]
pub struct FineScope {
    coarse: CoarseScope,
    months: BTreeSet<u32>,
    days: BTreeSet<u32>,
}

impl RecordPredicate for FineScope {
    fn matches(&self, record: &DisconnectionRecord) -> bool {
        if !self.coarse.matches(record) {
            return false;
        }

        if !self.months.is_empty() {
            match record.churn_month() {
                Some(month) if self.months.contains(&month) => {}
                _ => return false,
            }
        }

        if !self.days.is_empty() {
            match record.churn_day() {
                Some(day) if self.days.contains(&day) => {}
                _ => return false,
            }
        }

        true
    }
}

/// Both scopes derived from one filter
#[derive(Debug, Clone, Default)]
pub struct FilterScopes {
    pub coarse: CoarseScope,
    pub fine: FineScope,
}

/// Outcome of compiling a filter against a region hierarchy
#[derive(Debug, Clone)]
pub enum CompiledFilter {
    /// Org-tier labels resolved to no area at all; nothing can match
    NoPossibleMatches,
    Scopes(FilterScopes),
}

impl FilterSpec {
    /// Validate labels and resolve org tiers into area codes
    pub fn compile(&self, hierarchy: &RegionHierarchy) -> ReportResult<CompiledFilter> {
        if let Some(month) = self.months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(ReportError::invalid_filter("months", month));
        }
        if let Some(day) = self.days.iter().find(|d| !(1..=31).contains(*d)) {
            return Err(ReportError::invalid_filter("days", day));
        }

        let reason = match &self.churn_reason_class {
            Some(label) => Some(
                ReasonClass::from_label(label)
                    .ok_or_else(|| ReportError::invalid_filter("churn_reason_class", label))?,
            ),
            None => None,
        };

        let buckets = self
            .duration_buckets
            .iter()
            .map(|label| {
                DurationBucket::from_label(label)
                    .ok_or_else(|| ReportError::invalid_filter("duration_bucket", label))
            })
            .collect::<ReportResult<BTreeSet<_>>>()?;

        let tier_areas = if self.has_org_tier() {
            let mut allowed = BTreeSet::new();
            for label in &self.org_tier_dgm {
                allowed.extend(hierarchy.areas_for_tier(TierKind::Dgm, label));
            }
            for label in &self.org_tier_gm {
                allowed.extend(hierarchy.areas_for_tier(TierKind::Gm, label));
            }
            if allowed.is_empty() {
                debug!(
                    "Org tier filter (DGM {:?}, GM {:?}) resolved to no region areas",
                    self.org_tier_dgm, self.org_tier_gm
                );
                return Ok(CompiledFilter::NoPossibleMatches);
            }
            Some(allowed)
        } else {
            None
        };

        let coarse = CoarseScope {
            years: self.years.clone(),
            region_areas: self.region_areas.clone(),
            tier_areas,
            reason,
            buckets,
        };
        let fine = FineScope {
            coarse: coarse.clone(),
            months: self.months.clone(),
            days: self.days.clone(),
        };

        Ok(CompiledFilter::Scopes(FilterScopes { coarse, fine }))
    }
}
