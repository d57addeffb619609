//! Report engine: filter, group, classify and sum
//!
//! Each call is an independent, side-effect free computation over an immutable record
//! snapshot, so the same engine can serve many reports concurrently.

use crate::classify::{classify_group, group_by_account, CategoryCounts};
use crate::error::ReportResult;
use crate::filter::{CompiledFilter, FilterScopes, FilterSpec};
use crate::record::DisconnectionRecord;
use crate::region::RegionHierarchy;
use log::{debug, trace};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Category counts for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCounts {
    pub year: i32,
    pub month: u32,
    #[serde(flatten)]
    pub counts: CategoryCounts,
}

/// Classification engine with its region table
///
/// # Example
/// ```ignore
/// let engine = ReportEngine::new();
/// let spec = FilterSpec::new().with_years([2024]).with_gm("METRO");
///
/// let counts = engine.classify(&records, &spec)?;
/// let by_month = engine.classify_by_month(&records, &spec, &[2024])?;
/// ```
#[derive(Debug, Clone)]
pub struct ReportEngine {
    hierarchy: RegionHierarchy,
}

impl ReportEngine {
    /// Engine using the built-in region table
    pub fn new() -> Self {
        Self::with_hierarchy(RegionHierarchy::default_table())
    }

    pub fn with_hierarchy(hierarchy: RegionHierarchy) -> Self {
        Self { hierarchy }
    }

    /// Category counts for the records selected by `spec`
    pub fn classify(&self, records: &[DisconnectionRecord], spec: &FilterSpec) -> ReportResult<CategoryCounts> {
        match spec.compile(&self.hierarchy)? {
            CompiledFilter::NoPossibleMatches => Ok(CategoryCounts::zero()),
            CompiledFilter::Scopes(scopes) => Ok(Self::run(records, &scopes)),
        }
    }

    /// Category counts for every month of every requested year
    ///
    /// Each month is an independent run of `spec` pinned to that year and month.
    /// Years are reported in ascending order with all twelve months present.
    pub fn classify_by_month(
        &self,
        records: &[DisconnectionRecord],
        spec: &FilterSpec,
        years: &[i32],
    ) -> ReportResult<Vec<MonthlyCounts>> {
        // Surface bad labels once instead of twelve times per year
        spec.compile(&self.hierarchy)?;

        let mut years = years.to_vec();
        years.sort_unstable();
        years.dedup();

        let buckets: Vec<(i32, u32)> = years
            .iter()
            .flat_map(|&year| (1..=12).map(move |month| (year, month)))
            .collect();

        buckets
            .par_iter()
            .map(|&(year, month)| -> ReportResult<MonthlyCounts> {
                let counts = self.classify(records, &spec.for_month(year, month))?;
                Ok(MonthlyCounts { year, month, counts })
            })
            .collect()
    }

    fn run(records: &[DisconnectionRecord], scopes: &FilterScopes) -> CategoryCounts {
        let selected = scopes.coarse.select(records);
        let groups = group_by_account(selected);
        debug!(
            "{} of {} records in coarse scope across {} accounts",
            groups.iter().map(|g| g.len()).sum::<usize>(),
            records.len(),
            groups.len()
        );

        groups
            .iter()
            .map(|group| {
                trace!("Account {} ({} lines): {:?}", group.account_id, group.len(), group.categories());
                classify_group(group, &scopes.fine)
            })
            .sum()
    }
}

impl Default for ReportEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use crate::record::{ChurnReason, ServiceLineType};
    use crate::region::RegionTiers;
    use chrono::NaiveDate;

    fn line(account: &str, kind: ServiceLineType, churn: (i32, u32, u32)) -> DisconnectionRecord {
        DisconnectionRecord::new(
            account,
            NaiveDate::from_ymd_opt(churn.0, churn.1, churn.2),
            NaiveDate::from_ymd_opt(2020, 1, 1),
            kind,
            "RTO - GL",
            ChurnReason::NonPayment,
        )
    }

    /// Mixed block used by several tests
    fn block() -> Vec<DisconnectionRecord> {
        vec![
            // X: copper pair split over March and April
            line("X", ServiceLineType::InfraCopper, (2024, 3, 28)),
            line("X", ServiceLineType::ServiceCopper, (2024, 4, 2)),
            // Y: fiber TV only
            line("Y", ServiceLineType::ServiceFiber, (2024, 4, 15)),
            // Z: both pairings
            line("Z", ServiceLineType::InfraCopper, (2024, 5, 1)),
            line("Z", ServiceLineType::ServiceCopper, (2024, 5, 1)),
            line("Z", ServiceLineType::InfraFiber, (2024, 5, 1)),
            line("Z", ServiceLineType::ServiceFiber, (2024, 5, 1)),
            // W: fiber pair with two TV lines and an unrelated line
            line("W", ServiceLineType::InfraFiber, (2024, 6, 3)),
            line("W", ServiceLineType::ServiceFiber, (2024, 6, 3)),
            line("W", ServiceLineType::ServiceFiber, (2024, 6, 4)),
            line("W", ServiceLineType::Other("V-VOICE FTTH".into()), (2024, 6, 4)),
            // V: bearer only
            line("V", ServiceLineType::InfraCopper, (2024, 6, 9)),
        ]
    }

    #[test]
    fn test_copper_pair_stable_under_month_filter() {
        let engine = ReportEngine::new();
        let records = block();

        let april = engine
            .classify(&records, &FilterSpec::new().with_years([2024]).with_months([4]))
            .expect("valid filter");
        // X keeps its copper pairing although the bearer line churned in March
        assert_eq!(april, CategoryCounts { peo_only: 1, peo_with_copper: 1, peo_with_fiber: 0 });

        let march = engine
            .classify(&records, &FilterSpec::new().with_years([2024]).with_months([3]))
            .expect("valid filter");
        assert!(march.is_zero());
    }

    #[test]
    fn test_whole_block_counts() {
        let engine = ReportEngine::new();
        let counts = engine.classify(&block(), &FilterSpec::new()).expect("valid filter");

        assert_eq!(counts.peo_only, 1);
        assert_eq!(counts.peo_with_copper, 2);
        assert_eq!(counts.peo_with_fiber, 3);

        // Every TV line lands in exactly one bucket
        let tv_lines = block().iter().filter(|r| r.service_line_type.is_service()).count() as u64;
        assert_eq!(counts.total(), tv_lines);
    }

    #[test]
    fn test_record_order_does_not_matter() {
        let engine = ReportEngine::new();
        let spec = FilterSpec::new().with_years([2024]).with_months([4, 5, 6]);

        let forward = engine.classify(&block(), &spec).expect("valid filter");
        let mut reversed = block();
        reversed.reverse();
        let mut rotated = block();
        rotated.rotate_left(5);

        assert_eq!(engine.classify(&reversed, &spec).expect("valid filter"), forward);
        assert_eq!(engine.classify(&rotated, &spec).expect("valid filter"), forward);
    }

    #[test]
    fn test_empty_org_tier_resolution_returns_zero() {
        let engine = ReportEngine::new();
        let counts = engine
            .classify(&block(), &FilterSpec::new().with_dgm("NO SUCH DGM").with_gm("NO SUCH GM"))
            .expect("not an error");
        assert_eq!(counts, CategoryCounts::zero());
    }

    #[test]
    fn test_org_tier_filter_uses_injected_hierarchy() {
        let hierarchy = RegionHierarchy::from_entries([("RTO - GL", RegionTiers::new("TEST DGM", "TEST GM"))]);
        let engine = ReportEngine::with_hierarchy(hierarchy);

        let counts = engine
            .classify(&block(), &FilterSpec::new().with_dgm("TEST DGM"))
            .expect("valid filter");
        assert_eq!(counts.total(), 6);

        // SP is the default table's DGM for RTO - GL but is unknown to this table
        let counts = engine.classify(&block(), &FilterSpec::new().with_dgm("SP")).expect("valid filter");
        assert!(counts.is_zero());
    }

    #[test]
    fn test_invalid_filter_propagates() {
        let engine = ReportEngine::new();
        let err = engine
            .classify(&block(), &FilterSpec::new().with_duration_bucket("ten years"))
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidFilter { field: "duration_bucket", .. }));

        let err = engine
            .classify_by_month(&block(), &FilterSpec::new().with_reason_class("Moved"), &[2024])
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidFilter { field: "churn_reason_class", .. }));
    }

    #[test]
    fn test_classify_by_month_zero_fills() {
        let engine = ReportEngine::new();
        let months = engine
            .classify_by_month(&block(), &FilterSpec::new(), &[2024])
            .expect("valid filter");

        assert_eq!(months.len(), 12);
        for (idx, entry) in months.iter().enumerate() {
            assert_eq!(entry.year, 2024);
            assert_eq!(entry.month, idx as u32 + 1);
        }

        assert!(months[0].counts.is_zero());
        assert!(months[2].counts.is_zero()); // March: bearer line only
        assert_eq!(months[3].counts, CategoryCounts { peo_only: 1, peo_with_copper: 1, peo_with_fiber: 0 });
        assert_eq!(months[4].counts, CategoryCounts { peo_only: 0, peo_with_copper: 1, peo_with_fiber: 1 });
        assert_eq!(months[5].counts, CategoryCounts { peo_only: 0, peo_with_copper: 0, peo_with_fiber: 2 });
        assert!(months[11].counts.is_zero());
    }

    #[test]
    fn test_classify_by_month_orders_years() {
        let engine = ReportEngine::new();
        let months = engine
            .classify_by_month(&block(), &FilterSpec::new(), &[2024, 2023, 2024])
            .expect("valid filter");

        assert_eq!(months.len(), 24);
        assert_eq!((months[0].year, months[0].month), (2023, 1));
        assert_eq!((months[12].year, months[12].month), (2024, 1));
        assert!(months[..12].iter().all(|m| m.counts.is_zero()));
    }

    #[test]
    fn test_single_fiber_tv_line_without_bearer_is_peo_only() {
        let engine = ReportEngine::new();
        let records = vec![line("Y", ServiceLineType::ServiceFiber, (2024, 4, 15))];
        let counts = engine.classify(&records, &FilterSpec::new()).expect("valid filter");
        assert_eq!(counts, CategoryCounts { peo_only: 1, peo_with_copper: 0, peo_with_fiber: 0 });
    }

    #[test]
    fn test_account_with_both_pairings_counts_in_both() {
        let engine = ReportEngine::new();
        let records: Vec<_> = block().into_iter().filter(|r| r.account_id == "Z").collect();
        let counts = engine.classify(&records, &FilterSpec::new()).expect("valid filter");
        assert_eq!(counts, CategoryCounts { peo_only: 0, peo_with_copper: 1, peo_with_fiber: 1 });
    }

    #[test]
    fn test_duration_bucket_filters_per_record() {
        let engine = ReportEngine::new();
        let mut short = line("S", ServiceLineType::ServiceCopper, (2023, 6, 1));
        short.activated_date = NaiveDate::from_ymd_opt(2023, 1, 1);
        let mut long = line("L", ServiceLineType::ServiceCopper, (2024, 6, 1));
        long.activated_date = NaiveDate::from_ymd_opt(2023, 1, 1);

        let spec = FilterSpec::new().with_duration_bucket("below 1 year");
        let counts = engine.classify(&[short, long], &spec).expect("valid filter");
        assert_eq!(counts.peo_only, 1);
    }

    #[test]
    fn test_malformed_records_do_not_block_others() {
        let engine = ReportEngine::new();
        let mut undated = line("U", ServiceLineType::ServiceCopper, (2024, 4, 1));
        undated.churn_date = None;
        undated.activated_date = None;
        let records = vec![
            undated,
            line("R", ServiceLineType::Other("IPTV??".into()), (2024, 4, 1)),
            line("Y", ServiceLineType::ServiceFiber, (2024, 4, 15)),
        ];

        let dated = engine.classify(&records, &FilterSpec::new().with_years([2024])).expect("valid filter");
        assert_eq!(dated, CategoryCounts { peo_only: 1, peo_with_copper: 0, peo_with_fiber: 0 });

        // Without date filters the undated TV line still counts
        let all = engine.classify(&records, &FilterSpec::new()).expect("valid filter");
        assert_eq!(all.peo_only, 2);
    }

    #[test]
    fn test_monthly_counts_json_shape() {
        let entry = MonthlyCounts {
            year: 2024,
            month: 4,
            counts: CategoryCounts { peo_only: 1, peo_with_copper: 2, peo_with_fiber: 0 },
        };
        let json = serde_json::to_value(entry).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"year": 2024, "month": 4, "peo_only": 1, "peo_with_copper": 2, "peo_with_fiber": 0})
        );
    }
}
