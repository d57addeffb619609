//! Region area to organizational tier lookup (DGM and GM)
//!
//! The hierarchy is a read-only value handed to the report engine, so tests and
//! deployments can swap the table without touching the classification code.

pub mod loader;

pub use loader::{load_region_table, load_region_table_from_reader};

use std::collections::{BTreeMap, BTreeSet};

/// Which organizational tier a label refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TierKind {
    /// Deputy general manager area (e.g. "WPS", "METRO 1")
    Dgm,
    /// General manager region (e.g. "REGION 2", "METRO")
    Gm,
}

/// Tiers a region area rolls up into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTiers {
    pub dgm: String,
    pub gm: String,
}

impl RegionTiers {
    pub fn new(dgm: impl Into<String>, gm: impl Into<String>) -> Self {
        Self { dgm: dgm.into(), gm: gm.into() }
    }

    pub fn label(&self, kind: TierKind) -> &str {
        match kind {
            TierKind::Dgm => &self.dgm,
            TierKind::Gm => &self.gm,
        }
    }
}

/// Static region area -> (DGM, GM) mapping
#[derive(Debug, Clone, Default)]
pub struct RegionHierarchy {
    areas: BTreeMap<String, RegionTiers>,
}

impl RegionHierarchy {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, RegionTiers)>,
        S: Into<String>,
    {
        Self {
            areas: entries.into_iter().map(|(area, tiers)| (area.into(), tiers)).collect(),
        }
    }

    /// Built-in RTO table
    pub fn default_table() -> Self {
        const TABLE: &[(&str, &str, &str)] = &[
            ("RTO - AD", "NP", "REGION 3"),
            ("RTO - AG", "WPS", "REGION 2"),
            ("RTO - AP", "EP", "REGION 3"),
            ("RTO - BC", "EP", "REGION 3"),
            ("RTO - BD", "SAB & UVA", "REGION 2"),
            ("RTO - BW", "SAB & UVA", "REGION 2"),
            ("RTO - CW", "NWP", "REGION 1"),
            ("RTO - GL", "SP", "REGION 2"),
            ("RTO - GP", "CP", "REGION 1"),
            ("RTO - GQ", "WPN", "REGION 1"),
            ("RTO - HB", "SP", "REGION 2"),
            ("RTO - HK", "METRO 1", "METRO"),
            ("RTO - HO", "METRO 2", "METRO"),
            ("RTO - HR", "WPS", "REGION 2"),
            ("RTO - HT", "CP", "REGION 1"),
            ("RTO - JA", "NP", "REGION 3"),
            ("RTO - KE", "SAB & UVA", "REGION 2"),
            ("RTO - KG", "NWP", "REGION 1"),
            ("RTO - KI", "WPN", "REGION 1"),
            ("RTO - KL", "EP", "REGION 3"),
            ("RTO - KLY", "NWP", "REGION 1"),
            ("RTO - KO", "NP", "REGION 3"),
            ("RTO - KON", "METRO 1", "METRO"),
            ("RTO - KT", "WPS", "REGION 2"),
            ("RTO - KX", "METRO 1", "METRO"),
            ("RTO - KY", "CP", "REGION 1"),
            ("RTO - MB", "NP", "REGION 3"),
            ("RTO - MD", "METRO 1", "METRO"),
            ("RTO - MH", "SP", "REGION 2"),
            ("RTO - MLT", "NP", "REGION 2"),
            ("RTO - MRG", "SAB & UVA", "REGION 2"),
            ("RTO - MT", "CP", "REGION 1"),
            ("RTO - ND", "METRO 2", "METRO"),
            ("RTO - NG", "WPN", "REGION 1"),
            ("RTO - NTB", "WPN", "REGION 1"),
            ("RTO - NW", "CP", "REGION 1"),
            ("RTO - PH", "WPS", "REGION 2"),
            ("RTO - PR", "EP", "REGION 3"),
            ("RTO - RM", "METRO 2", "METRO"),
            ("RTO - RN", "SAB & UVA", "REGION 2"),
            ("RTO - TC", "EP", "REGION 3"),
            ("RTO - VA", "NP", "REGION 3"),
            ("RTO - WT", "WPN", "REGION 1"),
        ];

        Self::from_entries(
            TABLE
                .iter()
                .map(|&(area, dgm, gm)| (area, RegionTiers::new(dgm, gm))),
        )
    }

    /// Tiers for an area code; unknown codes have no mapping
    pub fn resolve(&self, area_code: &str) -> Option<&RegionTiers> {
        self.areas.get(area_code)
    }

    /// All area codes whose tier of the given kind equals `label`
    pub fn areas_for_tier(&self, kind: TierKind, label: &str) -> BTreeSet<String> {
        self.areas
            .iter()
            .filter(|(_, tiers)| tiers.label(kind) == label)
            .map(|(area, _)| area.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}
