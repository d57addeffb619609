//! CSV-based region table loader
//!
//! Expected columns: `area,dgm,gm` (header row required, surrounding spaces ignored)

use super::{RegionHierarchy, RegionTiers};
use crate::error::{ReportError, ReportResult};
use csv::{ReaderBuilder, Trim};
use log::info;
use std::path::Path;

#[derive(Debug, serde::Deserialize)]
struct RegionRow {
    area: String,
    dgm: String,
    gm: String,
}

/// Load a region table from a CSV file
pub fn load_region_table<P: AsRef<Path>>(path: P) -> ReportResult<RegionHierarchy> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let hierarchy = load_region_table_from_reader(file)?;
    info!("Loaded {} region areas from {}", hierarchy.len(), path.display());
    Ok(hierarchy)
}

/// Load a region table from any reader
pub fn load_region_table_from_reader<R: std::io::Read>(reader: R) -> ReportResult<RegionHierarchy> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut entries = Vec::new();

    for (idx, result) in csv_reader.deserialize().enumerate() {
        let row: RegionRow = result?;
        if row.area.is_empty() {
            return Err(ReportError::RegionTable {
                row: idx + 2,
                reason: "empty area code".to_string(),
            });
        }
        entries.push((row.area, RegionTiers::new(row.dgm, row.gm)));
    }

    Ok(RegionHierarchy::from_entries(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::TierKind;

    #[test]
    fn test_load_region_table_from_reader() {
        let csv = "area, dgm ,gm\nRTO - GL,SP,REGION 2\nRTO - XX , NEW DGM , REGION 9\n";
        let hierarchy = load_region_table_from_reader(csv.as_bytes()).expect("Failed to load table");

        assert_eq!(hierarchy.len(), 2);
        assert_eq!(hierarchy.resolve("RTO - XX").map(|t| t.dgm.as_str()), Some("NEW DGM"));
        assert_eq!(hierarchy.areas_for_tier(TierKind::Gm, "REGION 9").len(), 1);
    }

    #[test]
    fn test_empty_area_is_rejected() {
        let csv = "area,dgm,gm\n,SP,REGION 2\n";
        let err = load_region_table_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ReportError::RegionTable { row: 2, .. }));
    }
}
