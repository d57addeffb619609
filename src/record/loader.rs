//! Load disconnection records from the churn extract CSV

use super::{ChurnReason, DisconnectionRecord, ServiceLineType};
use crate::error::ReportResult;
use chrono::NaiveDate;
use csv::{ByteRecord, ReaderBuilder, StringRecord, Trim};
use log::{info, warn};
use std::path::Path;

/// Default location of the churn extract
pub const DEFAULT_RECORDS_PATH: &str = "data/disconnections.csv";

/// Raw CSV row matching the churn extract columns
///
/// Every column defaults to empty; short rows are padded before deserializing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct CsvRow {
    #[serde(rename = "ORDER_LINE_RTO_AREA")]
    region_area: String,
    #[serde(rename = "Churn_Date")]
    churn_date: String,
    #[serde(rename = "ACCOUNT_NUM")]
    account_num: String,
    #[serde(rename = "Activated_Date")]
    activated_date: String,
    #[serde(rename = "ORDER_LINE_OSS_SERVICE_TYPE")]
    service_type: String,
    #[serde(rename = "BSS_TARIFF_NAME")]
    tariff_name: String,
    #[serde(rename = "Deleted_method")]
    deleted_method: String,
    #[serde(rename = "CUSTOMER_TYPE")]
    customer_type: String,
}

impl CsvRow {
    /// Convert to a record; `None` when the row has no account number
    fn to_record(self, line: usize) -> Option<DisconnectionRecord> {
        if self.account_num.is_empty() {
            warn!("Row {}: empty ACCOUNT_NUM, skipping row", line);
            return None;
        }

        let churn_date = parse_source_date(&self.churn_date);
        if churn_date.is_none() {
            warn!("Row {}: invalid Churn_Date '{}'", line, self.churn_date);
        }
        let activated_date = parse_source_date(&self.activated_date);
        if activated_date.is_none() {
            warn!("Row {}: invalid Activated_Date '{}'", line, self.activated_date);
        }

        Some(DisconnectionRecord {
            account_id: self.account_num,
            churn_date,
            activated_date,
            service_line_type: ServiceLineType::from_source(&self.service_type),
            region_area: self.region_area,
            churn_reason: ChurnReason::from_source(&self.deleted_method),
            customer_segment: self.customer_type,
            tariff_name: self.tariff_name,
        })
    }
}

/// Parse an extract date such as "April 1, 2024", "April 1, 24" or "2024-04-01"
///
/// Two-digit years are expanded with chrono's `%y` century pivot.
pub fn parse_source_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    // %Y would happily read "24" as year 24, so pick the format from the year token width
    let year_token = raw.rsplit([' ', ',']).next().unwrap_or("");
    let format = if year_token.len() <= 2 { "%B %d, %y" } else { "%B %d, %Y" };
    NaiveDate::parse_from_str(raw, format).ok()
}

/// Load all records from a CSV file
pub fn load_records<P: AsRef<Path>>(path: P) -> ReportResult<Vec<DisconnectionRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let records = load_records_from_reader(file)?;
    info!("Loaded {} disconnection records from {}", records.len(), path.display());
    Ok(records)
}

/// Load records from any reader (e.g., an uploaded buffer)
///
/// Ragged rows and non UTF-8 bytes do not abort the load: fields are decoded lossily
/// and a row that still cannot be read is skipped with a warning.
pub fn load_records_from_reader<R: std::io::Read>(reader: R) -> ReportResult<Vec<DisconnectionRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = decode_lossy(csv_reader.byte_headers()?);
    let mut records = Vec::new();

    for (idx, result) in csv_reader.byte_records().enumerate() {
        // Header is line 1
        let line = idx + 2;
        let raw = result?;
        if raw.len() != headers.len() {
            warn!("Row {}: expected {} fields, found {}", line, headers.len(), raw.len());
        }

        let mut fields = decode_lossy(&raw);
        while fields.len() < headers.len() {
            fields.push_field("");
        }

        let row: CsvRow = match fields.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(e) => {
                warn!("Row {}: {}, skipping row", line, e);
                continue;
            }
        };
        if let Some(record) = row.to_record(line) {
            records.push(record);
        }
    }

    Ok(records)
}

fn decode_lossy(raw: &ByteRecord) -> StringRecord {
    raw.iter().map(String::from_utf8_lossy).collect()
}

/// Load records from the default extract location
pub fn load_default_records() -> ReportResult<Vec<DisconnectionRecord>> {
    load_records(DEFAULT_RECORDS_PATH)
}
