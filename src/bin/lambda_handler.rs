//! AWS Lambda handler for PEO TV churn reports
//!
//! Accepts a filter as JSON and returns the category counts, optionally broken down
//! by month, along with the last-update label of the extract.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use peotv_churn::record::{last_update_label, load_records};
use peotv_churn::{
    AppConfig, CategoryCounts, DisconnectionRecord, FilterSpec, MonthlyCounts, ReportEngine, ReportError,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Input of one report invocation
#[derive(Debug, Default, Deserialize)]
pub struct ReportRequest {
    /// Filter to apply (default: unrestricted)
    #[serde(default)]
    pub filter: FilterSpec,

    /// When set, also report every month of these years
    #[serde(default)]
    pub by_month_years: Option<Vec<i32>>,

    /// Extract to read instead of the configured one
    #[serde(default)]
    pub records_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    #[serde(flatten)]
    pub counts: CategoryCounts,
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months: Option<Vec<MonthlyCounts>>,
    pub last_updated: String,
    pub execution_time_ms: u64,
}

fn error_body(status: u16, message: &str) -> Value {
    json!({ "status": status, "error": message })
}

/// Run the requested reports over an already loaded snapshot
fn build_report(
    engine: &ReportEngine,
    records: &[DisconnectionRecord],
    request: &ReportRequest,
) -> Result<ReportResponse, ReportError> {
    let counts = engine.classify(records, &request.filter)?;
    let months = match &request.by_month_years {
        Some(years) => Some(engine.classify_by_month(records, &request.filter, years)?),
        None => None,
    };

    Ok(ReportResponse {
        counts,
        total: counts.total(),
        months,
        last_updated: last_update_label(records),
        execution_time_ms: 0,
    })
}

/// Load the extract and the region table; failures become a 500 body
fn load_snapshot(config: &AppConfig) -> Result<(Vec<DisconnectionRecord>, ReportEngine), Value> {
    let records = load_records(&config.records_path).map_err(|e| {
        warn!("Could not load {}: {}", config.records_path.display(), e);
        error_body(500, &format!("Failed to load disconnections: {}", e))
    })?;

    let hierarchy = config.region_hierarchy().map_err(|e| {
        warn!("Could not load region table: {}", e);
        error_body(500, &format!("Failed to load region table: {}", e))
    })?;

    Ok((records, ReportEngine::with_hierarchy(hierarchy)))
}

/// Lambda handler function
async fn handler(event: LambdaEvent<ReportRequest>) -> Result<Value, Error> {
    let start = std::time::Instant::now();
    let (request, _context) = event.into_parts();

    let mut config = AppConfig::from_env();
    if let Some(path) = &request.records_path {
        config.records_path = path.into();
    }

    let (records, engine) = match load_snapshot(&config) {
        Ok(snapshot) => snapshot,
        Err(body) => return Ok(body),
    };

    match build_report(&engine, &records, &request) {
        Ok(mut response) => {
            response.execution_time_ms = start.elapsed().as_millis() as u64;
            info!(
                "Report over {} records: {} counted in {} ms",
                records.len(),
                response.total,
                response.execution_time_ms
            );
            Ok(serde_json::to_value(&response)?)
        }
        Err(e @ ReportError::InvalidFilter { .. }) => Ok(error_body(400, &e.to_string())),
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
