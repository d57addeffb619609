//! PEO TV churn CLI
//!
//! Runs category reports over the disconnection extract

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use peotv_churn::record::{last_update_label, latest_churn_date, CsvRecordSource, PrefilterHints};
use peotv_churn::{
    AppConfig, Category, CategoryCounts, DisconnectionRecord, DurationBucket, FilterSpec, RecordSource,
    RegionHierarchy, ReportEngine,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "peotv_churn")]
#[command(about = "PEO TV disconnection classification reports")]
#[command(version)]
struct Cli {
    /// Disconnection extract (overrides DISCONNECTION_CSV)
    #[arg(long, global = true)]
    records: Option<PathBuf>,

    /// Region table CSV (overrides REGION_TABLE_CSV)
    #[arg(long, global = true)]
    regions: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Category totals for the filter
    #[command(after_help = "\
Examples:
  peotv_churn counts --year 2024 --gm METRO
  peotv_churn counts --year 2023 --month 3 --reason 'Non Payment' --json
  peotv_churn counts --area 'RTO - GL' --duration 'below 1 year'")]
    Counts {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Category totals for every month of the given years
    Monthly {
        /// Years to report (repeatable)
        #[arg(id = "for_years", long = "for-year", required = true, value_name = "YEAR")]
        years: Vec<i32>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Date of the most recent disconnection on file
    LastUpdate,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Churn year (repeatable)
    #[arg(long = "year")]
    years: Vec<i32>,

    /// Churn month 1-12 (repeatable)
    #[arg(long = "month")]
    months: Vec<u32>,

    /// Churn day of month 1-31 (repeatable)
    #[arg(long = "day")]
    days: Vec<u32>,

    /// Region area code, e.g. 'RTO - GL' (repeatable)
    #[arg(long = "area")]
    areas: Vec<String>,

    /// Reason class: 'Customer Requested' or 'Non Payment'
    #[arg(long)]
    reason: Option<String>,

    /// Duration bucket label, e.g. 'below 1 year' or '1-2y' (repeatable)
    #[arg(long = "duration", value_parser = parse_duration_label)]
    durations: Vec<String>,

    /// DGM tier label (repeatable)
    #[arg(long = "dgm")]
    dgms: Vec<String>,

    /// GM tier label (repeatable)
    #[arg(long = "gm")]
    gms: Vec<String>,
}

/// Normalize a duration label to its long form, listing the choices on failure
fn parse_duration_label(raw: &str) -> Result<String, String> {
    DurationBucket::from_label(raw)
        .map(|bucket| bucket.as_str().to_string())
        .ok_or_else(|| {
            let choices: Vec<&str> = DurationBucket::ALL.iter().map(|b| b.as_str()).collect();
            format!("expected one of: {}", choices.join(", "))
        })
}

impl FilterArgs {
    fn to_spec(&self) -> FilterSpec {
        let mut spec = FilterSpec::new()
            .with_years(self.years.iter().copied())
            .with_months(self.months.iter().copied())
            .with_days(self.days.iter().copied());
        for area in &self.areas {
            spec = spec.with_region_area(area.as_str());
        }
        if let Some(reason) = &self.reason {
            spec = spec.with_reason_class(reason.as_str());
        }
        for bucket in &self.durations {
            spec = spec.with_duration_bucket(bucket.as_str());
        }
        for dgm in &self.dgms {
            spec = spec.with_dgm(dgm.as_str());
        }
        for gm in &self.gms {
            spec = spec.with_gm(gm.as_str());
        }
        spec
    }
}

#[derive(Serialize)]
struct CountsOutput<'a> {
    filter: &'a FilterSpec,
    #[serde(flatten)]
    counts: CategoryCounts,
    total: u64,
    last_updated: String,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(path) = cli.records {
        config.records_path = path;
    }
    if let Some(path) = cli.regions {
        config.region_table_path = Some(path);
    }

    let source = CsvRecordSource::new(&config.records_path);
    let fetch = |hints: PrefilterHints| {
        source
            .fetch_records(&hints)
            .with_context(|| format!("loading disconnections from {}", config.records_path.display()))
    };

    match cli.command {
        Commands::Counts { filter } => {
            // Unfiltered so the last-update label covers the whole extract
            let records = fetch(PrefilterHints::all())?;
            let engine = ReportEngine::with_hierarchy(load_hierarchy(&config)?);
            run_counts(&engine, &records, &filter.to_spec(), cli.json)
        }
        Commands::Monthly { years, filter } => {
            let records = fetch(PrefilterHints::for_years(years.iter().copied()))?;
            let engine = ReportEngine::with_hierarchy(load_hierarchy(&config)?);
            run_monthly(&engine, &records, &filter.to_spec(), &years, cli.json)
        }
        Commands::LastUpdate => {
            let records = fetch(PrefilterHints::all())?;
            if cli.json {
                let latest = latest_churn_date(&records).map(|d| d.to_string());
                println!("{}", serde_json::json!({
                    "latest_churn_date": latest,
                    "label": last_update_label(&records),
                }));
            } else {
                println!("Last updated: {}", last_update_label(&records));
            }
            Ok(())
        }
    }
}

fn load_hierarchy(config: &AppConfig) -> Result<RegionHierarchy> {
    config.region_hierarchy().with_context(|| match &config.region_table_path {
        Some(path) => format!("loading region table from {}", path.display()),
        None => "building built-in region table".to_string(),
    })
}

fn run_counts(engine: &ReportEngine, records: &[DisconnectionRecord], spec: &FilterSpec, json: bool) -> Result<()> {
    let counts = engine.classify(records, spec).context("running category report")?;
    info!("Classified {} records: {} TV lines counted", records.len(), counts.total());

    if json {
        let output = CountsOutput {
            filter: spec,
            counts,
            total: counts.total(),
            last_updated: last_update_label(records),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("PEO TV Disconnections");
    println!("=====================");
    println!("Last updated: {}\n", last_update_label(records));
    println!("{:<18} {:>10}", "Category", "Count");
    println!("{}", "-".repeat(29));
    for (category, label) in [
        (Category::PeoOnly, "PEO only"),
        (Category::PeoWithCopper, "PEO with copper"),
        (Category::PeoWithFiber, "PEO with fiber"),
    ] {
        println!("{:<18} {:>10}", label, counts.get(category));
    }
    println!("{}", "-".repeat(29));
    println!("{:<18} {:>10}", "Total", counts.total());
    Ok(())
}

fn run_monthly(
    engine: &ReportEngine,
    records: &[DisconnectionRecord],
    spec: &FilterSpec,
    years: &[i32],
    json: bool,
) -> Result<()> {
    let months = engine
        .classify_by_month(records, spec, years)
        .context("running monthly report")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&months)?);
        return Ok(());
    }

    println!("{:>4} {:>5} {:>10} {:>10} {:>10} {:>10}", "Year", "Month", "PEO only", "Copper", "Fiber", "Total");
    println!("{}", "-".repeat(54));
    for row in &months {
        println!(
            "{:>4} {:>5} {:>10} {:>10} {:>10} {:>10}",
            row.year,
            row.month,
            row.counts.peo_only,
            row.counts.peo_with_copper,
            row.counts.peo_with_fiber,
            row.counts.total()
        );
    }
    Ok(())
}
