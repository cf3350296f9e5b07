//! CLI entry point for the trip metrics tool.
//!
//! Loads a trip log (the built-in reference log or a CSV file), runs the
//! category query, and reports the aggregates. Also exposes the fleet,
//! compliance and passenger-flow reference tables.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use trip_metrics::{
    analyzers::{
        aggregate::MetricKind,
        category::{CategoryField, Selection},
    },
    config::EngineConfig,
    dataset::{ComplianceSeries, compliance_series, fleet_summary, passenger_flow, reference_trips, schedule_compliance},
    engine::TripMetricsEngine,
    output::{append_summaries, print_json, print_pretty, write_trip_table},
    parser::load_trips,
    record::TripRecord,
};

#[derive(Parser)]
#[command(name = "trip_metrics")]
#[command(about = "Trip duration and per-category metrics over a transit trip log", long_about = None)]
struct Cli {
    /// JSON engine config (falls back to TRIP_METRICS_CONFIG, then defaults)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the category query and report every aggregate
    Query {
        /// Trip CSV (optionally .gz); the reference log is used when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Category to select, or ALL
        #[arg(short, long, default_value = "ALL")]
        category: Selection,

        /// Write the filtered trip table to this CSV file
        #[arg(long)]
        table_out: Option<String>,

        /// Append per-category summary rows to this CSV file
        #[arg(long)]
        summary_out: Option<String>,

        /// Pretty-print the full result instead of JSON
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// List the selectable categories
    Categories {
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Aggregate one metric per category
    Aggregate {
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Field to group by (overrides the config)
        #[arg(short, long, value_enum)]
        by: Option<CategoryField>,

        #[arg(short, long, value_enum, default_value = "count")]
        metric: MetricKind,

        #[arg(short, long, default_value = "ALL")]
        category: Selection,
    },
    /// Sunday and holiday fleet summary
    Fleet,
    /// Daily schedule compliance per nucleus
    Compliance,
    /// Passenger flow on line 378TRO
    Flow,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/trip_metrics.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("trip_metrics.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Query {
            input,
            category,
            table_out,
            summary_out,
            pretty,
        } => {
            let engine = TripMetricsEngine::new(&load_input(input.as_deref())?, &config);
            let result = engine.query(&category);

            if result.is_empty() {
                warn!(selection = %category, "No trips found for the selected category");
            }

            if pretty {
                print_pretty(&result);
            } else {
                print_json(&result)?;
            }

            if let Some(path) = table_out {
                write_trip_table(&path, &result.filtered_records)?;
                info!(path = %path, rows = result.filtered_records.len(), "Trip table written");
            }

            if let Some(path) = summary_out {
                append_summaries(&path, &result.summaries())?;
            }
        }
        Commands::Categories { input } => {
            let engine = TripMetricsEngine::new(&load_input(input.as_deref())?, &config);
            let categories = engine.categories();

            info!(total = categories.len(), field = ?config.category_field, "Categories");
            for category in &categories {
                info!(category = %category, "Category");
            }
        }
        Commands::Aggregate {
            input,
            by,
            metric,
            category,
        } => {
            let config = EngineConfig {
                category_field: by.unwrap_or(config.category_field),
                ..config
            };
            let engine = TripMetricsEngine::new(&load_input(input.as_deref())?, &config);
            let values = engine.aggregate(&category, metric);

            info!(metric = ?metric, field = ?config.category_field, groups = values.len(), "Aggregate");
            print_json(&values)?;
        }
        Commands::Fleet => {
            print_json(&fleet_summary())?;
        }
        Commands::Compliance => {
            let days = schedule_compliance();
            print_json(&days)?;

            for series in [
                ComplianceSeries::Nucleus1,
                ComplianceSeries::Nucleus4,
                ComplianceSeries::Nucleus5,
                ComplianceSeries::Combined,
            ] {
                let points = compliance_series(&days, series);
                let lowest = points.iter().map(|&(_, v)| v).fold(f64::INFINITY, f64::min);
                info!(series = ?series, lowest, "Compliance series");
            }
        }
        Commands::Flow => {
            print_json(&passenger_flow()?)?;
        }
    }

    Ok(())
}

/// Reads the engine config from `--config`, then `TRIP_METRICS_CONFIG`, else defaults.
fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    let path = path
        .map(str::to_string)
        .or_else(|| std::env::var("TRIP_METRICS_CONFIG").ok());

    match path {
        Some(path) => {
            let config = EngineConfig::load(&path)?;
            info!(path = %path, ?config, "Config loaded");
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

/// Loads trips from a CSV file, or the reference log when no file is given.
fn load_input(input: Option<&Path>) -> Result<Vec<TripRecord>> {
    match input {
        Some(path) => load_trips(path),
        None => {
            info!("No input file, using the reference trip log");
            Ok(reference_trips())
        }
    }
}
