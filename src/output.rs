//! Output formatting and persistence for query results.
//!
//! Supports pretty-printing, JSON serialization, a CSV trip table, and a CSV
//! category summary that is appended across runs.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::{CategorySummary, QueryResult, TripRow};
use crate::record::MeasuredTrip;
use csv::WriterBuilder;
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Renders a query result using Rust's debug pretty-print format.
pub fn format_pretty(result: &QueryResult) -> String {
    format!("{:#?}", result)
}

/// Logs a query result in pretty-print form at a level the console shows.
pub fn print_pretty(result: &QueryResult) {
    info!("{}", format_pretty(result));
}

/// Logs any serializable value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes the trips as a CSV table, replacing any existing file.
pub fn write_trip_table(path: &str, trips: &[MeasuredTrip]) -> Result<()> {
    debug!(path, rows = trips.len(), "Writing trip table");

    let mut writer = WriterBuilder::new().from_writer(File::create(path)?);
    for trip in trips {
        writer.serialize(TripRow::from(trip))?;
    }
    writer.flush()?;

    Ok(())
}

/// Appends one row per category to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_summaries(path: &str, summaries: &[CategorySummary]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = summaries.len(), "Appending category summaries");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // header only on a fresh file
        .from_writer(file);

    for summary in summaries {
        writer.serialize(summary)?;
    }
    writer.flush()?;

    Ok(())
}
