//! CSV reader for trip logs, plain or gzip-compressed.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::record::TripRecord;

/// Decodes trip records from CSV with a header row.
///
/// Expected columns: `line_id, vehicle_id, departure, entry, exit,
/// elapsed_minutes, turnstile, return, driver, collector, passenger_count, note`.
/// Empty cells become `None`.
///
/// # Errors
///
/// Returns an error on malformed CSV or a non-numeric count column. Unparseable
/// time text is not an error here; those rows are dropped by the engine.
pub fn parse_trips<R: Read>(reader: R) -> Result<Vec<TripRecord>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();

    for (index, result) in rdr.deserialize::<TripRecord>().enumerate() {
        let record = result.with_context(|| format!("trip row {}", index + 1))?;
        rows.push(record);
    }

    Ok(rows)
}

/// Loads trips from `path`. Files ending in `.gz` are decompressed first.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_trips(path: &Path) -> Result<Vec<TripRecord>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let gzipped = path.extension().and_then(|e| e.to_str()) == Some("gz");

    let rows = if gzipped {
        parse_trips(GzDecoder::new(file))?
    } else {
        parse_trips(file)?
    };

    debug!(rows = rows.len(), gzipped, "Trip file loaded");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "line_id,vehicle_id,departure,entry,exit,elapsed_minutes,turnstile,return,driver,collector,passenger_count,note\n";

    #[test]
    fn test_parse_empty_body() {
        let rows = parse_trips(HEADER.as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_row_with_empty_optionals() {
        let csv = format!("{HEADER}329,330,4:05,,,,4:05,7:50,Odenilton,,24,\n");
        let rows = parse_trips(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        let r = &rows[0];
        assert_eq!(r.line_id, "329");
        assert_eq!(r.entry, None);
        assert_eq!(r.elapsed_minutes, None);
        assert_eq!(r.return_time.as_deref(), Some("7:50"));
        assert_eq!(r.collector, None);
        assert_eq!(r.passenger_count, 24);
        assert_eq!(r.note, None);
    }

    #[test]
    fn test_parse_keeps_unparseable_time_text() {
        let csv = format!("{HEADER}329,329,,,,,bad,7:50,Jessy,Jessy,3,REND\n");
        let rows = parse_trips(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].turnstile.as_deref(), Some("bad"));
        assert_eq!(rows[0].note.as_deref(), Some("REND"));
    }

    #[test]
    fn test_parse_invalid_passenger_count() {
        let csv = format!("{HEADER}329,329,,,,,4:05,7:50,Jessy,Jessy,many,\n");
        assert!(parse_trips(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_trips(Path::new("/nonexistent/trips.csv")).is_err());
    }
}
