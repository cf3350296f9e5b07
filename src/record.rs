//! Trip records as ingested, and the validated form carrying computed duration.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::time::{TimeOfDay, TripDuration, compute_duration, parse_time_of_day};

/// Marker the reference dataset uses for reduced-service trips.
pub const DEFAULT_ANNOTATION_MARKER: &str = "REND";

/// One row of the trip log, exactly as supplied.
///
/// Time fields are kept as text; only `turnstile` and `return` are required
/// to parse for a trip to take part in any aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub line_id: String,
    pub vehicle_id: String,
    pub departure: Option<String>,
    pub entry: Option<String>,
    pub exit: Option<String>,
    pub elapsed_minutes: Option<u32>,
    pub turnstile: Option<String>,
    #[serde(rename = "return")]
    pub return_time: Option<String>,
    pub driver: Option<String>,
    pub collector: Option<String>,
    pub passenger_count: u32,
    pub note: Option<String>,
}

impl TripRecord {
    /// Minimal record with the fields that drive the metrics.
    pub fn new(turnstile: &str, return_time: &str, driver: &str, passenger_count: u32) -> Self {
        TripRecord {
            turnstile: Some(turnstile.to_string()),
            return_time: Some(return_time.to_string()),
            driver: Some(driver.to_string()),
            passenger_count,
            ..Default::default()
        }
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }

    pub fn with_collector(mut self, collector: &str) -> Self {
        self.collector = Some(collector.to_string());
        self
    }

    pub fn with_line(mut self, line_id: &str, vehicle_id: &str) -> Self {
        self.line_id = line_id.to_string();
        self.vehicle_id = vehicle_id.to_string();
        self
    }
}

/// A trip whose turnstile and return times both parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasuredTrip {
    #[serde(flatten)]
    pub record: TripRecord,
    #[serde(skip)]
    pub turnstile: TimeOfDay,
    #[serde(skip)]
    pub return_time: TimeOfDay,
    pub duration: TripDuration,
    pub has_annotation: bool,
}

impl MeasuredTrip {
    /// Validates a record, returning `None` when either required time is absent or unparseable.
    pub fn measure(record: &TripRecord) -> Option<Self> {
        let turnstile = parse_time_of_day(record.turnstile.as_deref()?).ok()?;
        let return_time = parse_time_of_day(record.return_time.as_deref()?).ok()?;

        Some(MeasuredTrip {
            record: record.clone(),
            turnstile,
            return_time,
            duration: compute_duration(turnstile, return_time),
            has_annotation: false,
        })
    }

    pub fn passenger_count(&self) -> u32 {
        self.record.passenger_count
    }
}

/// Keeps the records that can be measured, in input order.
pub fn filter_valid(records: &[TripRecord]) -> Vec<MeasuredTrip> {
    records
        .iter()
        .filter_map(|record| {
            let measured = MeasuredTrip::measure(record);
            if measured.is_none() {
                debug!(
                    line_id = %record.line_id,
                    turnstile = ?record.turnstile,
                    return_time = ?record.return_time,
                    "Dropping trip with unparseable turnstile/return"
                );
            }
            measured
        })
        .collect()
}

/// True when `note` contains `marker`, ignoring case and whitespace around the marker.
/// An absent note or a blank marker never matches.
pub fn note_has_marker(note: Option<&str>, marker: &str) -> bool {
    let marker = marker.trim();
    if marker.is_empty() {
        return false;
    }
    note.is_some_and(|n| n.to_lowercase().contains(&marker.to_lowercase()))
}

/// Sets `has_annotation` on every trip from its note.
pub fn annotate(trips: Vec<MeasuredTrip>, marker: &str) -> Vec<MeasuredTrip> {
    trips
        .into_iter()
        .map(|mut trip| {
            trip.has_annotation = note_has_marker(trip.record.note.as_deref(), marker);
            trip
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_valid_record() {
        let trip = MeasuredTrip::measure(&TripRecord::new("4:05", "7:50", "Odenilton", 24)).unwrap();
        assert_eq!(trip.duration.minutes, 225.0);
        assert!(!trip.has_annotation);
    }

    #[test]
    fn test_filter_valid_drops_bad_times_and_keeps_order() {
        let records = vec![
            TripRecord::new("4:05", "7:50", "A", 1),
            TripRecord::new("bad", "7:50", "B", 2),
            TripRecord {
                return_time: None,
                ..TripRecord::new("5:00", "6:00", "C", 3)
            },
            TripRecord::new("23:50", "00:10", "D", 4),
        ];

        let valid = filter_valid(&records);
        let drivers: Vec<_> = valid
            .iter()
            .map(|t| t.record.driver.as_deref().unwrap())
            .collect();
        assert_eq!(drivers, vec!["A", "D"]);
        assert_eq!(valid[1].duration.minutes, 20.0);
    }

    #[test]
    fn test_filter_valid_empty() {
        assert!(filter_valid(&[]).is_empty());
    }

    #[test]
    fn test_note_marker_case_insensitive() {
        assert!(note_has_marker(Some("rend - late"), "REND"));
        assert!(note_has_marker(Some("REND"), "REND"));
        assert!(note_has_marker(Some("Rend"), "rend"));
        assert!(!note_has_marker(Some("on time"), "REND"));
        assert!(!note_has_marker(None, "REND"));
    }

    #[test]
    fn test_note_marker_blank_or_padded() {
        assert!(!note_has_marker(Some("anything"), ""));
        assert!(!note_has_marker(Some("anything"), "   "));
        assert!(note_has_marker(Some("REND"), " REND "));
    }

    #[test]
    fn test_annotate_sets_flag() {
        let trips = filter_valid(&[
            TripRecord::new("4:05", "7:50", "A", 1).with_note("rend - late"),
            TripRecord::new("5:05", "8:50", "A", 1),
        ]);
        let annotated = annotate(trips, DEFAULT_ANNOTATION_MARKER);
        assert!(annotated[0].has_annotation);
        assert!(!annotated[1].has_annotation);
    }

    #[test]
    fn test_annotate_is_idempotent() {
        let trips = filter_valid(&[
            TripRecord::new("4:05", "7:50", "A", 1).with_note("REND"),
            TripRecord::new("5:05", "8:50", "B", 1),
        ]);
        let once = annotate(trips, DEFAULT_ANNOTATION_MARKER);
        let twice = annotate(once.clone(), DEFAULT_ANNOTATION_MARKER);
        assert_eq!(once, twice);
    }
}
