//! Result types returned by the query contract.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::analyzers::utility::share;
use crate::record::MeasuredTrip;

/// Annotated vs. plain trips within a filtered view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AnnotationRatio {
    pub annotated: usize,
    pub plain: usize,
    /// `annotated / (annotated + plain)`, 0.0 for an empty view.
    pub share: f64,
}

impl AnnotationRatio {
    pub fn from_trips(trips: &[MeasuredTrip]) -> Self {
        let annotated = trips.iter().filter(|t| t.has_annotation).count();
        AnnotationRatio {
            annotated,
            plain: trips.len() - annotated,
            share: share(annotated, trips.len()),
        }
    }

    pub fn total(&self) -> usize {
        self.annotated + self.plain
    }
}

/// Everything a presentation layer needs for one category selection.
///
/// All maps are computed over `filtered_records`.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub selection: String,
    pub filtered_records: Vec<MeasuredTrip>,
    pub per_category_counts: BTreeMap<String, usize>,
    pub per_category_duration_hours: BTreeMap<String, f64>,
    pub per_category_passenger_totals: BTreeMap<String, u64>,
    pub annotation_ratio: AnnotationRatio,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.filtered_records.is_empty()
    }

    /// One row per category, in key order.
    pub fn summaries(&self) -> Vec<CategorySummary> {
        self.per_category_counts
            .iter()
            .map(|(category, trips)| CategorySummary {
                selection: self.selection.clone(),
                category: category.clone(),
                trips: *trips,
                passengers: self
                    .per_category_passenger_totals
                    .get(category)
                    .copied()
                    .unwrap_or_default(),
                duration_hours: self
                    .per_category_duration_hours
                    .get(category)
                    .copied()
                    .unwrap_or_default(),
            })
            .collect()
    }
}

/// Flat per-category row, written to the summary CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub selection: String,
    pub category: String,
    pub trips: usize,
    pub passengers: u64,
    pub duration_hours: f64,
}

/// Flat row of the filtered trip table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRow {
    pub line_id: String,
    pub vehicle_id: String,
    pub departure: Option<String>,
    pub entry: Option<String>,
    pub exit: Option<String>,
    pub elapsed_minutes: Option<u32>,
    pub turnstile: String,
    #[serde(rename = "return")]
    pub return_time: String,
    pub driver: Option<String>,
    pub collector: Option<String>,
    pub passenger_count: u32,
    pub note: Option<String>,
    pub duration_minutes: f64,
    pub duration_hours: f64,
    pub has_annotation: bool,
}

impl From<&MeasuredTrip> for TripRow {
    fn from(trip: &MeasuredTrip) -> Self {
        let r = &trip.record;
        TripRow {
            line_id: r.line_id.clone(),
            vehicle_id: r.vehicle_id.clone(),
            departure: r.departure.clone(),
            entry: r.entry.clone(),
            exit: r.exit.clone(),
            elapsed_minutes: r.elapsed_minutes,
            turnstile: trip.turnstile.format("%H:%M").to_string(),
            return_time: trip.return_time.format("%H:%M").to_string(),
            driver: r.driver.clone(),
            collector: r.collector.clone(),
            passenger_count: r.passenger_count,
            note: r.note.clone(),
            duration_minutes: trip.duration.minutes,
            duration_hours: trip.duration.hours,
            has_annotation: trip.has_annotation,
        }
    }
}
