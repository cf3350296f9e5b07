//! The trip metrics engine: validated, annotated trips plus the query contract.

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::analyzers::aggregate::{Count, DurationHours, Metric, PassengerTotal, group_and_aggregate};
use crate::analyzers::category::{CategoryKey, Selection, filter_by_category};
use crate::analyzers::types::{AnnotationRatio, QueryResult};
use crate::config::EngineConfig;
use crate::record::{MeasuredTrip, TripRecord, annotate, filter_valid};

/// Holds the measured trips of one input batch. Immutable after construction,
/// so a single instance can be shared between threads.
#[derive(Debug, Clone)]
pub struct TripMetricsEngine {
    trips: Vec<MeasuredTrip>,
    key: CategoryKey,
    dropped: usize,
}

impl TripMetricsEngine {
    pub fn new(records: &[TripRecord], config: &EngineConfig) -> Self {
        let trips = annotate(filter_valid(records), &config.annotation_marker);
        let dropped = records.len() - trips.len();

        info!(
            records = records.len(),
            measured = trips.len(),
            dropped,
            "Trip batch loaded"
        );

        TripMetricsEngine {
            trips,
            key: config.category_key(),
            dropped,
        }
    }

    pub fn trips(&self) -> &[MeasuredTrip] {
        &self.trips
    }

    /// Records removed because turnstile or return did not parse.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn category_key(&self) -> CategoryKey {
        self.key
    }

    /// Distinct category values, sorted. These are the valid `Selection::Only` choices.
    pub fn categories(&self) -> Vec<String> {
        self.trips
            .iter()
            .filter_map(|t| self.key.extract(t))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Trips matching `selection`.
    pub fn filter(&self, selection: &Selection) -> Vec<MeasuredTrip> {
        let selection = self.key.selection(selection);
        filter_by_category(&self.trips, |t| self.key.extract(t), &selection)
    }

    /// Aggregates `metric` per category over the trips matching `selection`.
    pub fn aggregate<M: Metric>(&self, selection: &Selection, metric: M) -> BTreeMap<String, M::Value> {
        group_and_aggregate(&self.filter(selection), |t| self.key.extract(t), metric)
    }

    /// Runs every aggregate over one filtered view.
    #[tracing::instrument(skip(self, selection), fields(selection = %selection))]
    pub fn query(&self, selection: &Selection) -> QueryResult {
        let filtered = self.filter(selection);
        let key_fn = |t: &MeasuredTrip| self.key.extract(t);

        let result = QueryResult {
            selection: selection.to_string(),
            per_category_counts: group_and_aggregate(&filtered, key_fn, Count),
            per_category_duration_hours: group_and_aggregate(&filtered, key_fn, DurationHours),
            per_category_passenger_totals: group_and_aggregate(&filtered, key_fn, PassengerTotal),
            annotation_ratio: AnnotationRatio::from_trips(&filtered),
            filtered_records: filtered,
        };

        if result.is_empty() {
            info!("No trips for selection");
        } else {
            debug!(
                trips = result.filtered_records.len(),
                categories = result.per_category_counts.len(),
                "Query complete"
            );
        }

        result
    }
}
