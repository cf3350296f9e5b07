use crate::record::MeasuredTrip;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A per-category accumulator over measured trips.
pub trait Metric {
    type Value: Default;

    fn accumulate(&self, acc: &mut Self::Value, trip: &MeasuredTrip);
}

/// Number of trips.
#[derive(Debug, Clone, Copy)]
pub struct Count;

/// Sum of `passenger_count`.
#[derive(Debug, Clone, Copy)]
pub struct PassengerTotal;

/// Sum of computed duration in hours.
#[derive(Debug, Clone, Copy)]
pub struct DurationHours;

impl Metric for Count {
    type Value = usize;

    fn accumulate(&self, acc: &mut usize, _trip: &MeasuredTrip) {
        *acc += 1;
    }
}

impl Metric for PassengerTotal {
    type Value = u64;

    fn accumulate(&self, acc: &mut u64, trip: &MeasuredTrip) {
        *acc += u64::from(trip.passenger_count());
    }
}

impl Metric for DurationHours {
    type Value = f64;

    fn accumulate(&self, acc: &mut f64, trip: &MeasuredTrip) {
        *acc += trip.duration.hours;
    }
}

/// Metric chosen at runtime, with every value widened to `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Count,
    Passengers,
    Hours,
}

impl Metric for MetricKind {
    type Value = f64;

    fn accumulate(&self, acc: &mut f64, trip: &MeasuredTrip) {
        *acc += match self {
            MetricKind::Count => 1.0,
            MetricKind::Passengers => f64::from(trip.passenger_count()),
            MetricKind::Hours => trip.duration.hours,
        };
    }
}

/// Groups trips by `key_fn` and folds each group with `metric`.
///
/// Trips without a key are skipped. Only keys present in the input appear in
/// the result, so an empty input gives an empty map.
pub fn group_and_aggregate<'a, I, K, M>(trips: I, key_fn: K, metric: M) -> BTreeMap<String, M::Value>
where
    I: IntoIterator<Item = &'a MeasuredTrip>,
    K: Fn(&MeasuredTrip) -> Option<String>,
    M: Metric,
{
    let mut groups: BTreeMap<String, M::Value> = BTreeMap::new();

    for trip in trips {
        let Some(key) = key_fn(trip) else {
            continue;
        };
        metric.accumulate(groups.entry(key).or_default(), trip);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::category::{CategoryKey, Selection, filter_by_category};
    use crate::record::{TripRecord, filter_valid};

    fn driver(trip: &MeasuredTrip) -> Option<String> {
        trip.record.driver.clone()
    }

    fn sample() -> Vec<MeasuredTrip> {
        filter_valid(&[
            TripRecord::new("4:05", "7:50", "Odenilton", 24),
            TripRecord::new("5:15", "8:55", "Odenilton", 22),
            TripRecord::new("6:25", "10:25", "Jessy", 44),
            TripRecord::new("bad", "10:25", "Jessy", 100),
        ])
    }

    #[test]
    fn test_count_per_driver() {
        let counts = group_and_aggregate(&sample(), driver, Count);
        assert_eq!(counts.get("Odenilton"), Some(&2));
        assert_eq!(counts.get("Jessy"), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_passenger_total_excludes_unparseable() {
        let totals = group_and_aggregate(&sample(), driver, PassengerTotal);
        assert_eq!(totals["Odenilton"], 46);
        assert_eq!(totals["Jessy"], 44);
    }

    #[test]
    fn test_duration_hours() {
        let hours = group_and_aggregate(&sample(), driver, DurationHours);
        assert!((hours["Odenilton"] - 445.0 / 60.0).abs() < 1e-9);
        assert!((hours["Jessy"] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_metric_kind_matches_typed_metrics() {
        let trips = sample();
        let counts = group_and_aggregate(&trips, driver, MetricKind::Count);
        let passengers = group_and_aggregate(&trips, driver, MetricKind::Passengers);
        assert_eq!(counts["Odenilton"], 2.0);
        assert_eq!(passengers["Odenilton"], 46.0);
    }

    #[test]
    fn test_empty_input_gives_empty_map() {
        let empty: Vec<MeasuredTrip> = Vec::new();
        assert!(group_and_aggregate(&empty, driver, Count).is_empty());
        assert!(group_and_aggregate(&empty, driver, DurationHours).is_empty());
    }

    #[test]
    fn test_keyless_trips_are_skipped() {
        let trips = filter_valid(&[TripRecord {
            driver: None,
            ..TripRecord::new("4:05", "7:50", "x", 5)
        }]);
        assert!(group_and_aggregate(&trips, driver, Count).is_empty());
    }

    #[test]
    fn test_aggregate_ignores_input_order() {
        let trips = sample();
        let mut reversed = trips.clone();
        reversed.reverse();
        assert_eq!(
            group_and_aggregate(&trips, driver, PassengerTotal),
            group_and_aggregate(&reversed, driver, PassengerTotal)
        );
    }

    #[test]
    fn test_all_selection_does_not_change_aggregate() {
        let key = CategoryKey::default();
        let trips = sample();
        let filtered = filter_by_category(&trips, |t| key.extract(t), &Selection::All);
        assert_eq!(
            group_and_aggregate(&filtered, |t| key.extract(t), PassengerTotal),
            group_and_aggregate(&trips, |t| key.extract(t), PassengerTotal)
        );
    }
}
