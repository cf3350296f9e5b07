//! Built-in datasets from the Largo de Osasco inspection report.

use anyhow::Result;
use serde::Serialize;

use crate::record::TripRecord;
use crate::time::{TimeOfDay, parse_time_of_day, serialize_hhmm};

// line, vehicle, departure, entry, exit, elapsed, turnstile, return, driver, passengers, note
type LogRow<'a> = (&'a str, &'a str, &'a str, &'a str, &'a str, u32, &'a str, &'a str, &'a str, u32, Option<&'a str>);

const TRIP_LOG: &[LogRow<'static>] = &[
    ("329", "329", "4:05", "4:05", "4:49", 44, "4:05", "7:50", "Odenilton", 24, None),
    ("329", "330", "5:15", "5:15", "5:56", 46, "5:15", "8:55", "Odenilton", 22, None),
    ("329", "329", "6:25", "6:15", "7:22", 67, "6:25", "10:25", "Jessy", 44, None),
    ("329", "329", "7:50", "7:30", "8:15", 45, "7:50", "12:00", "Jessy", 16, None),
    ("329", "330", "8:55", "8:55", "9:04", 54, "8:55", "13:30", "Odenilton", 17, None),
    ("330", "329", "10:25", "9:10", "10:04", 48, "10:25", "14:40", "Odenilton", 13, None),
    ("329", "330", "12:00", "10:45", "11:33", 51, "12:00", "15:50", "Odenilton", 15, None),
    ("330", "329", "13:30", "12:15", "13:06", 45, "13:30", "17:05", "Odenilton", 8, None),
    ("329", "329", "14:40", "13:25", "14:10", 47, "14:40", "18:20", "L Daniel", 15, Some("REND")),
    ("329", "329", "15:50", "14:35", "15:22", 47, "15:50", "19:35", "Dantas", 17, None),
    ("329", "329", "17:05", "15:45", "16:32", 52, "17:05", "20:50", "S DANIEL", 17, None),
    ("329", "329", "18:20", "17:00", "17:52", 46, "18:20", "22:25", "Dantas", 17, None),
    ("329", "330", "19:35", "18:15", "19:01", 52, "19:35", "23:40", "S DANIEL", 19, None),
];

/// The reference trip log. In this report the collector column repeats the driver.
pub fn reference_trips() -> Vec<TripRecord> {
    TRIP_LOG
        .iter()
        .map(
            |&(line, vehicle, departure, entry, exit, elapsed, turnstile, ret, driver, passengers, note)| {
                TripRecord {
                    line_id: line.to_string(),
                    vehicle_id: vehicle.to_string(),
                    departure: Some(departure.to_string()),
                    entry: Some(entry.to_string()),
                    exit: Some(exit.to_string()),
                    elapsed_minutes: Some(elapsed),
                    turnstile: Some(turnstile.to_string()),
                    return_time: Some(ret.to_string()),
                    driver: Some(driver.to_string()),
                    collector: Some(driver.to_string()),
                    passenger_count: passengers,
                    note: note.map(str::to_string),
                }
            },
        )
        .collect()
}

/// Fleet figures for one operating unit on Sundays and holidays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetUnit {
    pub unit: String,
    pub average_fleet: f64,
    pub total_trips: u32,
}

pub fn fleet_summary() -> Vec<FleetUnit> {
    [
        ("Intermunicipal G1", 42.0, 598),
        ("Municipal Osasco G4", 45.0, 715),
        ("Seletivo G4", 2.0, 20),
        ("Total Osasco G1+G4", 89.0, 1333),
        ("Intermunicipal G5", 23.5, 259),
        ("Total Santana G5", 44.5, 528),
    ]
    .into_iter()
    .map(|(unit, average_fleet, total_trips)| FleetUnit {
        unit: unit.to_string(),
        average_fleet,
        total_trips,
    })
    .collect()
}

/// Share of scheduled trips actually run on one day, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComplianceDay {
    pub day: u8,
    pub nucleus_1: f64,
    pub nucleus_4: f64,
    pub nucleus_5: f64,
    pub combined: f64,
}

/// One compliance column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceSeries {
    Nucleus1,
    Nucleus4,
    Nucleus5,
    Combined,
}

impl ComplianceDay {
    pub fn value(&self, series: ComplianceSeries) -> f64 {
        match series {
            ComplianceSeries::Nucleus1 => self.nucleus_1,
            ComplianceSeries::Nucleus4 => self.nucleus_4,
            ComplianceSeries::Nucleus5 => self.nucleus_5,
            ComplianceSeries::Combined => self.combined,
        }
    }
}

/// Trip compliance, January to August 2025, by day.
pub fn schedule_compliance() -> Vec<ComplianceDay> {
    [
        (1, 99.66, 99.41, 94.48, 98.24),
        (2, 100.00, 99.59, 98.30, 99.35),
        (3, 99.50, 99.60, 99.12, 99.42),
        (4, 99.56, 99.78, 99.59, 99.65),
        (5, 99.89, 99.83, 99.73, 99.82),
    ]
    .into_iter()
    .map(|(day, nucleus_1, nucleus_4, nucleus_5, combined)| ComplianceDay {
        day,
        nucleus_1,
        nucleus_4,
        nucleus_5,
        combined,
    })
    .collect()
}

/// `(day, value)` points for one compliance column.
pub fn compliance_series(days: &[ComplianceDay], series: ComplianceSeries) -> Vec<(u8, f64)> {
    days.iter().map(|d| (d.day, d.value(series))).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlowSample {
    #[serde(serialize_with = "serialize_hhmm")]
    pub hour: TimeOfDay,
    pub passengers: u32,
}

const LINE_378TRO_FLOW: &[(&str, u32)] = &[
    ("04:40", 34),
    ("05:00", 30),
    ("05:30", 31),
    ("05:45", 45),
    ("06:00", 26),
];

/// Passenger counts on line 378TRO, ordered by time of day.
pub fn passenger_flow() -> Result<Vec<FlowSample>> {
    parse_flow(LINE_378TRO_FLOW)
}

/// Parses `(HH:MM, passengers)` pairs and sorts them by time.
pub fn parse_flow(samples: &[(&str, u32)]) -> Result<Vec<FlowSample>> {
    let mut flow = samples
        .iter()
        .map(|&(hour, passengers)| -> Result<FlowSample> {
            Ok(FlowSample {
                hour: parse_time_of_day(hour)?,
                passengers,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    flow.sort_by_key(|s| s.hour);
    Ok(flow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_trips_shape() {
        let trips = reference_trips();
        assert_eq!(trips.len(), 13);
        assert_eq!(trips.iter().filter(|t| t.note.is_some()).count(), 1);
        assert_eq!(trips.iter().map(|t| t.passenger_count).sum::<u32>(), 244);
    }

    #[test]
    fn test_fleet_summary() {
        let fleet = fleet_summary();
        assert_eq!(fleet.len(), 6);
        assert_eq!(fleet[3].unit, "Total Osasco G1+G4");
        assert_eq!(fleet[3].total_trips, 1333);
    }

    #[test]
    fn test_compliance_series() {
        let days = schedule_compliance();
        let combined = compliance_series(&days, ComplianceSeries::Combined);
        assert_eq!(combined.first(), Some(&(1, 98.24)));
        assert_eq!(combined.len(), 5);
        assert_eq!(days[1].value(ComplianceSeries::Nucleus1), 100.0);
    }

    #[test]
    fn test_passenger_flow_sorted() {
        let flow = passenger_flow().unwrap();
        assert_eq!(flow.len(), 5);
        assert!(flow.windows(2).all(|w| w[0].hour <= w[1].hour));
    }

    #[test]
    fn test_parse_flow_sorts_unordered_input() {
        let flow = parse_flow(&[("06:00", 1), ("4:40", 2)]).unwrap();
        assert_eq!(flow[0].passengers, 2);
    }

    #[test]
    fn test_parse_flow_rejects_bad_hour() {
        assert!(parse_flow(&[("6h", 1)]).is_err());
    }

    #[test]
    fn test_flow_serializes_hhmm() {
        let flow = parse_flow(&[("4:40", 34)]).unwrap();
        let json = serde_json::to_string(&flow[0]).unwrap();
        assert_eq!(json, r#"{"hour":"04:40","passengers":34}"#);
    }
}
