//! Time-of-day parsing and trip duration with midnight rollover.

use chrono::NaiveTime;
use serde::Serialize;
use thiserror::Error;

/// Wall-clock time within a single operational day. No date, no timezone.
pub type TimeOfDay = NaiveTime;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// A time field that could not be read as `HH:MM`.
///
/// Recoverable: callers drop the record instead of propagating this.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time of day {input:?}, expected HH:MM")]
pub struct ParseFailure {
    pub input: String,
}

/// Parses a 24-hour `HH:MM` value (a single-digit hour such as `4:05` is accepted).
pub fn parse_time_of_day(text: &str) -> Result<TimeOfDay, ParseFailure> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M").map_err(|_| ParseFailure {
        input: text.to_string(),
    })
}

/// Elapsed time between turnstile and return.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripDuration {
    pub minutes: f64,
    pub hours: f64,
}

/// Computes `return_ - turnstile`, adding a full day when the trip crosses midnight.
///
/// Result is always in `[0, 1440)` minutes. A shift spanning more than one
/// midnight cannot be represented and yields the wrong value.
pub fn compute_duration(turnstile: TimeOfDay, return_: TimeOfDay) -> TripDuration {
    let mut delta = return_.signed_duration_since(turnstile).num_minutes();
    if delta < 0 {
        delta += MINUTES_PER_DAY;
    }

    let minutes = delta as f64;
    TripDuration {
        minutes,
        hours: minutes / 60.0,
    }
}

/// Serializes a [`TimeOfDay`] as `HH:MM`.
pub(crate) fn serialize_hhmm<S>(time: &TimeOfDay, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&time.format("%H:%M"))
}
