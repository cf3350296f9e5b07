//! Category keys and the category selection filter.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::record::MeasuredTrip;

/// Record field used to group trips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CategoryField {
    #[default]
    Driver,
    Collector,
    Line,
    Vehicle,
}

/// How category values are compared.
///
/// `Exact` leaves labels untouched, so `"S DANIEL"` and `"S Daniel"` are two
/// categories. `Folded` trims, collapses runs of whitespace and upper-cases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum KeyNormalization {
    #[default]
    Exact,
    Folded,
}

impl KeyNormalization {
    pub fn apply(&self, value: &str) -> String {
        match self {
            KeyNormalization::Exact => value.to_string(),
            KeyNormalization::Folded => value
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_uppercase(),
        }
    }
}

/// Extracts the grouping key from a trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryKey {
    pub field: CategoryField,
    pub normalization: KeyNormalization,
}

impl CategoryKey {
    pub fn new(field: CategoryField, normalization: KeyNormalization) -> Self {
        CategoryKey {
            field,
            normalization,
        }
    }

    /// Returns `None` when the field is absent or blank.
    pub fn extract(&self, trip: &MeasuredTrip) -> Option<String> {
        let record = &trip.record;
        let raw = match self.field {
            CategoryField::Driver => record.driver.as_deref(),
            CategoryField::Collector => record.collector.as_deref(),
            CategoryField::Line => Some(record.line_id.as_str()),
            CategoryField::Vehicle => Some(record.vehicle_id.as_str()),
        }?;

        if raw.trim().is_empty() {
            return None;
        }
        Some(self.normalization.apply(raw))
    }

    /// Normalizes a selection the same way keys are normalized.
    pub fn selection(&self, selection: &Selection) -> Selection {
        match selection {
            Selection::All => Selection::All,
            Selection::Only(value) => Selection::Only(self.normalization.apply(value)),
        }
    }
}

/// Category chosen by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub const ALL_TOKEN: &'static str = "ALL";
}

impl FromStr for Selection {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::ALL_TOKEN {
            Ok(Selection::All)
        } else {
            Ok(Selection::Only(s.to_string()))
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(Self::ALL_TOKEN),
            Selection::Only(value) => f.write_str(value),
        }
    }
}

/// Keeps trips whose key equals the selection. `Selection::All` keeps everything,
/// including trips with no key.
pub fn filter_by_category<K>(trips: &[MeasuredTrip], key_fn: K, selected: &Selection) -> Vec<MeasuredTrip>
where
    K: Fn(&MeasuredTrip) -> Option<String>,
{
    match selected {
        Selection::All => trips.to_vec(),
        Selection::Only(value) => trips
            .iter()
            .filter(|trip| key_fn(*trip).as_deref() == Some(value.as_str()))
            .cloned()
            .collect(),
    }
}
