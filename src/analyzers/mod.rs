//! Trip grouping and aggregation.
//!
//! This module extracts category keys from measured trips, filters by the
//! selected category, and folds each group into counts, passenger totals,
//! and duration sums.

pub mod aggregate;
pub mod category;
pub mod types;
pub mod utility;
