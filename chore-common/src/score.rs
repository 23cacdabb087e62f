//! Household cleanliness score

use chrono::{DateTime, Utc};

use crate::schedule::Recurring;

/// Mean freshness of all chores as a whole percentage (0-100)
///
/// An empty board scores 0: the denominator is never less than 1.
pub fn cleanliness_score<C: Recurring>(now: DateTime<Utc>, chores: &[C]) -> u8 {
    let total: f64 = chores.iter().map(|c| c.freshness_at(now)).sum();
    let mean = total / chores.len().max(1) as f64;
    (mean * 100.0).round().clamp(0.0, 100.0) as u8
}
