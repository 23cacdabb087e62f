//! Due-status and freshness scheduling model
//!
//! Pure functions mapping `(now, last_done_at, frequency)` to a [`DueStatus`]
//! and a freshness score in `[0, 1]`. Periods are fixed durations: a month is
//! always 30 days.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Recurrence period of a chore
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub const ALL: [Frequency; 3] = [Frequency::Daily, Frequency::Weekly, Frequency::Monthly];

    /// Storage / wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a frequency string is not one of the three known values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFrequency(pub String);

impl fmt::Display for UnknownFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown frequency {:?}", self.0)
    }
}

impl std::error::Error for UnknownFrequency {}

impl FromStr for Frequency {
    type Err = UnknownFrequency;

    /// Exact match only; "daily" is rejected just like any other unknown value
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DAILY" => Ok(Frequency::Daily),
            "WEEKLY" => Ok(Frequency::Weekly),
            "MONTHLY" => Ok(Frequency::Monthly),
            other => Err(UnknownFrequency(other.to_string())),
        }
    }
}

/// Urgency classification of a chore
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DueStatus {
    Overdue,
    Due,
    Fresh,
}

impl DueStatus {
    /// Sort rank: OVERDUE < DUE < FRESH
    pub fn rank(&self) -> u8 {
        match self {
            DueStatus::Overdue => 0,
            DueStatus::Due => 1,
            DueStatus::Fresh => 2,
        }
    }

    /// OVERDUE and DUE both need doing
    pub fn is_due_like(&self) -> bool {
        !matches!(self, DueStatus::Fresh)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DueStatus::Overdue => "Overdue",
            DueStatus::Due => "Due",
            DueStatus::Fresh => "Fresh",
        }
    }
}

/// Fixed length of one recurrence period
pub fn period_duration(frequency: Frequency) -> Duration {
    match frequency {
        Frequency::Daily => Duration::days(1),
        Frequency::Weekly => Duration::days(7),
        Frequency::Monthly => Duration::days(30),
    }
}

/// Instant the chore becomes due again; `None` for never-done chores
pub fn next_due_at(last_done_at: Option<DateTime<Utc>>, frequency: Frequency) -> Option<DateTime<Utc>> {
    last_done_at.map(|done| done + period_duration(frequency))
}

/// Classify a chore at `now`
///
/// Never-done chores are always OVERDUE. The due instant itself counts as DUE.
pub fn due_status(now: DateTime<Utc>, last_done_at: Option<DateTime<Utc>>, frequency: Frequency) -> DueStatus {
    if last_done_at.is_none() {
        return DueStatus::Overdue;
    }
    match next_due_at(last_done_at, frequency) {
        None => DueStatus::Overdue,
        Some(due) if now >= due => DueStatus::Due,
        Some(_) => DueStatus::Fresh,
    }
}

/// Linear decay from 1.0 at completion to 0.0 one period later, clamped to `[0, 1]`
pub fn freshness(now: DateTime<Utc>, last_done_at: Option<DateTime<Utc>>, frequency: Frequency) -> f64 {
    let Some(done) = last_done_at else {
        return 0.0;
    };
    let period = period_duration(frequency).num_milliseconds() as f64;
    let elapsed = (now - done).num_milliseconds() as f64;
    (1.0 - elapsed / period).clamp(0.0, 1.0)
}

/// Anything that recurs on a fixed frequency from a last-completion instant
pub trait Recurring {
    fn frequency(&self) -> Frequency;
    fn last_done_at(&self) -> Option<DateTime<Utc>>;

    fn next_due_at(&self) -> Option<DateTime<Utc>> {
        next_due_at(self.last_done_at(), self.frequency())
    }

    fn status_at(&self, now: DateTime<Utc>) -> DueStatus {
        due_status(now, self.last_done_at(), self.frequency())
    }

    fn freshness_at(&self, now: DateTime<Utc>) -> f64 {
        freshness(now, self.last_done_at(), self.frequency())
    }
}
