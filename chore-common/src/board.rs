//! Board ordering and filtering policy
//!
//! Chores sort by due status (OVERDUE, DUE, FRESH) and then by title. Views
//! filter the sorted list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::models::Chore;
use crate::schedule::{DueStatus, Recurring};
use crate::score::cleanliness_score;
use crate::workflow::{ChecklistProgress, ChecklistState};

/// Something that can be placed on the board
pub trait BoardItem: Recurring {
    fn title(&self) -> &str;
}

impl BoardItem for Chore {
    fn title(&self) -> &str {
        &self.title
    }
}

/// Which slice of the sorted board to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ViewFilter {
    /// OVERDUE and DUE chores
    #[default]
    Due,
    All,
    /// FRESH chores only
    Fresh,
}

impl ViewFilter {
    pub fn admits(&self, status: DueStatus) -> bool {
        match self {
            ViewFilter::All => true,
            ViewFilter::Due => status.is_due_like(),
            ViewFilter::Fresh => !status.is_due_like(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewFilter::Due => "DUE",
            ViewFilter::All => "ALL",
            ViewFilter::Fresh => "FRESH",
        }
    }
}

impl fmt::Display for ViewFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewFilter {
    type Err = String;

    /// Case-insensitive, so query strings may use `?filter=due`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DUE" => Ok(ViewFilter::Due),
            "ALL" => Ok(ViewFilter::All),
            "FRESH" => Ok(ViewFilter::Fresh),
            _ => Err(format!("unknown view filter {:?}", s)),
        }
    }
}

/// Title comparison used for the tie-break
///
/// Approximates a locale collation: case is ignored first, and exact code
/// point order only separates titles that differ by case alone.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Board order at `now`: status rank, then title
pub fn compare_at<C: BoardItem>(now: DateTime<Utc>, a: &C, b: &C) -> Ordering {
    a.status_at(now)
        .rank()
        .cmp(&b.status_at(now).rank())
        .then_with(|| compare_titles(a.title(), b.title()))
}

/// Stable sort of `chores` into board order
pub fn sort_chores<C: BoardItem>(now: DateTime<Utc>, chores: &mut [C]) {
    chores.sort_by(|a, b| compare_at(now, a, b));
}

/// Sorted references to the chores admitted by `filter`
pub fn visible<C: BoardItem>(now: DateTime<Utc>, chores: &[C], filter: ViewFilter) -> Vec<&C> {
    let mut sorted: Vec<&C> = chores.iter().collect();
    sorted.sort_by(|a, b| compare_at(now, *a, *b));
    sorted.retain(|c| filter.admits(c.status_at(now)));
    sorted
}

/// One row of the rendered board
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardRow {
    pub chore: Chore,
    pub status: DueStatus,
    pub freshness: f64,
    pub next_due_at: Option<DateTime<Utc>>,
    pub checklist: ChecklistProgress,
}

/// Snapshot of the board for one classification pass
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub now: DateTime<Utc>,
    pub filter: ViewFilter,
    /// Cleanliness over every chore, not just the visible ones
    pub cleanliness: u8,
    pub count: usize,
    pub rows: Vec<BoardRow>,
}

/// Classify, sort and filter the whole board against a single `now`
pub fn build_view(
    now: DateTime<Utc>,
    chores: &[Chore],
    filter: ViewFilter,
    checklist: &ChecklistState,
) -> BoardView {
    let rows: Vec<BoardRow> = visible(now, chores, filter)
        .into_iter()
        .map(|chore| BoardRow {
            status: chore.status_at(now),
            freshness: chore.freshness_at(now),
            next_due_at: chore.next_due_at(),
            checklist: checklist.progress(chore),
            chore: chore.clone(),
        })
        .collect();

    BoardView {
        now,
        filter,
        cleanliness: cleanliness_score(now, chores),
        count: rows.len(),
        rows,
    }
}
