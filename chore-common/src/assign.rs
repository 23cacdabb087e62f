//! Assignee hints in free-text chore titles
//!
//! Best-effort sugar for the chore editor: "Mop - assigned to Porter" becomes
//! the title "Mop" with Porter hinted, and a lone initial such as the "B" in
//! "Laundry B" hints Brickley. Hints only ever add to an explicit selection.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ChoreInput, Person, PersonSeed, SubtaskInput};
use crate::schedule::Frequency;

/// Trailing "- assigned to X" / "— for X" clause
static ASSIGNED_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.*?)(\s*[-–—]\s*(assigned\s+to|for)\s+.*)$").expect("static regex")
});

/// A roster member the parser can recognise
pub trait RosterMember {
    fn name(&self) -> &str;
    fn initials(&self) -> &str;
}

impl RosterMember for Person {
    fn name(&self) -> &str {
        &self.name
    }
    fn initials(&self) -> &str {
        &self.initials
    }
}

impl RosterMember for PersonSeed {
    fn name(&self) -> &str {
        &self.name
    }
    fn initials(&self) -> &str {
        &self.initials
    }
}

/// Title with any explicit assignment clause removed, plus advisory hints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedTitle {
    pub title: String,
    /// Names of hinted roster members, in roster order
    pub hinted: Vec<String>,
}

impl ParsedTitle {
    pub fn is_hinted(&self, name: &str) -> bool {
        self.hinted.iter().any(|n| n == name)
    }
}

/// Whole-word, case-insensitive match of the member's name or initials
fn mentions<M: RosterMember>(text: &str, member: &M) -> bool {
    let mut alternatives = vec![regex::escape(member.name().trim())];
    let initials = member.initials().trim();
    if !initials.is_empty() {
        alternatives.push(regex::escape(initials));
    }
    alternatives.retain(|a| !a.is_empty());
    if alternatives.is_empty() {
        return false;
    }

    match Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|"))) {
        Ok(re) => re.is_match(text),
        Err(_) => false,
    }
}

/// Detect assignee hints and strip an explicit trailing assignment clause
///
/// Without the "- assigned to" / "- for" suffix the title is kept whole, even
/// when it contains a name or initial.
pub fn parse_assigned<M: RosterMember>(input: &str, roster: &[M]) -> ParsedTitle {
    let raw = input.trim();

    let hinted = roster
        .iter()
        .filter(|member| mentions(raw, *member))
        .map(|member| member.name().to_string())
        .collect();

    let title = ASSIGNED_CLAUSE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map_or(raw, |m| m.as_str())
        .trim()
        .to_string();

    ParsedTitle { title, hinted }
}

/// Explicit selection OR parser hints, as ids in roster order
pub fn resolve_assignees(selected: &[Uuid], parsed: &ParsedTitle, roster: &[Person]) -> Vec<Uuid> {
    roster
        .iter()
        .filter(|p| selected.contains(&p.id) || parsed.is_hinted(&p.name))
        .map(|p| p.id)
        .collect()
}

/// Editor helper: one subtask per line or `;`-separated item, blanks dropped
pub fn split_subtasks(text: &str) -> Vec<String> {
    text.split(['\n', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Free-form editor state before it becomes a [`ChoreInput`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoreDraft {
    pub title: String,
    pub frequency: Frequency,
    /// Assignees ticked explicitly in the editor
    #[serde(default)]
    pub assignee_ids: Vec<Uuid>,
    /// Newline or `;` separated subtasks
    #[serde(default)]
    pub subtasks_text: String,
}

impl ChoreDraft {
    /// Apply title parsing, hint merging and subtask splitting
    pub fn to_input(&self, roster: &[Person]) -> ChoreInput {
        let parsed = parse_assigned(&self.title, roster);
        let assignee_ids = resolve_assignees(&self.assignee_ids, &parsed, roster);

        ChoreInput {
            title: parsed.title,
            frequency: self.frequency.as_str().to_string(),
            assignee_ids: assignee_ids.iter().map(Uuid::to_string).collect(),
            subtasks: split_subtasks(&self.subtasks_text)
                .into_iter()
                .map(|text| SubtaskInput { text })
                .collect(),
        }
    }
}
