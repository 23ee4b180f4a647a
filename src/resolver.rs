//! Key-position resolution for positionally encoded stat tables.
//!
//! Several providers ship a record group as a labels array plus one values
//! array per record. Column order and naming drift between responses, so
//! each group is resolved against its own labels once, then every row in
//! the group is read through the resolved positions.
//!
//! Matching per target: an exact (case-insensitive) label match on any
//! needle wins; otherwise the first label that contains any needle, where
//! short abbreviations must appear as a whole `_`/`-` separated token. A
//! target with no match stays absent and reads as 0 for every row.

use serde_json::Value;

use crate::adapters::{float_of, stat_u32, text_of};

/// A named statistic and the label fragments that identify it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatTarget {
    pub name: &'static str,
    pub needles: &'static [&'static str],
}

impl StatTarget {
    pub const fn new(name: &'static str, needles: &'static [&'static str]) -> Self {
        Self { name, needles }
    }
}

/// Needles this short are abbreviations and need a whole-token match.
const SHORT_NEEDLE: usize = 3;

pub const POINTS: StatTarget = StatTarget::new("points", &["points", "pts"]);
pub const REBOUNDS: StatTarget = StatTarget::new("rebounds", &["rebounds", "reb"]);
pub const ASSISTS: StatTarget = StatTarget::new("assists", &["assists", "ast"]);
pub const MINUTES: StatTarget = StatTarget::new("minutes", &["minutes", "min"]);

/// Positions resolved for one record group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPositions {
    slots: Vec<(&'static str, Option<usize>)>,
}

impl KeyPositions {
    /// Scan `labels` once and record the index of each target.
    pub fn resolve<S: AsRef<str>>(labels: &[S], targets: &[StatTarget]) -> Self {
        let lowered: Vec<String> = labels.iter().map(|l| l.as_ref().to_lowercase()).collect();
        let slots = targets
            .iter()
            .map(|target| (target.name, Self::locate(&lowered, target)))
            .collect();
        Self { slots }
    }

    /// Resolve from a JSON array of label strings. Non-string entries keep
    /// their position but never match.
    pub fn resolve_json(labels: &Value, targets: &[StatTarget]) -> Self {
        let labels: Vec<String> = labels
            .as_array()
            .map(|arr| arr.iter().map(|v| v.as_str().unwrap_or_default().to_string()).collect())
            .unwrap_or_default();
        Self::resolve(&labels, targets)
    }

    fn locate(lowered: &[String], target: &StatTarget) -> Option<usize> {
        let needles: Vec<String> = target.needles.iter().map(|n| n.to_lowercase()).collect();
        lowered
            .iter()
            .position(|label| needles.iter().any(|n| label == n))
            .or_else(|| {
                lowered
                    .iter()
                    .position(|label| needles.iter().any(|n| Self::partial_match(label, n)))
            })
    }

    /// Abbreviations only match a whole token, so `min` never lands on
    /// `plusminus` and `ast` never lands on `fastbreakpoints`.
    fn partial_match(label: &str, needle: &str) -> bool {
        if needle.len() <= SHORT_NEEDLE {
            label.split(|c: char| !c.is_ascii_alphanumeric()).any(|token| token == needle)
        } else {
            label.contains(needle)
        }
    }

    /// Resolved index for a target name, `None` when absent or unknown.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.slots
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, idx)| *idx)
    }

    pub fn is_resolved(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Raw cell for `name` in `row`, if both the position and the cell exist.
    pub fn cell<'a>(&self, name: &str, row: &'a [Value]) -> Option<&'a Value> {
        self.index_of(name).and_then(|idx| row.get(idx))
    }

    /// Numeric stat for `name`; absent positions and sentinels read as 0.
    pub fn count(&self, name: &str, row: &[Value]) -> u32 {
        self.cell(name, row).map(stat_u32).unwrap_or(0)
    }

    /// Text cell for `name`; absent positions read as empty.
    pub fn text(&self, name: &str, row: &[Value]) -> String {
        self.cell(name, row).map(text_of).unwrap_or_default()
    }

    /// Float cell for `name`; absent or non-numeric cells read as 0.0.
    pub fn float(&self, name: &str, row: &[Value]) -> f64 {
        self.cell(name, row).and_then(float_of).unwrap_or(0.0)
    }
}
