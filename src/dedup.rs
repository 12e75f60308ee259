//! Corrupted-subject exclusion
//!
//! A mouse with two measurement rows at the same timepoint has an
//! unreliable record: there is no way to tell which observation is real.
//! The whole subject is excluded, not just the colliding rows, so a
//! corrupted mouse contributes zero records downstream. This is a data
//! finding, not an error; it is reported and logged at WARN.

use crate::model::CombinedRecord;
use rustc_hash::FxHashSet;
use serde::Serialize;

/// What the deduplication stage removed and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DedupReport {
    /// Mouse ids with more than one measurement at the same timepoint,
    /// sorted for deterministic output
    pub corrupted_mice: Vec<String>,
    /// Total combined rows removed (all rows of every corrupted mouse)
    pub rows_removed: usize,
}

impl DedupReport {
    /// True if no subject was excluded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.corrupted_mice.is_empty()
    }
}

/// Remove every row of every mouse that has duplicate timepoints.
///
/// If no duplicates exist the output equals the input. The output keeps,
/// for every surviving mouse, at most one row per timepoint.
#[must_use]
pub fn exclude_duplicate_mice(combined: &[CombinedRecord]) -> (Vec<CombinedRecord>, DedupReport) {
    let mut seen: FxHashSet<(&str, u32)> = FxHashSet::default();
    let mut corrupted: FxHashSet<&str> = FxHashSet::default();

    for row in combined {
        if let Some(timepoint) = row.timepoint() {
            if !seen.insert((row.mouse_id.as_str(), timepoint)) {
                corrupted.insert(row.mouse_id.as_str());
            }
        }
    }

    let clean: Vec<CombinedRecord> = combined
        .iter()
        .filter(|row| !corrupted.contains(row.mouse_id.as_str()))
        .cloned()
        .collect();

    let mut corrupted_mice: Vec<String> = corrupted.iter().map(ToString::to_string).collect();
    corrupted_mice.sort_unstable();

    let report = DedupReport {
        rows_removed: combined.len() - clean.len(),
        corrupted_mice,
    };

    if report.is_clean() {
        tracing::debug!(rows = clean.len(), "no duplicate timepoints found");
    } else {
        tracing::warn!(
            corrupted_mice = ?report.corrupted_mice,
            rows_removed = report.rows_removed,
            "excluding mice with duplicate timepoints"
        );
    }

    (clean, report)
}
