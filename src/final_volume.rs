//! Final-timepoint extraction
//!
//! Reduces the combined table to one row per mouse: the observation at
//! that mouse's maximum timepoint, relabelled as the final tumor volume.
//! Runs on the pre-deduplication combined table; callers wanting cleaned
//! finals pass the clean table instead.

use crate::model::{CombinedRecord, FinalTumorRecord};
use rustc_hash::FxHashMap;

/// Select, for each mouse, the row at its maximum observed timepoint.
///
/// Mice with no measurements contribute nothing. When several rows share
/// a mouse's maximum timepoint the first in input order wins; the
/// tie-break is implementation-defined and deliberately documented here
/// rather than assumed meaningful.
///
/// Guarantee: exactly one output row per mouse with at least one
/// observation, in first-appearance order.
#[must_use]
pub fn final_tumor_volumes(combined: &[CombinedRecord]) -> Vec<FinalTumorRecord> {
    // (row index, timepoint) of the current maximum per mouse
    let mut best: FxHashMap<&str, (usize, u32)> = FxHashMap::default();
    let mut order: Vec<&str> = Vec::new();

    for (idx, row) in combined.iter().enumerate() {
        let Some(timepoint) = row.timepoint() else {
            continue;
        };
        if let Some(&(_, current)) = best.get(row.mouse_id.as_str()) {
            // strict inequality keeps the first row on ties
            if timepoint > current {
                best.insert(row.mouse_id.as_str(), (idx, timepoint));
            }
        } else {
            best.insert(row.mouse_id.as_str(), (idx, timepoint));
            order.push(row.mouse_id.as_str());
        }
    }

    let mut finals = Vec::with_capacity(order.len());
    for mouse_id in order {
        let (idx, _) = best[mouse_id];
        let row = &combined[idx];
        if let Some(measurement) = &row.measurement {
            finals.push(FinalTumorRecord {
                mouse_id: row.mouse_id.clone(),
                mouse: row.mouse.clone(),
                timepoint: measurement.timepoint,
                final_tumor_volume_mm3: measurement.tumor_volume_mm3,
                metastatic_sites: measurement.metastatic_sites,
            });
        }
    }

    tracing::debug!(mice = finals.len(), "extracted final tumor volumes");
    finals
}
