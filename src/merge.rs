//! Full outer join of the two study tables
//!
//! Joins metadata and measurements on `mouse_id` without dropping a row
//! from either side. The output order is deterministic: mice in metadata
//! order with their measurements in input order, then any orphan
//! measurements in input order. Determinism here is what makes the whole
//! pipeline idempotent.

use crate::model::{CombinedRecord, Measurement, MouseRecord};
use rustc_hash::{FxHashMap, FxHashSet};

/// Full outer join of metadata and measurements on `mouse_id`.
///
/// Guarantees:
/// - row count ≥ max(`mice.len()`, `measurements.len()`)
/// - every input row is referenced by at least one output row
/// - a mouse with no measurements yields one row with `measurement: None`
/// - a measurement with no metadata yields one row with `mouse: None`
#[must_use]
pub fn outer_join(mice: &[MouseRecord], measurements: &[Measurement]) -> Vec<CombinedRecord> {
    let mut by_mouse: FxHashMap<&str, Vec<&Measurement>> = FxHashMap::default();
    for m in measurements {
        by_mouse.entry(m.mouse_id.as_str()).or_default().push(m);
    }

    let mut combined = Vec::with_capacity(measurements.len().max(mice.len()));
    let mut matched: FxHashSet<&str> = FxHashSet::default();

    for mouse in mice {
        matched.insert(mouse.mouse_id.as_str());
        if let Some(rows) = by_mouse.get(mouse.mouse_id.as_str()) {
            for &measurement in rows {
                combined.push(CombinedRecord {
                    mouse_id: mouse.mouse_id.clone(),
                    mouse: Some(mouse.clone()),
                    measurement: Some(measurement.clone()),
                });
            }
        } else {
            combined.push(CombinedRecord {
                mouse_id: mouse.mouse_id.clone(),
                mouse: Some(mouse.clone()),
                measurement: None,
            });
        }
    }

    // Orphan measurements keep their input order
    for measurement in measurements {
        if !matched.contains(measurement.mouse_id.as_str()) {
            combined.push(CombinedRecord {
                mouse_id: measurement.mouse_id.clone(),
                mouse: None,
                measurement: Some(measurement.clone()),
            });
        }
    }

    tracing::debug!(
        mice = mice.len(),
        measurements = measurements.len(),
        combined = combined.len(),
        "joined study tables"
    );
    combined
}
