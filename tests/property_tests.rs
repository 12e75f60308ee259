//! Property-based tests for the cleaning pipeline invariants:
//! - outer join drops nothing from either side
//! - dedup excludes corrupted subjects exactly, and nothing else
//! - final-timepoint extraction is unique and maximal per mouse

use oncostat::dedup::exclude_duplicate_mice;
use oncostat::final_volume::final_tumor_volumes;
use oncostat::merge::outer_join;
use oncostat::model::{Measurement, MouseRecord, Sex};
use proptest::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

// ============================================================================
// Strategies
// ============================================================================

const REGIMENS: [&str; 4] = ["Capomulin", "Ramicane", "Infubinol", "Ceftamin"];

/// Metadata table with unique mouse ids drawn from a small pool.
fn arb_mice() -> impl Strategy<Value = Vec<MouseRecord>> {
    proptest::collection::btree_set(0usize..10, 0..10).prop_map(|ids| {
        ids.into_iter()
            .map(|id| MouseRecord {
                mouse_id: format!("m{id}"),
                drug_regimen: REGIMENS[id % REGIMENS.len()].to_string(),
                sex: if id % 2 == 0 { Sex::Female } else { Sex::Male },
                age_weeks: 10 + id as u32,
                weight_g: 20.0 + id as f64,
            })
            .collect()
    })
}

/// Measurement table over the same id pool; duplicates of
/// (mouse_id, timepoint) arise naturally and exercise the dedup path.
fn arb_measurements() -> impl Strategy<Value = Vec<Measurement>> {
    proptest::collection::vec((0usize..10, 0u32..10, 20.0f64..80.0), 0..80).prop_map(|raw| {
        raw.into_iter()
            .map(|(id, step, volume)| Measurement {
                mouse_id: format!("m{id}"),
                timepoint: step * 5,
                tumor_volume_mm3: volume,
                metastatic_sites: step / 3,
            })
            .collect()
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: the outer join references every row of both sources.
    #[test]
    fn prop_join_completeness(mice in arb_mice(), measurements in arb_measurements()) {
        let combined = outer_join(&mice, &measurements);

        // every measurement appears exactly once
        let measurement_rows = combined.iter().filter(|r| r.measurement.is_some()).count();
        prop_assert_eq!(measurement_rows, measurements.len());

        // every mouse id from either side is referenced
        let joined_ids: FxHashSet<&str> =
            combined.iter().map(|r| r.mouse_id.as_str()).collect();
        for mouse in &mice {
            prop_assert!(joined_ids.contains(mouse.mouse_id.as_str()));
        }
        for m in &measurements {
            prop_assert!(joined_ids.contains(m.mouse_id.as_str()));
        }

        prop_assert!(combined.len() >= mice.len().max(measurements.len()));
    }

    /// Property: dedup removes all rows of duplicate-timepoint mice and
    /// leaves everyone else's rows unchanged.
    #[test]
    fn prop_dedup_exclusivity(mice in arb_mice(), measurements in arb_measurements()) {
        let combined = outer_join(&mice, &measurements);
        let (clean, report) = exclude_duplicate_mice(&combined);

        // independently recompute which subjects are corrupted
        let mut pair_counts: FxHashMap<(&str, u32), usize> = FxHashMap::default();
        for row in &combined {
            if let Some(tp) = row.timepoint() {
                *pair_counts.entry((row.mouse_id.as_str(), tp)).or_default() += 1;
            }
        }
        let corrupted: FxHashSet<&str> = pair_counts
            .iter()
            .filter(|(_, &n)| n > 1)
            .map(|(&(id, _), _)| id)
            .collect();

        let mut expected: Vec<String> = corrupted.iter().map(|s| (*s).to_string()).collect();
        expected.sort_unstable();
        prop_assert_eq!(&report.corrupted_mice, &expected);

        // zero clean rows for corrupted mice, all rows for the rest
        for id in &corrupted {
            prop_assert!(clean.iter().all(|r| r.mouse_id != *id));
        }
        let expected_clean: Vec<_> = combined
            .iter()
            .filter(|r| !corrupted.contains(r.mouse_id.as_str()))
            .cloned()
            .collect();
        prop_assert_eq!(clean, expected_clean);
    }

    /// Property: after dedup, no surviving mouse has two rows at one
    /// timepoint.
    #[test]
    fn prop_clean_timepoints_unique(mice in arb_mice(), measurements in arb_measurements()) {
        let combined = outer_join(&mice, &measurements);
        let (clean, _) = exclude_duplicate_mice(&combined);

        let mut seen: FxHashSet<(&str, u32)> = FxHashSet::default();
        for row in &clean {
            if let Some(tp) = row.timepoint() {
                prop_assert!(seen.insert((row.mouse_id.as_str(), tp)));
            }
        }
    }

    /// Property: exactly one final record per observed mouse, at that
    /// mouse's maximum timepoint.
    #[test]
    fn prop_final_timepoint_uniqueness(mice in arb_mice(), measurements in arb_measurements()) {
        let combined = outer_join(&mice, &measurements);
        let finals = final_tumor_volumes(&combined);

        let mut max_tp: FxHashMap<&str, u32> = FxHashMap::default();
        for row in &combined {
            if let Some(tp) = row.timepoint() {
                let entry = max_tp.entry(row.mouse_id.as_str()).or_insert(tp);
                *entry = (*entry).max(tp);
            }
        }

        prop_assert_eq!(finals.len(), max_tp.len());
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for record in &finals {
            prop_assert!(seen.insert(record.mouse_id.as_str()));
            prop_assert_eq!(record.timepoint, max_tp[record.mouse_id.as_str()]);
        }
    }

    /// Property: the pure stages are deterministic over the same input.
    #[test]
    fn prop_stages_deterministic(mice in arb_mice(), measurements in arb_measurements()) {
        let a = outer_join(&mice, &measurements);
        let b = outer_join(&mice, &measurements);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(exclude_duplicate_mice(&a), exclude_duplicate_mice(&b));
        prop_assert_eq!(final_tumor_volumes(&a), final_tumor_volumes(&b));
    }
}
