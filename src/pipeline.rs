//! End-to-end study pipeline
//!
//! Wires the stages together in dependency order: load → join → dedup →
//! aggregate, plus the final-volume/outlier branch. Each stage consumes
//! the complete output of the prior stage; nothing is streamed and
//! nothing is retried. The whole run recomputes from scratch, so two
//! runs over identical inputs produce identical reports.

use crate::dedup::{exclude_duplicate_mice, DedupReport};
use crate::final_volume::final_tumor_volumes;
use crate::loader::{load_mouse_metadata, load_study_results};
use crate::merge::outer_join;
use crate::model::{CombinedRecord, FinalTumorRecord, Sex};
use crate::outliers::{detect_outliers, RegimenOutliers};
use crate::stats::{
    mean_volume_per_timepoint, summarize_by_regimen, weight_volume_by_regimen, RegimenSummary,
    RegimenTimeCourse, RegimenWeightFit,
};
use crate::Result;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Everything the reporting/plotting layer consumes, in one serializable
/// value. Derived tables only; this crate persists nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyReport {
    /// Unique mice in the combined table, before cleaning
    pub mice_before_cleaning: usize,
    /// Unique mice surviving deduplication
    pub mice_after_cleaning: usize,
    /// What deduplication excluded and why
    pub dedup: DedupReport,
    /// Measurement counts per regimen over the clean table (bar chart input)
    pub measurements_per_regimen: Vec<(String, usize)>,
    /// Unique mice per sex over the clean table (pie chart input)
    pub mice_per_sex: Vec<(Sex, usize)>,
    /// Five summary statistics of tumor volume per regimen
    pub regimen_summaries: Vec<RegimenSummary>,
    /// Mean tumor volume per timepoint per regimen (line chart input)
    pub mean_volume_per_timepoint: Vec<RegimenTimeCourse>,
    /// Per-mouse average weight vs. average tumor volume per regimen,
    /// with regression fit and correlation (scatter chart input)
    pub weight_volume_fits: Vec<RegimenWeightFit>,
    /// Final tumor volume per mouse (box/scatter chart input)
    pub final_volumes: Vec<FinalTumorRecord>,
    /// Per-regimen quartiles, fences, and flagged outliers
    pub outlier_findings: Vec<RegimenOutliers>,
}

impl StudyReport {
    /// Serialize the report for the external reporting layer.
    ///
    /// # Errors
    /// Returns [`crate::Error::Report`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run the full pipeline over the two study input files.
///
/// # Errors
/// Returns [`crate::Error::Load`] if either input file is missing,
/// unreadable, or malformed; this is fatal and nothing is retried.
pub fn run_study<P, Q>(metadata_path: P, results_path: Q) -> Result<StudyReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let mice = load_mouse_metadata(metadata_path)?;
    let measurements = load_study_results(results_path)?;
    tracing::info!(
        mice = mice.len(),
        measurements = measurements.len(),
        "study inputs loaded"
    );

    let combined = outer_join(&mice, &measurements);
    let mice_before_cleaning = unique_mice(&combined);

    let (clean, dedup) = exclude_duplicate_mice(&combined);
    let mice_after_cleaning = unique_mice(&clean);

    let regimen_summaries = summarize_by_regimen(&clean);

    // Final volumes, time courses, and weight fits run on the pre-dedup
    // table; the report carries the excluded ids so consumers can filter
    // if they want cleaned inputs.
    let final_volumes = final_tumor_volumes(&combined);
    let outlier_findings = detect_outliers(&final_volumes);
    let time_courses = mean_volume_per_timepoint(&combined);
    let weight_volume_fits = weight_volume_by_regimen(&combined);

    tracing::info!(
        regimens = regimen_summaries.len(),
        final_volumes = final_volumes.len(),
        "study pipeline complete"
    );

    Ok(StudyReport {
        mice_before_cleaning,
        mice_after_cleaning,
        measurements_per_regimen: measurements_per_regimen(&clean),
        mice_per_sex: mice_per_sex(&clean),
        dedup,
        regimen_summaries,
        mean_volume_per_timepoint: time_courses,
        weight_volume_fits,
        final_volumes,
        outlier_findings,
    })
}

fn unique_mice(rows: &[CombinedRecord]) -> usize {
    rows.iter()
        .map(|r| r.mouse_id.as_str())
        .collect::<FxHashSet<_>>()
        .len()
}

fn measurements_per_regimen(clean: &[CombinedRecord]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in clean {
        if row.measurement.is_some() {
            if let Some(regimen) = row.regimen() {
                *counts.entry(regimen).or_default() += 1;
            }
        }
    }
    counts
        .into_iter()
        .map(|(regimen, n)| (regimen.to_string(), n))
        .collect()
}

fn mice_per_sex(clean: &[CombinedRecord]) -> Vec<(Sex, usize)> {
    let mut seen: FxHashSet<(&str, Sex)> = FxHashSet::default();
    let mut counts: BTreeMap<Sex, usize> = BTreeMap::new();
    for row in clean {
        if let Some(mouse) = &row.mouse {
            if seen.insert((mouse.mouse_id.as_str(), mouse.sex)) {
                *counts.entry(mouse.sex).or_default() += 1;
            }
        }
    }
    counts.into_iter().collect()
}
