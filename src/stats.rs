//! Per-regimen summary statistics
//!
//! Groups the clean table by treatment regimen and computes mean, median,
//! sample variance, sample standard deviation, and standard error of the
//! mean of tumor volume. Variance uses the unbiased n−1 estimator, so a
//! single-observation group has no defined spread; those statistics are
//! `Option` rather than NaN so a consumer cannot mistake them for real
//! numbers.

use crate::model::CombinedRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Summary statistics of tumor volume for one treatment regimen.
///
/// Recomputed fully on each run, never updated incrementally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegimenSummary {
    /// Treatment regimen
    pub drug_regimen: String,
    /// Number of observations in the group
    pub count: usize,
    /// Mean tumor volume, mm³
    pub mean: f64,
    /// Median tumor volume, mm³
    pub median: f64,
    /// Sample variance (n−1 denominator); `None` when `count < 2`
    pub variance: Option<f64>,
    /// Sample standard deviation; `None` when `count < 2`
    pub std_dev: Option<f64>,
    /// Standard error of the mean, std / sqrt(n); `None` when `count < 2`
    pub sem: Option<f64>,
}

/// Compute summary statistics of tumor volume per regimen.
///
/// Rows missing either the regimen or the measurement side of the join
/// are skipped. Each group is computed independently; output is sorted
/// by regimen name.
#[must_use]
pub fn summarize_by_regimen(clean: &[CombinedRecord]) -> Vec<RegimenSummary> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in clean {
        if let (Some(regimen), Some(volume)) = (row.regimen(), row.tumor_volume()) {
            groups.entry(regimen).or_default().push(volume);
        }
    }

    groups
        .into_iter()
        .map(|(regimen, volumes)| summarize_group(regimen, &volumes))
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn summarize_group(regimen: &str, volumes: &[f64]) -> RegimenSummary {
    let n = volumes.len();
    let mean = volumes.iter().sum::<f64>() / n as f64;

    let mut sorted = volumes.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = quantile(&sorted, 0.5);

    let variance = if n > 1 {
        Some(volumes.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64)
    } else {
        None
    };
    let std_dev = variance.map(f64::sqrt);
    let sem = std_dev.map(|s| s / (n as f64).sqrt());

    RegimenSummary {
        drug_regimen: regimen.to_string(),
        count: n,
        mean,
        median,
        variance,
        std_dev,
        sem,
    }
}

/// Mean tumor volume at one timepoint within one regimen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimepointMean {
    /// Days since study start
    pub timepoint: u32,
    /// Mean tumor volume across the regimen's mice at this timepoint, mm³
    pub mean: f64,
}

/// Mean tumor volume over the course of the study for one regimen
/// (line-chart input).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegimenTimeCourse {
    /// Treatment regimen
    pub drug_regimen: String,
    /// One entry per observed timepoint, sorted by timepoint
    pub points: Vec<TimepointMean>,
}

/// Mean tumor volume per timepoint, independently per regimen.
///
/// Rows missing either side of the join are skipped. Output is sorted
/// by regimen name, points by timepoint.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean_volume_per_timepoint(rows: &[CombinedRecord]) -> Vec<RegimenTimeCourse> {
    let mut groups: BTreeMap<&str, BTreeMap<u32, (f64, usize)>> = BTreeMap::new();
    for row in rows {
        if let (Some(regimen), Some(m)) = (row.regimen(), row.measurement.as_ref()) {
            let acc = groups
                .entry(regimen)
                .or_default()
                .entry(m.timepoint)
                .or_insert((0.0, 0));
            acc.0 += m.tumor_volume_mm3;
            acc.1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|(regimen, by_timepoint)| RegimenTimeCourse {
            drug_regimen: regimen.to_string(),
            points: by_timepoint
                .into_iter()
                .map(|(timepoint, (sum, n))| TimepointMean {
                    timepoint,
                    mean: sum / n as f64,
                })
                .collect(),
        })
        .collect()
}

/// Per-mouse averages of weight and tumor volume for one regimen
/// (scatter-chart input).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightVolumePoint {
    /// Subject identifier
    pub mouse_id: String,
    /// Mean weight across the mouse's observations, grams
    pub avg_weight_g: f64,
    /// Mean tumor volume across the mouse's observations, mm³
    pub avg_tumor_volume_mm3: f64,
}

/// Weight-versus-volume analysis for one regimen: the per-mouse points
/// plus the least-squares line a scatter plot overlays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegimenWeightFit {
    /// Treatment regimen
    pub drug_regimen: String,
    /// One point per mouse, sorted by mouse id
    pub points: Vec<WeightVolumePoint>,
    /// Fit of volume on weight; `None` when the regimen has fewer than
    /// two mice or no spread in weight
    pub fit: Option<LinearFit>,
}

/// Average mouse weight vs. average tumor volume per regimen, with a
/// linear-regression fit and Pearson correlation per group.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn weight_volume_by_regimen(rows: &[CombinedRecord]) -> Vec<RegimenWeightFit> {
    // regimen -> mouse -> (volume sum, weight sum, observations)
    let mut groups: BTreeMap<&str, BTreeMap<&str, (f64, f64, usize)>> = BTreeMap::new();
    for row in rows {
        if let (Some(mouse), Some(m)) = (row.mouse.as_ref(), row.measurement.as_ref()) {
            let acc = groups
                .entry(mouse.drug_regimen.as_str())
                .or_default()
                .entry(row.mouse_id.as_str())
                .or_insert((0.0, 0.0, 0));
            acc.0 += m.tumor_volume_mm3;
            acc.1 += mouse.weight_g;
            acc.2 += 1;
        }
    }

    groups
        .into_iter()
        .map(|(regimen, mice)| {
            let points: Vec<WeightVolumePoint> = mice
                .into_iter()
                .map(|(mouse_id, (volume_sum, weight_sum, n))| WeightVolumePoint {
                    mouse_id: mouse_id.to_string(),
                    avg_weight_g: weight_sum / n as f64,
                    avg_tumor_volume_mm3: volume_sum / n as f64,
                })
                .collect();
            let xs: Vec<f64> = points.iter().map(|p| p.avg_weight_g).collect();
            let ys: Vec<f64> = points.iter().map(|p| p.avg_tumor_volume_mm3).collect();
            RegimenWeightFit {
                drug_regimen: regimen.to_string(),
                fit: linear_fit(&xs, &ys),
                points,
            }
        })
        .collect()
}

/// Least-squares line of `ys` on `xs`, with Pearson correlation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    /// Slope of the fitted line
    pub slope: f64,
    /// Intercept of the fitted line
    pub intercept: f64,
    /// Pearson correlation coefficient; 0 when `ys` has no spread
    pub r: f64,
}

/// Fit a least-squares line through paired samples.
///
/// Returns `None` when the slices differ in length, hold fewer than two
/// points, or `xs` has no spread (a vertical fit has no slope).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    let n = xs.len();
    if n < 2 || n != ys.len() {
        return None;
    }

    let n_f = n as f64;
    let mean_x = xs.iter().sum::<f64>() / n_f;
    let mean_y = ys.iter().sum::<f64>() / n_f;

    let mut ss_xx = 0.0;
    let mut ss_yy = 0.0;
    let mut ss_xy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        ss_xx += dx * dx;
        ss_yy += dy * dy;
        ss_xy += dx * dy;
    }
    if ss_xx.abs() < f64::EPSILON {
        return None;
    }

    let slope = ss_xy / ss_xx;
    let r = if ss_yy.abs() < f64::EPSILON {
        0.0
    } else {
        ss_xy / (ss_xx * ss_yy).sqrt()
    };
    Some(LinearFit {
        slope,
        intercept: slope.mul_add(-mean_x, mean_y),
        r,
    })
}

/// Quantile of an ascending-sorted slice by linear interpolation between
/// ranked values at rank `q · (n − 1)`.
///
/// Returns NaN for an empty slice. `q` is expected in `[0, 1]`; values
/// outside the range clamp to the extremes.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }

    let rank = (q * (n - 1) as f64).clamp(0.0, (n - 1) as f64);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }

    let frac = rank - lo as f64;
    sorted[lo].mul_add(1.0 - frac, sorted[hi] * frac)
}
