//! IQR-based outlier detection over final tumor volumes
//!
//! Per regimen: Q1 and Q3 by linear interpolation, IQR = Q3 − Q1, and
//! the usual 1.5·IQR fences. A final volume strictly outside the fences
//! is flagged. Bounds are computed per regimen and never shared across
//! regimens; undersized groups are not special-cased, the interpolation
//! simply runs on whatever values exist.

use crate::model::FinalTumorRecord;
use crate::stats::quantile;
use serde::Serialize;
use std::collections::BTreeMap;

/// Quartiles of one regimen's final tumor volumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quartiles {
    /// 25th percentile
    pub q1: f64,
    /// 50th percentile
    pub median: f64,
    /// 75th percentile
    pub q3: f64,
}

/// Outlier fences derived from [`Quartiles`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutlierBounds {
    /// Interquartile range, Q3 − Q1
    pub iqr: f64,
    /// Q1 − 1.5·IQR
    pub lower: f64,
    /// Q3 + 1.5·IQR
    pub upper: f64,
}

impl OutlierBounds {
    /// Derive the 1.5·IQR fences from quartiles.
    #[must_use]
    pub fn from_quartiles(quartiles: Quartiles) -> Self {
        let iqr = quartiles.q3 - quartiles.q1;
        Self {
            iqr,
            lower: iqr.mul_add(-1.5, quartiles.q1),
            upper: iqr.mul_add(1.5, quartiles.q3),
        }
    }

    /// True if `value` falls strictly outside the fences.
    #[must_use]
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// Outlier analysis for one treatment regimen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegimenOutliers {
    /// Treatment regimen the bounds belong to
    pub drug_regimen: String,
    /// Quartiles of the regimen's final tumor volumes
    pub quartiles: Quartiles,
    /// Fences derived from the quartiles
    pub bounds: OutlierBounds,
    /// Final records strictly outside the fences
    pub outliers: Vec<FinalTumorRecord>,
}

/// Detect outliers in final tumor volume, independently per regimen.
///
/// Records without a regimen (orphan side of the join) are skipped.
/// Output is sorted by regimen name.
#[must_use]
pub fn detect_outliers(finals: &[FinalTumorRecord]) -> Vec<RegimenOutliers> {
    let mut groups: BTreeMap<&str, Vec<&FinalTumorRecord>> = BTreeMap::new();
    for record in finals {
        if let Some(regimen) = record.regimen() {
            groups.entry(regimen).or_default().push(record);
        }
    }

    groups
        .into_iter()
        .map(|(regimen, records)| analyze_group(regimen, &records))
        .collect()
}

fn analyze_group(regimen: &str, records: &[&FinalTumorRecord]) -> RegimenOutliers {
    let mut volumes: Vec<f64> = records.iter().map(|r| r.final_tumor_volume_mm3).collect();
    volumes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let quartiles = Quartiles {
        q1: quantile(&volumes, 0.25),
        median: quantile(&volumes, 0.5),
        q3: quantile(&volumes, 0.75),
    };
    let bounds = OutlierBounds::from_quartiles(quartiles);

    let outliers: Vec<FinalTumorRecord> = records
        .iter()
        .filter(|r| bounds.is_outlier(r.final_tumor_volume_mm3))
        .map(|r| (*r).clone())
        .collect();

    if !outliers.is_empty() {
        tracing::info!(
            drug_regimen = regimen,
            count = outliers.len(),
            lower = bounds.lower,
            upper = bounds.upper,
            "flagged final tumor volume outliers"
        );
    }

    RegimenOutliers {
        drug_regimen: regimen.to_string(),
        quartiles,
        bounds,
        outliers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MouseRecord, Sex};

    fn final_record(id: &str, regimen: &str, volume: f64) -> FinalTumorRecord {
        FinalTumorRecord {
            mouse_id: id.to_string(),
            mouse: Some(MouseRecord {
                mouse_id: id.to_string(),
                drug_regimen: regimen.to_string(),
                sex: Sex::Female,
                age_weeks: 18,
                weight_g: 25.0,
            }),
            timepoint: 45,
            final_tumor_volume_mm3: volume,
            metastatic_sites: 1,
        }
    }

    #[test]
    fn test_high_outlier_flagged() {
        // Q1 = 21.5, Q3 = 24.5, IQR = 3, fences [17, 29]: only 100 is out
        let finals: Vec<FinalTumorRecord> = [20.0, 21.0, 22.0, 23.0, 24.0, 25.0, 100.0]
            .iter()
            .enumerate()
            .map(|(i, &v)| final_record(&format!("m{i}"), "Infubinol", v))
            .collect();

        let findings = detect_outliers(&finals);
        assert_eq!(findings.len(), 1);
        let f = &findings[0];
        assert!((f.quartiles.q1 - 21.5).abs() < 1e-12);
        assert!((f.quartiles.q3 - 24.5).abs() < 1e-12);
        assert!((f.bounds.iqr - 3.0).abs() < 1e-12);
        assert_eq!(f.outliers.len(), 1);
        assert!((f.outliers[0].final_tumor_volume_mm3 - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_low_outlier_flagged() {
        let finals: Vec<FinalTumorRecord> = [1.0, 60.0, 61.0, 62.0, 63.0, 64.0, 65.0]
            .iter()
            .enumerate()
            .map(|(i, &v)| final_record(&format!("m{i}"), "Ceftamin", v))
            .collect();

        let findings = detect_outliers(&finals);
        assert_eq!(findings[0].outliers.len(), 1);
        assert!((findings[0].outliers[0].final_tumor_volume_mm3 - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bounds_do_not_leak_across_regimens() {
        // 100 is wildly out for Capomulin's spread but typical for Placebo
        let mut finals: Vec<FinalTumorRecord> = [20.0, 21.0, 22.0, 23.0, 24.0, 25.0]
            .iter()
            .enumerate()
            .map(|(i, &v)| final_record(&format!("c{i}"), "Capomulin", v))
            .collect();
        finals.extend(
            [95.0, 100.0, 105.0, 110.0]
                .iter()
                .enumerate()
                .map(|(i, &v)| final_record(&format!("p{i}"), "Placebo", v)),
        );

        let findings = detect_outliers(&finals);
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.outliers.is_empty()));
    }

    #[test]
    fn test_boundary_values_not_flagged() {
        let bounds = OutlierBounds::from_quartiles(Quartiles {
            q1: 20.0,
            median: 25.0,
            q3: 30.0,
        });
        // fences at exactly [5, 45]; strict inequality spares the boundary
        assert!(!bounds.is_outlier(5.0));
        assert!(!bounds.is_outlier(45.0));
        assert!(bounds.is_outlier(4.999));
        assert!(bounds.is_outlier(45.001));
    }

    #[test]
    fn test_tiny_group_still_computes() {
        let finals = vec![final_record("a1", "Propriva", 50.0)];

        let findings = detect_outliers(&finals);
        assert_eq!(findings.len(), 1);
        assert!((findings[0].bounds.iqr).abs() < f64::EPSILON);
        assert!(findings[0].outliers.is_empty());
    }

    #[test]
    fn test_records_without_regimen_skipped() {
        let mut orphan = final_record("zz", "ignored", 10.0);
        orphan.mouse = None;

        let findings = detect_outliers(&[orphan]);
        assert!(findings.is_empty());
    }
}
