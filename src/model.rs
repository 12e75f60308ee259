//! Typed study records
//!
//! Every table in the pipeline is a `Vec` of one of these structs. Field
//! names are validated at load time by serde; there is no dynamic
//! column-label access anywhere downstream.

use serde::{Deserialize, Serialize};

/// Sex of a study subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    /// Male mouse
    #[serde(alias = "Male")]
    Male,
    /// Female mouse
    #[serde(alias = "Female")]
    Female,
}

/// Static per-mouse attributes, created once at load time and immutable
/// thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MouseRecord {
    /// Unique subject identifier
    pub mouse_id: String,
    /// Treatment the mouse received for the study's duration
    pub drug_regimen: String,
    /// Sex of the mouse
    pub sex: Sex,
    /// Age at study start, in weeks
    pub age_weeks: u32,
    /// Weight at study start, in grams
    pub weight_g: f64,
}

/// One measurement occasion for one mouse.
///
/// Invariant: at most one measurement per (`mouse_id`, `timepoint`) pair.
/// A violation is not a load error; it marks the mouse as corrupted and
/// the deduplication stage excludes the subject entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Subject identifier (foreign key into the metadata table)
    pub mouse_id: String,
    /// Days since study start
    pub timepoint: u32,
    /// Observed tumor volume in mm³
    pub tumor_volume_mm3: f64,
    /// Number of metastatic sites observed
    pub metastatic_sites: u32,
}

/// Full outer join of [`MouseRecord`] and [`Measurement`] on `mouse_id`.
///
/// A row present on only one side of the join keeps the other side `None`;
/// in a complete dataset no orphans exist and both sides are populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedRecord {
    /// Subject identifier shared by both sides
    pub mouse_id: String,
    /// Static attributes, `None` for an orphan measurement
    pub mouse: Option<MouseRecord>,
    /// Measurement values, `None` for a mouse with no observations
    pub measurement: Option<Measurement>,
}

impl CombinedRecord {
    /// Treatment regimen, if the metadata side is present.
    #[must_use]
    pub fn regimen(&self) -> Option<&str> {
        self.mouse.as_ref().map(|m| m.drug_regimen.as_str())
    }

    /// Measurement timepoint, if the measurement side is present.
    #[must_use]
    pub fn timepoint(&self) -> Option<u32> {
        self.measurement.as_ref().map(|m| m.timepoint)
    }

    /// Tumor volume, if the measurement side is present.
    #[must_use]
    pub fn tumor_volume(&self) -> Option<f64> {
        self.measurement.as_ref().map(|m| m.tumor_volume_mm3)
    }
}

/// Tumor volume at a mouse's maximum observed timepoint.
///
/// Exactly one per mouse with at least one observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalTumorRecord {
    /// Subject identifier
    pub mouse_id: String,
    /// Static attributes carried over from the combined row
    pub mouse: Option<MouseRecord>,
    /// The maximum timepoint observed for this mouse
    pub timepoint: u32,
    /// Tumor volume at that timepoint, in mm³
    pub final_tumor_volume_mm3: f64,
    /// Metastatic site count at that timepoint
    pub metastatic_sites: u32,
}

impl FinalTumorRecord {
    /// Treatment regimen, if the metadata side was present.
    #[must_use]
    pub fn regimen(&self) -> Option<&str> {
        self.mouse.as_ref().map(|m| m.drug_regimen.as_str())
    }
}
