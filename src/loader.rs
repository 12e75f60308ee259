//! Input table ingest
//!
//! Reads the two delimited study files (header row required) into typed
//! records. Column names are part of the crate's input contract:
//!
//! - metadata: `mouse_id,drug_regimen,sex,age_weeks,weight_g`
//! - results:  `mouse_id,timepoint,tumor_volume_mm3,metastatic_sites`
//!
//! A missing file, a missing column, or an unparseable field aborts the
//! run; there is nothing to recover to in a one-shot batch pipeline.

use crate::model::{Measurement, MouseRecord};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Load the per-mouse metadata table.
///
/// # Errors
/// Returns [`Error::Load`] if the file cannot be read or any row fails
/// to deserialize into a [`MouseRecord`].
pub fn load_mouse_metadata<P: AsRef<Path>>(path: P) -> Result<Vec<MouseRecord>> {
    read_table(path.as_ref())
}

/// Load the per-timepoint study results table.
///
/// Duplicate (`mouse_id`, `timepoint`) pairs are accepted here; the
/// deduplication stage decides what to exclude.
///
/// # Errors
/// Returns [`Error::Load`] if the file cannot be read or any row fails
/// to deserialize into a [`Measurement`].
pub fn load_study_results<P: AsRef<Path>>(path: P) -> Result<Vec<Measurement>> {
    read_table(path.as_ref())
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::Load {
            path: path.display().to_string(),
            source: e,
        })?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row = record.map_err(|e| Error::Load {
            path: path.display().to_string(),
            source: e,
        })?;
        rows.push(row);
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "loaded input table");
    Ok(rows)
}
