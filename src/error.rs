//! Error types for Oncostat
//!
//! Load failures are fatal: the pipeline is a one-shot batch computation
//! with no retry semantics, so any failure to read an input table
//! terminates the run.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Oncostat error types
#[derive(Error, Debug)]
pub enum Error {
    /// Input table could not be read or parsed
    #[error("failed to load {path}: {source}")]
    Load {
        /// Path of the offending input file
        path: String,
        /// Underlying CSV/deserialization failure
        #[source]
        source: csv::Error,
    },

    /// Malformed input that passed parsing but violates the data model
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Report serialization failure
    #[error("report serialization failed: {0}")]
    Report(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
