//! # Oncostat: Embedded Analytics for Preclinical Tumor Studies
//!
//! Oncostat ingests the two flat tables of a mouse tumor study (per-mouse
//! metadata and per-timepoint measurements), cleans and joins them, and
//! derives the tables a reporting layer plots: per-regimen summary
//! statistics, final tumor volumes per mouse, and IQR-based outlier
//! findings.
//!
//! ## Design Principles
//!
//! - **Typed tables**: every stage consumes and returns explicit record
//!   structs, never dynamically-labelled columns
//! - **Pure stages**: each stage owns its derived table; sources are
//!   read-only and nothing is mutated in place
//! - **Explicit undefined**: statistics that need n ≥ 2 are `Option`,
//!   never a NaN masquerading as a valid number
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! let report = oncostat::pipeline::run_study(
//!     "data/mouse_metadata.csv",
//!     "data/study_results.csv",
//! )?;
//! println!("{}", report.to_json()?);
//! # Ok::<(), oncostat::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod dedup;
pub mod error;
pub mod final_volume;
pub mod loader;
pub mod merge;
pub mod model;
pub mod outliers;
pub mod pipeline;
pub mod stats;

pub use error::{Error, Result};
