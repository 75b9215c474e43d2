//! Profile comparison.
//!
//! This module compares two aggregated profiles (base vs new) of the same
//! category and produces per-function deltas, ranked by the size of the
//! cumulative change.
//!
//! # Example
//! ```ignore
//! use pprof_digest::diff::generate_diff_report;
//! use pprof_digest::pipeline::load_profile;
//!
//! let base = load_profile("before.pb.gz", None)?;
//! let new = load_profile("after.pb.gz", None)?;
//! let report = generate_diff_report(&base, &new, 20)?;
//! ```

mod engine;
mod normalizer;
pub mod output;
mod schema;

// Public API exports
pub use crate::utils::error::DiffError;
pub use engine::{diff_profiles, generate_diff_report};
pub use normalizer::{check_compatibility, delta_percentage};
pub use output::render_terminal_diff;
pub use schema::{DiffReport, DiffSummary, FunctionDiff};
