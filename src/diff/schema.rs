//! Schema definitions for diff reports.

use crate::parser::schema::{Category, Stats};
use serde::{Deserialize, Serialize};

/// Change of one function between the base and new profiles
///
/// `is_improved` and `is_regressed` are independent flags: a function whose
/// flat went down while its cum went up sets both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionDiff {
    pub name: String,
    pub file: String,
    pub line: i64,

    pub base_flat: i64,
    pub base_cum: i64,
    pub new_flat: i64,
    pub new_cum: i64,

    /// new_flat - base_flat
    pub flat_delta: i64,
    pub flat_delta_pct: f64,

    /// new_cum - base_cum
    pub cum_delta: i64,
    pub cum_delta_pct: f64,

    /// Only present in the new profile
    pub is_new: bool,

    /// Only present in the base profile
    pub is_removed: bool,

    pub is_improved: bool,
    pub is_regressed: bool,
}

/// Complete diff report comparing base and new profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffReport {
    /// Schema version for the diff format
    pub diff_version: String,

    /// Timestamp when diff was generated
    pub generated_at: String,

    pub category: Category,

    pub base_total: i64,
    pub new_total: i64,
    pub total_delta: i64,
    pub total_delta_pct: f64,

    pub base_stats: Stats,
    pub new_stats: Stats,

    /// Top changed functions, largest |cum_delta| first
    pub functions: Vec<FunctionDiff>,

    pub summary: DiffSummary,
}

/// Counts over the reported functions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub new_count: usize,
    pub removed_count: usize,
    pub regressed_count: usize,
    pub improved_count: usize,

    /// Whether anything got worse
    pub has_regressions: bool,
}

impl DiffSummary {
    pub fn from_functions(functions: &[FunctionDiff]) -> Self {
        let count = |pred: fn(&FunctionDiff) -> bool| functions.iter().filter(|d| pred(d)).count();
        let regressed_count = count(|d| d.is_regressed);
        Self {
            new_count: count(|d| d.is_new),
            removed_count: count(|d| d.is_removed),
            regressed_count,
            improved_count: count(|d| d.is_improved),
            has_regressions: regressed_count > 0,
        }
    }
}
