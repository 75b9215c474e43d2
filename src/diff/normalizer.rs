//! Per-function delta calculation.
//!
//! Handles the math for comparing one function across two profiles,
//! including the zero-baseline cases.

use crate::parser::schema::{Function, Profile};
use crate::utils::error::DiffError;
use std::collections::HashMap;

use super::schema::FunctionDiff;

/// Percentage change relative to `base`
///
/// Returns 100 when the base is zero but the new value is not (the
/// function appeared), and 0 when both are zero.
pub fn delta_percentage(delta: i64, base: i64, new: i64) -> f64 {
    if base != 0 {
        (delta as f64 / base as f64) * 100.0
    } else if new != 0 {
        100.0
    } else {
        0.0
    }
}

/// Check if two profiles can be compared
///
/// # Errors
/// * `DiffError::CategoryMismatch` - the profiles hold different categories
pub fn check_compatibility(base: &Profile, new: &Profile) -> Result<(), DiffError> {
    if base.category != new.category {
        return Err(DiffError::CategoryMismatch {
            base: base.category,
            new: new.category,
        });
    }
    Ok(())
}

/// Index a profile's functions by name; a repeated name keeps the last entry
pub fn index_by_name(profile: &Profile) -> HashMap<&str, &Function> {
    profile
        .functions
        .iter()
        .map(|f| (f.name.as_str(), f))
        .collect()
}

/// Compare one function across the two profiles
///
/// At least one side must be present; with neither, the result is an
/// all-zero diff.
pub fn compare_function(
    name: &str,
    base: Option<&Function>,
    new: Option<&Function>,
) -> FunctionDiff {
    let mut diff = FunctionDiff {
        name: name.to_string(),
        ..Default::default()
    };

    match (base, new) {
        (None, Some(n)) => {
            diff.is_new = true;
            diff.file = n.file.clone();
            diff.line = n.line;
            diff.new_flat = n.flat;
            diff.new_cum = n.cum;
            diff.flat_delta = n.flat;
            diff.cum_delta = n.cum;
            diff.is_regressed = n.flat > 0 || n.cum > 0;
        }
        (Some(b), None) => {
            diff.is_removed = true;
            diff.file = b.file.clone();
            diff.line = b.line;
            diff.base_flat = b.flat;
            diff.base_cum = b.cum;
            diff.flat_delta = b.flat.saturating_neg();
            diff.cum_delta = b.cum.saturating_neg();
            diff.is_improved = true;
        }
        (Some(b), Some(n)) => {
            diff.file = b.file.clone();
            diff.line = b.line;
            diff.base_flat = b.flat;
            diff.base_cum = b.cum;
            diff.new_flat = n.flat;
            diff.new_cum = n.cum;
            diff.flat_delta = n.flat.saturating_sub(b.flat);
            diff.cum_delta = n.cum.saturating_sub(b.cum);
            diff.is_improved = diff.flat_delta < 0 || diff.cum_delta < 0;
            diff.is_regressed = diff.flat_delta > 0 || diff.cum_delta > 0;
        }
        (None, None) => {}
    }

    diff.flat_delta_pct = delta_percentage(diff.flat_delta, diff.base_flat, diff.new_flat);
    diff.cum_delta_pct = delta_percentage(diff.cum_delta, diff.base_cum, diff.new_cum);
    diff
}
