//! Core diff engine implementation.
//! Builds the ranked delta list and the full diff report.

use crate::parser::schema::Profile;
use crate::utils::config::REPORT_SCHEMA_VERSION;
use crate::utils::error::DiffError;
use chrono::Utc;
use log::{debug, info};
use std::collections::BTreeSet;

use super::normalizer::{check_compatibility, compare_function, delta_percentage, index_by_name};
use super::schema::{DiffReport, DiffSummary, FunctionDiff};

/// Compare two profiles function by function
///
/// # Arguments
/// * `base` - The profile to compare against
/// * `new` - The profile being evaluated
/// * `top_n` - Maximum number of entries returned
///
/// # Returns
/// One entry per function name found in either profile, sorted by absolute
/// `cum_delta` descending (ties by name), truncated to `top_n`
///
/// # Errors
/// * `DiffError::CategoryMismatch` - checked before anything is computed
pub fn diff_profiles(
    base: &Profile,
    new: &Profile,
    top_n: usize,
) -> Result<Vec<FunctionDiff>, DiffError> {
    check_compatibility(base, new)?;

    let base_funcs = index_by_name(base);
    let new_funcs = index_by_name(new);

    let names: BTreeSet<&str> = base_funcs.keys().chain(new_funcs.keys()).copied().collect();

    let mut diffs: Vec<FunctionDiff> = names
        .into_iter()
        .map(|name| {
            compare_function(
                name,
                base_funcs.get(name).copied(),
                new_funcs.get(name).copied(),
            )
        })
        .collect();

    diffs.sort_by(|a, b| {
        b.cum_delta
            .unsigned_abs()
            .cmp(&a.cum_delta.unsigned_abs())
            .then_with(|| a.name.cmp(&b.name))
    });

    debug!(
        "Compared {} functions, keeping top {}",
        diffs.len(),
        top_n.min(diffs.len())
    );
    diffs.truncate(top_n);

    Ok(diffs)
}

/// Generate a complete diff report comparing two profiles
///
/// # Errors
/// * `DiffError::CategoryMismatch` - the profiles hold different categories
pub fn generate_diff_report(
    base: &Profile,
    new: &Profile,
    top_n: usize,
) -> Result<DiffReport, DiffError> {
    let functions = diff_profiles(base, new, top_n)?;

    let total_delta = new.total_samples.saturating_sub(base.total_samples);
    let summary = DiffSummary::from_functions(&functions);

    info!(
        "Diffed {} profiles: total {} -> {} ({} regressed, {} improved)",
        base.category,
        base.total_samples,
        new.total_samples,
        summary.regressed_count,
        summary.improved_count
    );

    Ok(DiffReport {
        diff_version: REPORT_SCHEMA_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        category: base.category,
        base_total: base.total_samples,
        new_total: new.total_samples,
        total_delta,
        total_delta_pct: delta_percentage(total_delta, base.total_samples, new.total_samples),
        base_stats: base.stats.clone(),
        new_stats: new.stats.clone(),
        functions,
        summary,
    })
}
