use crate::output::read_report;
use crate::parser::schema::{Category, Profile};
use crate::pipeline::load_profile;
use crate::utils::config::{MAX_TOP_N, REPORT_SCHEMA_VERSION};
use anyhow::{Context, Result};
use std::path::Path;

/// Load a profile from a capture file or a saved JSON report
///
/// Files ending in `.json` are read as reports written by `analyze
/// --format json`; a category override must then match the stored category.
pub fn load_input(path: &Path, category_override: Option<Category>) -> Result<Profile> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let is_report = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_report {
        let report = read_report(path)
            .with_context(|| format!("Failed to read report {}", path.display()))?;
        if let Some(expected) = category_override {
            if expected != report.profile.category {
                anyhow::bail!(
                    "Report {} holds a {} profile, not {}",
                    path.display(),
                    report.profile.category,
                    expected
                );
            }
        }
        return Ok(report.profile);
    }

    load_profile(path, category_override)
        .with_context(|| format!("Failed to parse profile {}", path.display()))
}

/// Shared bounds check for `--top`
pub fn validate_top_n(top_n: usize) -> Result<()> {
    if top_n == 0 {
        anyhow::bail!("top must be greater than 0");
    }
    if top_n > MAX_TOP_N {
        anyhow::bail!("top is too large (max {})", MAX_TOP_N);
    }
    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("pprof-digest v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", REPORT_SCHEMA_VERSION);
    println!();
    println!("Turns pprof captures into ranked, readable per-function reports.");
}
