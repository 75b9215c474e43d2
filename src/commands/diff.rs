//! Diff command implementation.
//! Loads two profiles, compares them and reports the deltas.

use super::models::{DiffArgs, OutputFormat};
use super::utils::{load_input, validate_top_n};
use crate::diff::{generate_diff_report, render_terminal_diff};
use crate::output::{render_diff_markdown, report_to_string, write_text};
use crate::pipeline::OutputTarget;
use anyhow::{Context, Result};
use colored::*;

/// Execute the diff command
pub fn execute_diff(args: DiffArgs) -> Result<()> {
    validate_top_n(args.top_n)?;

    // Step 1: Load profiles
    let base = load_input(&args.base, args.base_type).context("Failed to load base profile")?;
    let new = load_input(&args.new, args.new_type).context("Failed to load new profile")?;

    // Step 2: Generate diff
    let report = generate_diff_report(&base, &new, args.top_n).context("Failed to generate diff")?;

    // Step 3: Render and write
    let rendered = match args.format {
        OutputFormat::Markdown => render_diff_markdown(&report, args.include_guidance),
        OutputFormat::Json => {
            let mut json = report_to_string(&report).context("Failed to serialize diff report")?;
            json.push('\n');
            json
        }
    };

    let target = OutputTarget::from_option(args.output.clone());
    write_text(&target, &rendered).context("Failed to write diff report")?;
    if let Some(path) = &args.output {
        eprintln!(
            "📊 Diff report written to {}",
            path.display().to_string().cyan()
        );
    }

    // Step 4: Terminal summary
    if args.summary {
        println!("{}", render_terminal_diff(&report));
    }

    Ok(())
}
