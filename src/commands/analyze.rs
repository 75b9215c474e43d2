//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Reads and decodes the capture
//! 2. Classifies it (unless a type is forced)
//! 3. Aggregates per-function metrics
//! 4. Renders the markdown or JSON report
//! 5. Optionally renders a flamegraph and a terminal summary

use super::models::{AnalyzeArgs, OutputFormat};
use super::utils::{load_input, validate_top_n};
use crate::aggregator::build_collapsed_stacks;
use crate::flamegraph::{generate_flamegraph, generate_text_summary};
use crate::output::{
    render_profile_markdown, report_to_string, write_svg, write_text, ProfileReport,
};
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Missing or unreadable input file
/// * Corrupt gzip envelope or unrecognised capture category
/// * File write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();
    let config = args.pipeline_config();

    info!("Analyzing capture: {}", args.input.display());

    let profile = load_input(&args.input, config.category_override)?;
    debug!(
        "{} profile with {} functions",
        profile.category,
        profile.functions.len()
    );

    let rendered = match args.format {
        OutputFormat::Markdown => {
            render_profile_markdown(&profile, config.top_n, config.include_guidance_prompt)
        }
        OutputFormat::Json => {
            let report = ProfileReport::new(profile.clone(), args.input.display().to_string());
            let mut json = report_to_string(&report).context("Failed to serialize report")?;
            json.push('\n');
            json
        }
    };

    write_text(&config.output, &rendered).context("Failed to write report")?;
    if let Some(path) = &args.output {
        eprintln!("Report written to: {}", path.display());
    }

    if let Some(svg_path) = &args.flamegraph {
        let fg_config = args.flamegraph_config(profile.category);
        let svg = generate_flamegraph(&profile, Some(&fg_config))
            .context("Failed to generate flamegraph")?;
        write_svg(&svg, svg_path).context("Failed to write flamegraph SVG")?;
        info!("✓ Flamegraph written to: {}", svg_path.display());
    }

    if args.print_summary {
        let stacks = build_collapsed_stacks(&profile);
        println!("\n{}", "=".repeat(80));
        println!("PROFILE SUMMARY ({})", profile.category);
        println!("{}", "=".repeat(80));
        println!("Samples:       {}", profile.stats.sample_count);
        println!("Functions:     {}", profile.functions.len());
        println!("Unique Stacks: {}", stacks.len());
        println!(
            "\n{}",
            generate_text_summary(&stacks, 10, profile.category, profile.total_samples)
        );
        println!("{}", "=".repeat(80));
    }

    info!(
        "Analysis completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_analyze_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input file cannot be empty");
    }

    validate_top_n(args.top_n)?;

    if args.flamegraph_title.is_some() && args.flamegraph.is_none() {
        anyhow::bail!("Flamegraph title given without --flamegraph <path>");
    }

    if args.flamegraph.is_some() && args.flamegraph_width == 0 {
        anyhow::bail!("Flamegraph width must be greater than 0");
    }

    Ok(())
}
