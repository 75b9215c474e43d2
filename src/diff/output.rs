//! Terminal output rendering for diff reports.
//!
//! Provides a short coloured summary of a profile comparison with visual
//! cues for regressions and improvements.

use super::schema::{DiffReport, FunctionDiff};
use crate::output::format::{format_delta, metric_formatter};
use colored::*;

/// Number of functions listed in each section of the terminal summary
const SUMMARY_ROWS: usize = 5;

/// Render a human-readable summary of a diff report for the terminal
pub fn render_terminal_diff(report: &DiffReport) -> String {
    let mut out = String::new();

    out.push_str(&render_header(report));
    out.push_str(&render_total(report));
    out.push_str(&render_section(
        "Top Regressions",
        report.functions.iter().filter(|d| d.cum_delta > 0),
        report,
    ));
    out.push_str(&render_section(
        "Top Improvements",
        report.functions.iter().filter(|d| d.cum_delta < 0),
        report,
    ));
    out.push_str(&render_status(report));

    out
}

fn render_header(report: &DiffReport) -> String {
    let mut out = String::new();
    out.push_str("\n📊 ");
    out.push_str(
        &format!("{} Profile Comparison", report.category)
            .bold()
            .to_string(),
    );
    out.push_str("\n---------------------------------------------------\n");
    out
}

/// Formatter for the report's metric; CPU counts when either side lacks a period
fn report_formatter(report: &DiffReport) -> fn(i64) -> String {
    let period = report.base_stats.period.min(report.new_stats.period);
    metric_formatter(report.category, period)
}

fn render_total(report: &DiffReport) -> String {
    let fmt = report_formatter(report);
    let symbol = get_delta_symbol(report.total_delta);
    format!(
        "{} Total: {} -> {} ({:+.2}%)\n",
        symbol,
        fmt(report.base_total),
        fmt(report.new_total),
        report.total_delta_pct
    )
}

fn render_section<'a>(
    title: &str,
    diffs: impl Iterator<Item = &'a FunctionDiff>,
    report: &DiffReport,
) -> String {
    let fmt = report_formatter(report);
    let mut out = String::new();
    let lines: Vec<String> = diffs
        .take(SUMMARY_ROWS)
        .map(|d| {
            let tag = if d.is_new {
                " [new]"
            } else if d.is_removed {
                " [removed]"
            } else {
                ""
            };
            format!(
                "  {} {}{}: {} -> {} ({})\n",
                get_delta_symbol(d.cum_delta),
                d.name,
                tag,
                fmt(d.base_cum),
                fmt(d.new_cum),
                format_delta(d.cum_delta)
            )
        })
        .collect();

    if !lines.is_empty() {
        out.push_str(&format!("\n{}:\n", title));
        for line in lines {
            out.push_str(&line);
        }
    }
    out
}

fn render_status(report: &DiffReport) -> String {
    let mut out = String::new();
    out.push_str("\n---------------------------------------------------\n");
    let summary = &report.summary;
    let status_msg = if summary.has_regressions {
        format!(
            "❌ STATUS: {} REGRESSED, {} IMPROVED",
            summary.regressed_count, summary.improved_count
        )
        .red()
        .bold()
    } else if summary.improved_count > 0 {
        format!("✅ STATUS: {} IMPROVED", summary.improved_count)
            .green()
            .bold()
    } else {
        "➡️  STATUS: NO CHANGE".yellow().bold()
    };
    out.push_str(&status_msg.to_string());
    out.push('\n');
    out
}

fn get_delta_symbol(change: i64) -> &'static str {
    if change > 0 {
        "📈"
    } else if change < 0 {
        "📉"
    } else {
        "➡️"
    }
}
