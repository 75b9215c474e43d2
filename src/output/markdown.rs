//! Markdown report rendering.
//!
//! Turns a `Profile` or a `DiffReport` into a markdown document: a summary
//! block tailored to the category, a ranked table and, for single profiles,
//! the heaviest call paths of every listed function. An optional guidance
//! section lists questions worth asking about the data.

use super::format::{
    format_bytes, format_duration_nanos, format_number, format_signed, metric_formatter,
};
use crate::diff::{DiffReport, FunctionDiff};
use crate::parser::schema::{Category, Function, Profile, Stats};
use crate::utils::config::MAX_CALL_PATHS_SHOWN;

/// Render a single profile as markdown
///
/// # Arguments
/// * `profile` - Aggregated profile
/// * `top_n` - Maximum number of functions in the table
/// * `include_guidance` - Append the per-category analysis guidance
pub fn render_profile_markdown(profile: &Profile, top_n: usize, include_guidance: bool) -> String {
    let category = profile.category;
    let fmt = metric_formatter(category, profile.stats.period);
    let functions = profile.top(top_n);
    let mut out = String::new();

    out.push_str(&format!("# {} Profile Analysis\n\n", category));
    out.push_str("## Summary Statistics\n\n");
    out.push_str(&render_profile_stats(profile));

    out.push_str(&format!("\n## Top {} Functions\n\n", category));
    out.push_str(&format!(
        "| Rank | Function | File | {} | % of Total | Sum % | Cumulative | Cumulative % |\n",
        metric_header(category, profile.stats.period)
    ));
    out.push_str("|------|----------|------|-------|------------|-------|------------|--------------|\n");
    for (i, f) in functions.iter().enumerate() {
        out.push_str(&format!(
            "| {} | `{}` | {} | {} | {:.2}% | {:.2}% | {} | {:.2}% |\n",
            i + 1,
            f.name,
            location(f),
            fmt(f.flat),
            f.flat_pct,
            f.sum_pct,
            fmt(f.cum),
            f.cum_pct
        ));
    }

    for f in functions.iter().filter(|f| !f.call_paths.is_empty()) {
        out.push_str(&render_call_paths(f, fmt));
    }

    if include_guidance {
        out.push_str(profile_guidance(category));
    }

    out
}

/// Render a diff report as markdown
pub fn render_diff_markdown(report: &DiffReport, include_guidance: bool) -> String {
    let category = report.category;
    let fmt = metric_formatter(category, report.base_stats.period.min(report.new_stats.period));
    let mut out = String::new();

    out.push_str(&format!("# {} Profile Diff: Base vs New\n\n", category));
    out.push_str("## Summary\n\n");
    out.push_str("| Metric | Base | New | Delta |\n");
    out.push_str("|--------|------|-----|-------|\n");
    out.push_str(&render_diff_stats(report));

    out.push_str(&format!(
        "\n{} new, {} removed, {} regressed, {} improved.\n",
        report.summary.new_count,
        report.summary.removed_count,
        report.summary.regressed_count,
        report.summary.improved_count
    ));

    out.push_str("\n## Top Changed Functions\n\n");
    out.push_str("| Rank | Function | Base | New | Flat Δ | Flat Δ% | Cum Δ | Cum Δ% |\n");
    out.push_str("|------|----------|------|-----|--------|---------|-------|--------|\n");
    for (i, d) in report.functions.iter().enumerate() {
        out.push_str(&format!(
            "| {} | `{}`{} | {} | {} | {} | {:+.1}% | {} | {:+.1}% |\n",
            i + 1,
            d.name,
            change_tag(d),
            if d.is_new {
                "-".to_string()
            } else {
                fmt(d.base_cum)
            },
            if d.is_removed {
                "-".to_string()
            } else {
                fmt(d.new_cum)
            },
            format_signed(fmt, d.flat_delta),
            d.flat_delta_pct,
            format_signed(fmt, d.cum_delta),
            d.cum_delta_pct
        ));
    }

    if include_guidance {
        out.push_str(DIFF_GUIDANCE);
    }

    out
}

fn metric_header(category: Category, period: i64) -> &'static str {
    match category {
        Category::Cpu if period <= 0 => "CPU Samples",
        Category::Cpu => "CPU Time",
        Category::Heap => "Allocated Bytes",
        Category::Goroutine => "Goroutines",
        Category::Mutex => "Contention Time",
    }
}

fn location(f: &Function) -> String {
    if f.file.is_empty() {
        "-".to_string()
    } else {
        format!("{}:{}", f.file, f.line)
    }
}

fn change_tag(d: &FunctionDiff) -> &'static str {
    if d.is_new {
        " (new)"
    } else if d.is_removed {
        " (removed)"
    } else {
        ""
    }
}

fn render_profile_stats(profile: &Profile) -> String {
    let s = &profile.stats;
    let mut lines = match profile.category {
        Category::Cpu => vec![
            format!(
                "- **Profile Duration:** {}",
                format_duration_nanos(s.duration_nanos)
            ),
            format!(
                "- **Total {}:** {}",
                metric_header(Category::Cpu, s.period),
                metric_formatter(Category::Cpu, s.period)(profile.total_samples)
            ),
            format!("- **Sample Rate:** {} Hz", s.sample_rate),
        ],
        Category::Heap => vec![
            format!("- **Allocated Objects:** {}", format_number(s.alloc_objects)),
            format!("- **Allocated Bytes:** {}", format_bytes(s.alloc_bytes)),
            format!("- **In-Use Objects:** {}", format_number(s.inuse_objects)),
            format!("- **In-Use Bytes:** {}", format_bytes(s.inuse_bytes)),
        ],
        Category::Goroutine => vec![format!(
            "- **Total Goroutines:** {}",
            format_number(s.total_goroutines)
        )],
        Category::Mutex => vec![
            format!(
                "- **Total Contention Time:** {}",
                format_duration_nanos(s.total_contention_nanos)
            ),
            format!("- **Total Waits:** {}", format_number(s.total_waits)),
        ],
    };
    lines.push(format!("- **Samples:** {}", s.sample_count));
    if s.skipped_samples > 0 {
        lines.push(format!("- **Skipped Samples:** {}", s.skipped_samples));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn stat_row(label: &str, base: i64, new: i64, fmt: fn(i64) -> String) -> String {
    format!(
        "| {} | {} | {} | {} |\n",
        label,
        fmt(base),
        fmt(new),
        format_signed(fmt, new.saturating_sub(base))
    )
}

fn render_diff_stats(report: &DiffReport) -> String {
    let (b, n): (&Stats, &Stats) = (&report.base_stats, &report.new_stats);
    match report.category {
        Category::Cpu => [
            stat_row(
                metric_header(Category::Cpu, b.period.min(n.period)),
                report.base_total,
                report.new_total,
                metric_formatter(Category::Cpu, b.period.min(n.period)),
            ),
            stat_row(
                "Duration",
                b.duration_nanos,
                n.duration_nanos,
                format_duration_nanos,
            ),
        ]
        .concat(),
        Category::Heap => [
            stat_row("Allocated Bytes", b.alloc_bytes, n.alloc_bytes, format_bytes),
            stat_row(
                "Allocated Objects",
                b.alloc_objects,
                n.alloc_objects,
                format_number,
            ),
            stat_row("In-Use Bytes", b.inuse_bytes, n.inuse_bytes, format_bytes),
            stat_row(
                "In-Use Objects",
                b.inuse_objects,
                n.inuse_objects,
                format_number,
            ),
        ]
        .concat(),
        Category::Goroutine => stat_row(
            "Total Goroutines",
            b.total_goroutines,
            n.total_goroutines,
            format_number,
        ),
        Category::Mutex => [
            stat_row(
                "Contention Time",
                b.total_contention_nanos,
                n.total_contention_nanos,
                format_duration_nanos,
            ),
            stat_row("Total Waits", b.total_waits, n.total_waits, format_number),
        ]
        .concat(),
    }
}

fn render_call_paths(f: &Function, fmt: fn(i64) -> String) -> String {
    let mut out = format!("\n### {}\n", f.name);

    for (i, path) in f.call_paths.iter().take(MAX_CALL_PATHS_SHOWN).enumerate() {
        out.push_str(&format!(
            "\n**Call Path #{}** (weight: {})\n\n```\n",
            i + 1,
            fmt(path.weight)
        ));
        for (depth, frame) in path.stack.iter().enumerate() {
            if depth == 0 {
                out.push_str(&format!("→ {}\n", frame));
            } else {
                out.push_str(&format!("  {}\n", frame));
            }
        }
        out.push_str("```\n");
    }

    let hidden = f.call_paths.len().saturating_sub(MAX_CALL_PATHS_SHOWN);
    if hidden > 0 {
        out.push_str(&format!("\n_{} more call paths not shown._\n", hidden));
    }
    out
}

fn profile_guidance(category: Category) -> &'static str {
    match category {
        Category::Cpu => CPU_GUIDANCE,
        Category::Heap => HEAP_GUIDANCE,
        Category::Goroutine => GOROUTINE_GUIDANCE,
        Category::Mutex => MUTEX_GUIDANCE,
    }
}

const CPU_GUIDANCE: &str = "
---

## Analysis Guidance

Questions to answer from this CPU profile:

1. **Hotspots**: Which functions burn the most CPU themselves (flat), and what work are they doing?
2. **Critical paths**: For the five functions with the highest cumulative time, which call paths lead to them?
3. **Avoidable work**: Is any hot function recomputing results that could be cached, or running an algorithm with poor complexity?
4. **Next steps**: Which source files deserve a closer look first?
";

const HEAP_GUIDANCE: &str = "
---

## Analysis Guidance

Questions to answer from this heap profile:

1. **Allocation sites**: Which functions allocate the most bytes, and are those allocations necessary?
2. **Retention**: Do the in-use figures point at objects that live longer than expected?
3. **Churn**: Are there many small, short-lived allocations that a buffer or pool could absorb?
4. **Next steps**: Which data structures or call paths would shrink memory use the most if changed?
";

const GOROUTINE_GUIDANCE: &str = "
---

## Analysis Guidance

Questions to answer from this goroutine profile:

1. **Where they wait**: Which stacks hold the most goroutines, and what are they blocked on?
2. **Leaks**: Are there goroutines that can never exit, such as readers on channels nobody closes?
3. **Fan-out**: Is goroutine creation bounded, or does it grow with load?
4. **Next steps**: Would a worker pool, timeouts or context cancellation reduce the count?
";

const MUTEX_GUIDANCE: &str = "
---

## Analysis Guidance

Questions to answer from this contention profile:

1. **Contended locks**: Which call paths spend the most time waiting to acquire a lock?
2. **Hold times**: Are critical sections doing I/O or other slow work while holding the lock?
3. **Granularity**: Could a coarse lock be split, sharded or replaced with atomics or channels?
4. **Next steps**: Which lock should be addressed first for the biggest reduction in waiting?
";

const DIFF_GUIDANCE: &str = "
---

## Analysis Guidance

Questions to answer from this comparison:

1. **Overall impact**: Did the total move in the expected direction, and by how much?
2. **Regressions**: Which functions grew the most, and what changed in or around them?
3. **Improvements**: Which functions shrank, and was that intended?
4. **New and removed**: Do the functions that appeared or disappeared match the code changes between the two captures?
";
