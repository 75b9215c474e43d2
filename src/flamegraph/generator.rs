//! SVG flamegraph and hot-stack summary generation.

use crate::aggregator::stack_builder::{build_collapsed_stacks, CollapsedStack};
use crate::output::format::format_metric;
use crate::parser::schema::{Category, Profile};
use crate::utils::config::DEFAULT_FLAMEGRAPH_WIDTH;
use crate::utils::error::FlamegraphError;
use colored::*;
use log::info;

/// Flamegraph configuration
#[derive(Debug, Clone)]
pub struct FlamegraphConfig {
    pub title: String,
    pub width: usize,

    /// Label inferno uses for weights in tooltips
    pub count_name: String,
}

impl Default for FlamegraphConfig {
    fn default() -> Self {
        Self {
            title: "Profile".to_string(),
            width: DEFAULT_FLAMEGRAPH_WIDTH,
            count_name: "samples".to_string(),
        }
    }
}

impl FlamegraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Title and weight label suited to a category
    pub fn for_category(category: Category) -> Self {
        let (title, count_name) = match category {
            Category::Cpu => ("CPU Profile", "nanoseconds"),
            Category::Heap => ("Heap Allocation Profile", "bytes"),
            Category::Goroutine => ("Goroutine Profile", "goroutines"),
            Category::Mutex => ("Lock Contention Profile", "nanoseconds"),
        };
        Self::new().with_title(title).with_count_name(count_name)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_count_name(mut self, count_name: impl Into<String>) -> Self {
        self.count_name = count_name.into();
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
}

/// Generate an SVG flamegraph from a profile's call paths
///
/// # Errors
/// * `FlamegraphError::EmptyStacks` - no call path with a positive weight
/// * `FlamegraphError::RenderFailed` - inferno rejected the input
pub fn generate_flamegraph(
    profile: &Profile,
    config: Option<&FlamegraphConfig>,
) -> Result<String, FlamegraphError> {
    let stacks = build_collapsed_stacks(profile);
    if stacks.is_empty() {
        return Err(FlamegraphError::EmptyStacks);
    }

    let config = config
        .cloned()
        .unwrap_or_else(|| FlamegraphConfig::for_category(profile.category));
    info!("Generating flamegraph with {} stacks", stacks.len());

    let lines: Vec<String> = stacks.iter().map(CollapsedStack::to_line).collect();

    let mut opts = inferno::flamegraph::Options::default();
    opts.title = config.title;
    opts.count_name = config.count_name;
    opts.image_width = Some(config.width);

    let mut svg_output = Vec::new();
    inferno::flamegraph::from_lines(&mut opts, lines.iter().map(String::as_str), &mut svg_output)
        .map_err(|e| FlamegraphError::RenderFailed(e.to_string()))?;

    let svg = String::from_utf8(svg_output)
        .map_err(|e| FlamegraphError::RenderFailed(e.to_string()))?;

    info!("Flamegraph generated successfully ({} bytes)", svg.len());
    Ok(svg)
}

/// Terminal table of the heaviest collapsed stacks
///
/// Shows the leaf of each stack, its share of `total` and a bar.
pub fn generate_text_summary(
    stacks: &[CollapsedStack],
    max_lines: usize,
    category: Category,
    total: i64,
) -> String {
    let mut lines = Vec::new();
    let total = total.max(1);

    lines.push(format!("  🔥 {}", "HOTTEST STACKS".bold()));
    lines.push(format!(
        "  {:<40} {:>14} {:>7}",
        "Leaf (root ... leaf)", "WEIGHT", "%"
    ));

    for stack in stacks.iter().take(max_lines) {
        let percentage = (stack.weight as f64 / total as f64) * 100.0;
        let leaf = stack.stack.rsplit(';').next().unwrap_or(&stack.stack);
        let display = shorten(leaf, 40);
        let bar = "█".repeat((percentage / 4.0).round() as usize);

        let row = format!(
            "  {:<40} {:>14} {:>6.1}% {}",
            display,
            format_metric(category, stack.weight),
            percentage,
            bar
        );
        lines.push(if percentage >= 20.0 {
            row.red().to_string()
        } else if percentage >= 5.0 {
            row.yellow().to_string()
        } else {
            row
        });
    }

    if stacks.len() > max_lines {
        lines.push(format!(
            "   (Showing top {} of {} unique stacks)",
            max_lines,
            stacks.len()
        ));
    }

    lines.join("\n")
}

fn shorten(name: &str, max: usize) -> String {
    let count = name.chars().count();
    if count <= max {
        return name.to_string();
    }
    let tail: String = name.chars().skip(count - (max - 3)).collect();
    format!("...{}", tail)
}
