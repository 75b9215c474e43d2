//! Argument records for the CLI commands.
//!
//! `main.rs` builds these from parsed flags; the commands validate and run
//! them.

use crate::flamegraph::FlamegraphConfig;
use crate::parser::schema::Category;
use crate::pipeline::{OutputTarget, PipelineConfig};
use crate::utils::config::{DEFAULT_FLAMEGRAPH_WIDTH, DEFAULT_TOP_N};
use clap::ValueEnum;
use std::path::PathBuf;

/// Report format written by `analyze` and `diff`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Capture file to analyze
    pub input: PathBuf,

    /// Report destination (stdout when `None`)
    pub output: Option<PathBuf>,

    pub format: OutputFormat,

    /// Number of functions listed
    pub top_n: usize,

    /// Append the analysis guidance section (markdown only)
    pub include_guidance: bool,

    /// Skip auto-detection and use this category
    pub category_override: Option<Category>,

    /// Output path for SVG flamegraph (optional)
    pub flamegraph: Option<PathBuf>,

    /// Flamegraph title (defaults to one naming the category)
    pub flamegraph_title: Option<String>,

    /// Flamegraph width in pixels
    pub flamegraph_width: usize,

    /// Print the hottest stacks to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: None,
            format: OutputFormat::Markdown,
            top_n: DEFAULT_TOP_N,
            include_guidance: true,
            category_override: None,
            flamegraph: None,
            flamegraph_title: None,
            flamegraph_width: DEFAULT_FLAMEGRAPH_WIDTH,
            print_summary: false,
        }
    }
}

impl AnalyzeArgs {
    /// Flamegraph settings for a profile of `category`
    pub fn flamegraph_config(&self, category: Category) -> FlamegraphConfig {
        let config = FlamegraphConfig::for_category(category).with_width(self.flamegraph_width);
        match &self.flamegraph_title {
            Some(title) => config.with_title(title.clone()),
            None => config,
        }
    }

    /// The pipeline options these arguments describe
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            output: OutputTarget::from_option(self.output.clone()),
            top_n: self.top_n,
            include_guidance_prompt: self.include_guidance,
            category_override: self.category_override,
        }
    }
}

/// Arguments for the diff command
#[derive(Debug, Clone)]
pub struct DiffArgs {
    /// Base capture (or saved JSON report)
    pub base: PathBuf,

    /// New capture (or saved JSON report)
    pub new: PathBuf,

    pub base_type: Option<Category>,
    pub new_type: Option<Category>,

    /// Report destination (stdout when `None`)
    pub output: Option<PathBuf>,

    pub format: OutputFormat,

    /// Number of changed functions listed
    pub top_n: usize,

    pub include_guidance: bool,

    /// Print a coloured summary to stdout
    pub summary: bool,
}

impl Default for DiffArgs {
    fn default() -> Self {
        Self {
            base: PathBuf::new(),
            new: PathBuf::new(),
            base_type: None,
            new_type: None,
            output: None,
            format: OutputFormat::Markdown,
            top_n: DEFAULT_TOP_N,
            include_guidance: true,
            summary: false,
        }
    }
}
