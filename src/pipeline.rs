//! Decode → classify → aggregate entry points.
//!
//! All options a run needs travel in a `PipelineConfig`; nothing here reads
//! global state.

use crate::aggregator::aggregate;
use crate::output::{render_profile_markdown, write_text};
use crate::parser::schema::{Category, Profile};
use crate::parser::{classify_with_rule, decode};
use crate::utils::config::DEFAULT_TOP_N;
use crate::utils::error::PipelineError;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Where rendered output goes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputTarget {
    #[default]
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    /// `Stdout` when no path is given
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map_or(OutputTarget::Stdout, OutputTarget::File)
    }
}

/// Options for one analysis run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub output: OutputTarget,

    /// Number of functions rendered
    pub top_n: usize,

    /// Append the analysis guidance section to reports
    pub include_guidance_prompt: bool,

    /// Skip classification and treat the capture as this category
    pub category_override: Option<Category>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output: OutputTarget::Stdout,
            top_n: DEFAULT_TOP_N,
            include_guidance_prompt: true,
            category_override: None,
        }
    }
}

/// Decode, classify and aggregate one capture held in memory
///
/// **Public** - main library entry point
///
/// # Errors
/// * `PipelineError::Decode` - corrupt gzip envelope
/// * `PipelineError::Classify` - no category could be determined (only
///   when `category_override` is `None`)
pub fn analyze_bytes(
    bytes: &[u8],
    category_override: Option<Category>,
) -> Result<Profile, PipelineError> {
    let capture = decode(bytes)?;

    let category = match category_override {
        Some(category) => {
            debug!("Using category override: {}", category);
            category
        }
        None => classify_with_rule(&capture)?.0,
    };

    Ok(aggregate(&capture, category))
}

/// Read a capture file and run [`analyze_bytes`] on it
pub fn load_profile(
    path: impl AsRef<Path>,
    category_override: Option<Category>,
) -> Result<Profile, PipelineError> {
    let path = path.as_ref();
    info!("Reading capture: {}", path.display());
    let bytes = std::fs::read(path)?;
    analyze_bytes(&bytes, category_override)
}

/// Analyze a capture and write its markdown report to `config.output`
///
/// Returns the profile so callers can render further artifacts from it.
pub fn run(bytes: &[u8], config: &PipelineConfig) -> Result<Profile, PipelineError> {
    let profile = analyze_bytes(bytes, config.category_override)?;
    let markdown =
        render_profile_markdown(&profile, config.top_n, config.include_guidance_prompt);
    write_text(&config.output, &markdown)?;
    Ok(profile)
}
