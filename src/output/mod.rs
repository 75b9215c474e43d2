//! Output renderers and writers.
//!
//! This module handles turning results into text and writing them out:
//! - Markdown reports for a profile or a diff
//! - JSON reports (versioned envelope)
//! - SVG flamegraphs
//! - Plain text to stdout or a file

pub mod format;
pub mod json;
pub mod markdown;
pub mod svg;

// Re-export main functions
pub use json::{read_report, report_to_string, write_diff_report, write_report, ProfileReport};
pub use markdown::{render_diff_markdown, render_profile_markdown};
pub use svg::write_svg;

use crate::pipeline::OutputTarget;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write rendered text to stdout or a file
pub fn write_text(target: &OutputTarget, content: &str) -> Result<(), OutputError> {
    match target {
        OutputTarget::Stdout => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(content.as_bytes())?;
            handle.flush()?;
        }
        OutputTarget::File(path) => {
            prepare_output_path(path)?;
            let mut writer = BufWriter::new(File::create(path)?);
            writer.write_all(content.as_bytes())?;
            writer.flush()?;
            info!("Wrote {} bytes to {}", content.len(), path.display());
        }
    }
    Ok(())
}

/// Validate an output path and create its parent directories
///
/// # Errors
/// * `OutputError::InvalidPath` - empty path, an existing directory, or a
///   parent directory that cannot be created
pub(crate) fn prepare_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
