//! JSON report writer and reader.
//!
//! Profiles are written inside a small versioned envelope so a report can
//! be read back later (for instance as the base side of a diff).

use super::prepare_output_path;
use crate::diff::DiffReport;
use crate::parser::schema::Profile;
use crate::utils::config::REPORT_SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Versioned envelope around an aggregated profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    /// Report schema version
    pub version: String,

    /// RFC 3339 timestamp
    pub generated_at: String,

    /// Where the capture came from (usually its path)
    pub source: String,

    pub profile: Profile,
}

impl ProfileReport {
    pub fn new(profile: Profile, source: impl Into<String>) -> Self {
        Self {
            version: REPORT_SCHEMA_VERSION.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            source: source.into(),
            profile,
        }
    }
}

/// Write a profile report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_report(report: &ProfileReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    write_json(report, output_path.as_ref())
}

/// Write a diff report to a JSON file
pub fn write_diff_report(report: &DiffReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    write_json(report, output_path.as_ref())
}

/// Pretty JSON for any report, e.g. for stdout
pub fn report_to_string<T: Serialize>(report: &T) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Read a profile report from a JSON file
///
/// **Public** - lets a saved report stand in for a capture
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_report(input_path: impl AsRef<Path>) -> Result<ProfileReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path)?;
    let report: ProfileReport = serde_json::from_reader(BufReader::new(file))?;

    if report.version != REPORT_SCHEMA_VERSION {
        warn!(
            "Report {} has schema version {}, expected {}",
            input_path.display(),
            report.version,
            REPORT_SCHEMA_VERSION
        );
    }
    debug!(
        "Report loaded: {} profile from {}",
        report.profile.category, report.source
    );

    Ok(report)
}

fn write_json<T: Serialize>(value: &T, output_path: &Path) -> Result<(), OutputError> {
    info!("Writing JSON report to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let mut writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!(
        "Report written successfully ({} bytes)",
        calculate_file_size(output_path)
    );
    Ok(())
}

/// Calculate file size in bytes
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{CallPath, Category, Function, Stats};
    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    fn create_test_profile() -> Profile {
        Profile {
            category: Category::Cpu,
            total_samples: 30_000_000,
            stats: Stats {
                total_samples: 30_000_000,
                period: 10_000_000,
                sample_rate: 100,
                sample_count: 2,
                ..Default::default()
            },
            functions: vec![Function {
                name: "main.work".to_string(),
                file: "main.go".to_string(),
                line: 12,
                flat: 30_000_000,
                cum: 30_000_000,
                flat_pct: 100.0,
                cum_pct: 100.0,
                sum_pct: 100.0,
                call_paths: vec![CallPath::new(
                    vec!["main.work".to_string(), "main.main".to_string()],
                    30_000_000,
                )],
            }],
        }
    }

    #[test]
    fn test_write_and_read_report() {
        let report = ProfileReport::new(create_test_profile(), "cpu.pprof");
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        write_report(&report, path).unwrap();
        let loaded = read_report(path).unwrap();

        assert_eq!(loaded, report);
        assert_eq!(loaded.version, REPORT_SCHEMA_VERSION);
    }

    #[test]
    fn test_category_serialized_as_token() {
        let json = report_to_string(&create_test_profile()).unwrap();
        assert!(json.contains("\"category\": \"cpu\""));
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/profile.json");

        let report = ProfileReport::new(create_test_profile(), "cpu.pprof");
        write_report(&report, &nested_path).unwrap();

        assert!(nested_path.exists());
    }

    #[test]
    fn test_written_file_is_complete() {
        let report = ProfileReport::new(create_test_profile(), "cpu.pprof");
        let temp_file = NamedTempFile::new().unwrap();

        write_report(&report, temp_file.path()).unwrap();

        let on_disk = std::fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(on_disk, format!("{}\n", report_to_string(&report).unwrap()));
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = read_report(temp_dir.path().join("missing.json"));
        assert!(matches!(result, Err(OutputError::WriteFailed(_))));
    }
}
