mod common;

use common::{cpu_capture, heap_capture, CaptureBuilder};
use pprof_digest::commands::{execute_analyze, execute_diff, load_input, AnalyzeArgs, DiffArgs, OutputFormat};
use pprof_digest::output::{read_report, write_report, ProfileReport};
use pprof_digest::parser::Category;
use pprof_digest::pipeline::{analyze_bytes, run, OutputTarget, PipelineConfig};
use pprof_digest::utils::error::PipelineError;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_run_writes_markdown() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("reports/cpu.md");
    let config = PipelineConfig {
        output: OutputTarget::File(out.clone()),
        top_n: 2,
        ..Default::default()
    };

    let profile = run(&cpu_capture().encode_gzip(), &config).unwrap();
    assert_eq!(profile.category, Category::Cpu);

    let markdown = fs::read_to_string(&out).unwrap();
    assert!(markdown.contains("main.compress"));
    assert!(markdown.contains("main.hash"));
    // Only the top two functions are tabled
    assert!(!markdown.contains("| 3 | `"));
}

#[test]
fn test_unknown_capture_fails_without_override() {
    let bytes = CaptureBuilder::new()
        .sample_type("wall", "ticks")
        .function(1, "f", "f.go")
        .sample(&[1], &[5])
        .encode();

    let err = analyze_bytes(&bytes, None).unwrap_err();
    assert!(matches!(err, PipelineError::Classify(_)));
    assert!(err.to_string().contains("wall/ticks"));

    let profile = analyze_bytes(&bytes, Some(Category::Goroutine)).unwrap();
    assert_eq!(profile.total_samples, 5);
}

#[test]
fn test_corrupt_gzip_surfaces_decode_error() {
    let err = analyze_bytes(&[0x1f, 0x8b, 0xff, 0xff, 0xff], None).unwrap_err();
    assert!(matches!(err, PipelineError::Decode(_)));
}

#[test]
fn test_json_report_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("heap.json");
    let profile = analyze_bytes(&heap_capture().encode(), None).unwrap();

    write_report(&ProfileReport::new(profile.clone(), "heap.pb.gz"), &path).unwrap();
    let report = read_report(&path).unwrap();

    assert_eq!(report.source, "heap.pb.gz");
    assert_eq!(report.profile, profile);
}

#[test]
fn test_load_input_accepts_saved_reports() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cpu.json");
    let profile = analyze_bytes(&cpu_capture().encode(), None).unwrap();
    write_report(&ProfileReport::new(profile.clone(), "cpu.pb"), &path).unwrap();

    assert_eq!(load_input(&path, None).unwrap(), profile);
    assert_eq!(load_input(&path, Some(Category::Cpu)).unwrap(), profile);
    assert!(load_input(&path, Some(Category::Heap)).is_err());
}

#[test]
fn test_analyze_command_end_to_end() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cpu.pb.gz");
    fs::write(&input, cpu_capture().encode_gzip()).unwrap();

    let report = dir.path().join("cpu.json");
    let svg = dir.path().join("cpu.svg");
    execute_analyze(AnalyzeArgs {
        input: input.clone(),
        output: Some(report.clone()),
        format: OutputFormat::Json,
        flamegraph: Some(svg.clone()),
        ..Default::default()
    })
    .unwrap();

    let saved = read_report(&report).unwrap();
    assert_eq!(saved.profile.functions[0].name, "main.compress");

    let svg = fs::read_to_string(&svg).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("main.compress"));
}

#[test]
fn test_diff_command_from_report_and_capture() {
    let dir = TempDir::new().unwrap();
    let base_capture = dir.path().join("base.pb");
    fs::write(&base_capture, cpu_capture().encode()).unwrap();

    let base_report = dir.path().join("base.json");
    execute_analyze(AnalyzeArgs {
        input: base_capture.clone(),
        output: Some(base_report.clone()),
        format: OutputFormat::Json,
        ..Default::default()
    })
    .unwrap();

    let out = dir.path().join("diff.md");
    execute_diff(DiffArgs {
        base: base_report,
        new: base_capture,
        output: Some(out.clone()),
        ..Default::default()
    })
    .unwrap();

    let markdown = fs::read_to_string(&out).unwrap();
    assert!(markdown.contains("main.compress"));
}

#[test]
fn test_missing_input_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = execute_analyze(AnalyzeArgs {
        input: dir.path().join("missing.pb.gz"),
        ..Default::default()
    })
    .unwrap_err();
    assert!(err.to_string().contains("File not found"));
}
