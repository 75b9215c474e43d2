mod common;

use common::{cpu_capture, heap_capture, CaptureBuilder};
use pprof_digest::parser::{classify, classify_with_rule, decode, Category, ClassificationRule};
use pprof_digest::utils::error::ClassifyError;

#[test]
fn test_classify_go_captures() {
    let cpu = decode(&cpu_capture().encode()).unwrap();
    assert_eq!(classify(&cpu).unwrap(), Category::Cpu);

    let heap = decode(&heap_capture().encode()).unwrap();
    assert_eq!(classify(&heap).unwrap(), Category::Heap);
}

#[test]
fn test_classify_mutex() {
    let capture = decode(
        &CaptureBuilder::new()
            .sample_type("contentions", "count")
            .sample_type("lock_duration", "nanoseconds")
            .encode(),
    )
    .unwrap();
    assert_eq!(
        classify_with_rule(&capture).unwrap(),
        (Category::Mutex, ClassificationRule::SampleType)
    );
}

#[test]
fn test_classify_goroutine_spellings() {
    for name in ["goroutine", "goroutines"] {
        let capture = decode(&CaptureBuilder::new().sample_type(name, "count").encode()).unwrap();
        assert_eq!(classify(&capture).unwrap(), Category::Goroutine, "{}", name);
    }
}

#[test]
fn test_period_type_rescues_unknown_sample_type() {
    let capture = decode(
        &CaptureBuilder::new()
            .sample_type("wall", "ticks")
            .period("cpu", "nanoseconds", 1_000_000)
            .encode(),
    )
    .unwrap();
    assert_eq!(
        classify_with_rule(&capture).unwrap(),
        (Category::Cpu, ClassificationRule::PeriodType)
    );
}

#[test]
fn test_empty_capture_is_unknown() {
    let capture = decode(&[0xde, 0xad, 0xbe, 0xef]).unwrap();
    let err = classify(&capture).unwrap_err();
    let ClassifyError::UnknownCategory(types) = err;
    assert!(types.is_empty());
}
