mod common;

use common::{cpu_capture, heap_capture, CaptureBuilder};
use pprof_digest::aggregator::{aggregate, build_collapsed_stacks, merge_call_paths};
use pprof_digest::parser::{decode, Category};
use pretty_assertions::assert_eq;

fn cpu_profile() -> pprof_digest::parser::Profile {
    aggregate(&decode(&cpu_capture().encode()).unwrap(), Category::Cpu)
}

#[test]
fn test_heap_single_site() {
    let capture = decode(&heap_capture().encode()).unwrap();
    let profile = aggregate(&capture, Category::Heap);

    assert_eq!(profile.total_samples, 80_000);
    assert_eq!(profile.stats.alloc_objects, 1000);
    assert_eq!(profile.stats.inuse_bytes, 800);

    let grow = &profile.functions[0];
    assert_eq!(grow.name, "bytes.growSlice");
    assert_eq!(grow.flat, 80_000);
    assert_eq!(grow.flat_pct, 100.0);
    assert_eq!(grow.file, "buffer.go");
    assert_eq!(grow.line, 10);
}

#[test]
fn test_cpu_ranking() {
    let profile = cpu_profile();

    assert_eq!(profile.total_samples, 100_000_000);
    assert_eq!(profile.stats.sample_rate, 100);
    assert_eq!(profile.stats.sample_count, 3);

    let names: Vec<&str> = profile.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["main.compress", "main.hash", "main.handler", "main.main"]
    );

    let handler = profile.function("main.handler").unwrap();
    assert_eq!(handler.flat, 10_000_000);
    assert_eq!(handler.cum, 100_000_000);
    assert_eq!(handler.cum_pct, 100.0);
}

#[test]
fn test_flat_percentages_sum_to_hundred() {
    let profile = cpu_profile();
    let total: f64 = profile.functions.iter().map(|f| f.flat_pct).sum();
    assert!((total - 100.0).abs() < 1e-9);
}

#[test]
fn test_sort_order_and_running_sum() {
    let profile = cpu_profile();

    for pair in profile.functions.windows(2) {
        assert!(pair[0].flat >= pair[1].flat);
        if pair[0].flat == pair[1].flat {
            assert!(pair[0].name < pair[1].name);
        }
        assert!(pair[1].sum_pct >= pair[0].sum_pct);
    }
    let last = profile.functions.last().unwrap();
    assert!((last.sum_pct - 100.0).abs() < 1e-9);
}

#[test]
fn test_call_paths_are_already_merged() {
    let capture = CaptureBuilder::new()
        .sample_type("goroutine", "count")
        .function(1, "runtime.gopark", "proc.go")
        .function(2, "main.worker", "worker.go")
        .function(3, "main.main", "main.go")
        .sample(&[1, 2, 3], &[3])
        .sample(&[1, 3], &[2])
        .sample(&[1, 2, 3], &[4])
        .encode();
    let profile = aggregate(&decode(&capture).unwrap(), Category::Goroutine);

    for function in &profile.functions {
        assert_eq!(merge_call_paths(function.call_paths.clone()), function.call_paths);
    }
    let park = profile.function("runtime.gopark").unwrap();
    assert_eq!(park.call_paths.len(), 2);
    assert_eq!(park.call_paths[0].weight, 7);
}

#[test]
fn test_inlined_frames_credit_innermost() {
    let capture = CaptureBuilder::new()
        .sample_type("goroutine", "count")
        .function(1, "inner", "a.go")
        .function(2, "outer", "a.go")
        .function(3, "main", "main.go")
        .inlined_location(10, &[(1, 4), (2, 20)])
        .sample(&[10, 3], &[5])
        .encode();
    let profile = aggregate(&decode(&capture).unwrap(), Category::Goroutine);

    let inner = profile.function("inner").unwrap();
    let outer = profile.function("outer").unwrap();
    assert_eq!((inner.flat, inner.cum), (5, 5));
    assert_eq!((outer.flat, outer.cum), (0, 5));
    assert_eq!(inner.call_paths[0].stack, vec!["inner", "outer", "main"]);
}

#[test]
fn test_wrong_category_skips_every_sample() {
    // A goroutine capture has one value per sample; mutex needs two
    let capture = CaptureBuilder::new()
        .sample_type("goroutine", "count")
        .function(1, "f", "f.go")
        .sample(&[1], &[1])
        .sample(&[1], &[2])
        .encode();
    let profile = aggregate(&decode(&capture).unwrap(), Category::Mutex);

    assert_eq!(profile.stats.skipped_samples, 2);
    assert_eq!(profile.total_samples, 0);
    assert!(profile.functions.is_empty());
}

#[test]
fn test_collapsed_stacks_root_first() {
    let stacks = build_collapsed_stacks(&cpu_profile());
    let lines: Vec<String> = stacks.iter().map(|s| s.to_line()).collect();

    assert_eq!(
        lines,
        vec![
            "main.main;main.handler;main.compress 60000000",
            "main.main;main.handler;main.hash 30000000",
            "main.main;main.handler 10000000",
        ]
    );
}

#[test]
fn test_heap_totals_saturate_instead_of_overflowing() {
    let capture = CaptureBuilder::new()
        .sample_type("alloc_objects", "count")
        .sample_type("alloc_space", "bytes")
        .function(1, "huge", "huge.go")
        .function(2, "main.main", "main.go")
        .sample(&[1, 2], &[1, i64::MAX])
        .sample(&[1, 2], &[1, 1])
        .encode();
    let profile = aggregate(&decode(&capture).unwrap(), Category::Heap);

    assert_eq!(profile.total_samples, i64::MAX);
    assert_eq!(profile.stats.alloc_objects, 2);

    let huge = profile.function("huge").unwrap();
    assert_eq!((huge.flat, huge.cum), (i64::MAX, i64::MAX));
    assert_eq!(huge.flat_pct, 100.0);
    assert_eq!(huge.call_paths[0].weight, i64::MAX);
}

#[test]
fn test_cpu_totals_saturate_instead_of_overflowing() {
    let capture = CaptureBuilder::new()
        .sample_type("samples", "count")
        .sample_type("cpu", "nanoseconds")
        .period("cpu", "nanoseconds", 10_000_000)
        .function(1, "spin", "spin.go")
        .sample(&[1], &[1_000_000_000_000, 0])
        .sample(&[1], &[1_000_000_000_000, 0])
        .encode();
    let profile = aggregate(&decode(&capture).unwrap(), Category::Cpu);

    assert_eq!(profile.total_samples, i64::MAX);
    let spin = profile.function("spin").unwrap();
    assert_eq!(spin.flat, i64::MAX);
    assert!(spin.flat_pct > 0.0);

    let stacks = build_collapsed_stacks(&profile);
    assert_eq!(stacks[0].weight, i64::MAX);
}
