//! Configuration and constants for the CLI and the analysis pipeline.

/// Current output schema version for JSON reports
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Number of functions shown when the caller does not ask for a specific count
pub const DEFAULT_TOP_N: usize = 20;
pub const MAX_TOP_N: usize = 10_000;

/// First two bytes of every gzip member
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

// Sample-type names used by the classifier. Different Go runtime versions and
// third-party writers use different spellings, so every list is matched exactly.
pub const CPU_TYPE_NAMES: &[&str] = &["cpu", "samples"];
pub const CPU_UNIT_NAMES: &[&str] = &["nanoseconds", "seconds", "count"];
pub const TIME_UNIT_NAMES: &[&str] = &["nanoseconds", "seconds", "milliseconds"];
pub const HEAP_TYPE_NAMES: &[&str] = &[
    "alloc_objects",
    "inuse_objects",
    "alloc_space",
    "inuse_space",
];
pub const HEAP_OBJECT_TYPE_NAMES: &[&str] = &["alloc_objects", "inuse_objects"];
pub const HEAP_UNIT_NAMES: &[&str] = &["bytes"];
pub const GOROUTINE_TYPE_NAMES: &[&str] = &["goroutines", "goroutine"];
pub const MUTEX_TYPE_NAMES: &[&str] = &["contentions", "lock_duration"];
pub const MUTEX_UNIT_NAMES: &[&str] = &["lock_ns", "contentions"];
pub const MUTEX_COUNT_TYPE_NAME: &str = "contentions";

/// Call paths listed per function in markdown reports
pub const MAX_CALL_PATHS_SHOWN: usize = 5;

pub const DEFAULT_FLAMEGRAPH_WIDTH: usize = 1200;
