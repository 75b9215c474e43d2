//! Aggregated profile schema definitions.
//!
//! This module defines the `Profile` value produced by the aggregator and
//! consumed by the diff engine and every renderer. It is also the structure
//! we write to disk inside JSON reports.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic kind of a capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// CPU time samples
    Cpu,
    /// Heap allocation samples
    Heap,
    /// Goroutine counts
    Goroutine,
    /// Mutex / lock contention samples
    Mutex,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Cpu,
        Category::Heap,
        Category::Goroutine,
        Category::Mutex,
    ];

    /// External token for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cpu => "cpu",
            Category::Heap => "heap",
            Category::Goroutine => "goroutine",
            Category::Mutex => "mutex",
        }
    }

    /// Minimum length of a sample's value vector for this category
    pub fn required_values(&self) -> usize {
        match self {
            Category::Cpu | Category::Goroutine => 1,
            Category::Heap | Category::Mutex => 2,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Category::Cpu),
            "heap" => Ok(Category::Heap),
            "goroutine" => Ok(Category::Goroutine),
            "mutex" => Ok(Category::Mutex),
            other => Err(format!(
                "invalid profile type '{}' (expected one of: cpu, heap, goroutine, mutex)",
                other
            )),
        }
    }
}

/// Aggregated, ranked result of one capture
///
/// Built once by `aggregator::aggregate` and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Which kind of capture this came from
    pub category: Category,

    /// Category-defined total the percentages are relative to
    pub total_samples: i64,

    /// Category-specific summary counters
    pub stats: Stats,

    /// Functions sorted by flat descending, ties by name ascending
    pub functions: Vec<Function>,
}

impl Profile {
    /// Look up a function by name
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// The first `n` functions in rank order
    pub fn top(&self, n: usize) -> &[Function] {
        &self.functions[..n.min(self.functions.len())]
    }
}

/// Summary counters
///
/// Only the counters relevant to the profile's category are filled in; the
/// rest stay zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_samples: i64,
    pub duration_nanos: i64,
    pub period: i64,

    /// Sampling frequency in Hz (CPU only)
    pub sample_rate: i64,

    pub alloc_bytes: i64,
    pub alloc_objects: i64,
    pub inuse_bytes: i64,
    pub inuse_objects: i64,

    pub total_goroutines: i64,

    pub total_contention_nanos: i64,
    pub total_waits: i64,

    /// Samples that contributed to the aggregate
    pub sample_count: u64,

    /// Samples dropped because their value vector was too short
    pub skipped_samples: u64,
}

/// One row of the ranked function table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub file: String,
    pub line: i64,

    /// Metric attributed while this function is the innermost frame
    pub flat: i64,

    /// Metric attributed whenever this function is on the stack
    pub cum: i64,

    pub flat_pct: f64,
    pub cum_pct: f64,

    /// Running total of `flat_pct` down the ranked list
    pub sum_pct: f64,

    /// Distinct stacks ending in this function, heaviest first
    pub call_paths: Vec<CallPath>,
}

impl Function {
    /// Heaviest observed call path, if any
    pub fn heaviest_path(&self) -> Option<&CallPath> {
        self.call_paths.first()
    }
}

/// A distinct call stack with its aggregated weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallPath {
    /// Frame names from leaf to root
    pub stack: Vec<String>,
    pub weight: i64,
}

impl CallPath {
    pub fn new(stack: Vec<String>, weight: i64) -> Self {
        Self { stack, weight }
    }
}
