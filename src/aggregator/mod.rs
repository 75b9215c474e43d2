//! Aggregation of decoded captures into ranked per-function metrics.
//!
//! This module transforms a `Capture` into:
//! - Flat and cumulative metrics per function
//! - Merged call paths per function
//! - Category-specific summary stats
//! - Collapsed stacks (for flamegraph generation)

pub mod metrics;
pub mod stack_builder;

pub use metrics::{category_total, percentage, rank_functions, SampleReading};
pub use stack_builder::{
    build_collapsed_stacks, merge_call_paths, resolve_frames, CollapsedStack, Frame,
};

use crate::parser::capture::Capture;
use crate::parser::schema::{CallPath, Category, Function, Profile, Stats};
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};

/// Accumulated metrics for one function before ranking
#[derive(Debug, Default)]
struct FunctionData {
    file: String,
    line: i64,
    flat: i64,
    cum: i64,
    call_paths: Vec<CallPath>,
}

/// Aggregate a capture into a ranked `Profile`
///
/// **Public** - main entry point for aggregation
///
/// Samples whose value vector is too short for `category` are logged,
/// skipped and counted in `stats.skipped_samples`; they never abort the run.
pub fn aggregate(capture: &Capture, category: Category) -> Profile {
    debug!(
        "Aggregating {} samples as {} profile",
        capture.samples.len(),
        category
    );

    let index = capture.index();
    let mut stats = Stats {
        duration_nanos: capture.duration_nanos,
        period: capture.period,
        ..Default::default()
    };
    let mut table: HashMap<String, FunctionData> = HashMap::new();

    for (sample_index, sample) in capture.samples.iter().enumerate() {
        let reading = match SampleReading::interpret(
            category,
            sample_index,
            &sample.values,
            capture.period,
        ) {
            Ok(reading) => reading,
            Err(e) => {
                warn!("Skipping sample: {}", e);
                stats.skipped_samples += 1;
                continue;
            }
        };
        reading.accumulate(&mut stats);
        let metric = reading.metric();

        let frames = resolve_frames(sample, &index);
        let stack: Vec<String> = frames.iter().map(|f| f.name.to_string()).collect();
        let mut seen: HashSet<&str> = HashSet::with_capacity(frames.len());

        for frame in &frames {
            let data = table
                .entry(frame.name.to_string())
                .or_insert_with(|| FunctionData {
                    file: frame.file.to_string(),
                    line: frame.line,
                    ..Default::default()
                });

            if frame.is_leaf {
                data.flat = data.flat.saturating_add(metric);
                data.call_paths.push(CallPath::new(stack.clone(), metric));
            }

            // Recursive frames credit cum once per sample
            if seen.insert(frame.name) {
                data.cum = data.cum.saturating_add(metric);
            }
        }
    }

    if category == Category::Cpu {
        stats.sample_rate = metrics::sample_rate_hz(capture.period);
    }
    let total = category_total(category, &stats);

    let mut functions: Vec<Function> = table
        .into_iter()
        .map(|(name, data)| Function {
            name,
            file: data.file,
            line: data.line,
            flat: data.flat,
            cum: data.cum,
            flat_pct: percentage(data.flat, total),
            cum_pct: percentage(data.cum, total),
            sum_pct: 0.0,
            call_paths: merge_call_paths(data.call_paths),
        })
        .collect();
    rank_functions(&mut functions);

    info!(
        "Aggregated {} samples into {} functions (total {}, {} skipped)",
        stats.sample_count,
        functions.len(),
        total,
        stats.skipped_samples
    );

    Profile {
        category,
        total_samples: total,
        stats,
        functions,
    }
}
