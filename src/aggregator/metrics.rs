//! Per-category sample interpretation and ranking math.
//!
//! A sample's value vector means different things depending on the capture
//! category. `SampleReading` is the single place that knows the layout; the
//! rest of the aggregator only sees the primary metric.

use crate::parser::schema::{Category, Function, Stats};
use crate::utils::config::NANOS_PER_SECOND;
use crate::utils::error::AggregateError;

/// One sample's values, read according to its category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleReading {
    Cpu {
        samples: i64,
        nanos: i64,
    },
    Heap {
        alloc_objects: i64,
        alloc_bytes: i64,
        /// In-use objects and bytes, when the capture carries four values
        inuse: Option<(i64, i64)>,
    },
    Goroutine {
        count: i64,
    },
    Mutex {
        contentions: i64,
        delay_nanos: i64,
    },
}

impl SampleReading {
    /// Read `values` as a sample of `category`
    ///
    /// # Arguments
    /// * `index` - Position of the sample in the capture, for diagnostics
    /// * `period` - Capture sampling period; scales CPU sample counts to nanoseconds
    ///
    /// # Errors
    /// * `AggregateError::MalformedSample` - fewer values than the category needs
    pub fn interpret(
        category: Category,
        index: usize,
        values: &[i64],
        period: i64,
    ) -> Result<Self, AggregateError> {
        let required = category.required_values();
        if values.len() < required {
            return Err(AggregateError::MalformedSample {
                index,
                category,
                required,
                actual: values.len(),
            });
        }

        let reading = match category {
            Category::Cpu => {
                let samples = values[0];
                // Without a period there is nothing to scale by; keep raw counts
                let nanos = if period > 0 {
                    samples.saturating_mul(period)
                } else {
                    samples
                };
                SampleReading::Cpu { samples, nanos }
            }
            Category::Heap => SampleReading::Heap {
                alloc_objects: values[0],
                alloc_bytes: values[1],
                inuse: match values {
                    [_, _, objects, bytes, ..] => Some((*objects, *bytes)),
                    _ => None,
                },
            },
            Category::Goroutine => SampleReading::Goroutine { count: values[0] },
            Category::Mutex => SampleReading::Mutex {
                contentions: values[0],
                delay_nanos: values[1],
            },
        };
        Ok(reading)
    }

    /// Value credited to flat and cum
    pub fn metric(&self) -> i64 {
        match *self {
            SampleReading::Cpu { nanos, .. } => nanos,
            SampleReading::Heap { alloc_bytes, .. } => alloc_bytes,
            SampleReading::Goroutine { count } => count,
            SampleReading::Mutex { delay_nanos, .. } => delay_nanos,
        }
    }

    /// Add this sample to the summary counters
    ///
    /// Counters saturate at the i64 bounds instead of wrapping.
    pub fn accumulate(&self, stats: &mut Stats) {
        let add = |total: &mut i64, value: i64| *total = total.saturating_add(value);
        match *self {
            SampleReading::Cpu { nanos, .. } => {
                add(&mut stats.total_samples, nanos);
            }
            SampleReading::Heap {
                alloc_objects,
                alloc_bytes,
                inuse,
            } => {
                add(&mut stats.alloc_objects, alloc_objects);
                add(&mut stats.alloc_bytes, alloc_bytes);
                if let Some((objects, bytes)) = inuse {
                    add(&mut stats.inuse_objects, objects);
                    add(&mut stats.inuse_bytes, bytes);
                }
            }
            SampleReading::Goroutine { count } => {
                add(&mut stats.total_goroutines, count);
            }
            SampleReading::Mutex {
                contentions,
                delay_nanos,
            } => {
                add(&mut stats.total_contention_nanos, delay_nanos);
                add(&mut stats.total_waits, contentions);
            }
        }
        stats.sample_count += 1;
    }
}

/// The total percentages are computed against
pub fn category_total(category: Category, stats: &Stats) -> i64 {
    match category {
        Category::Cpu => stats.total_samples,
        Category::Heap => stats.alloc_bytes,
        Category::Goroutine => stats.total_goroutines,
        Category::Mutex => stats.total_contention_nanos,
    }
}

/// Sampling frequency in Hz for a period in nanoseconds
pub fn sample_rate_hz(period: i64) -> i64 {
    if period > 0 {
        NANOS_PER_SECOND / period
    } else {
        0
    }
}

/// `part` as a percentage of `total`; zero when the total is zero
pub fn percentage(part: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Sort by flat descending (ties by name) and fill in the running `sum_pct`
pub fn rank_functions(functions: &mut [Function]) {
    functions.sort_by(|a, b| b.flat.cmp(&a.flat).then_with(|| a.name.cmp(&b.name)));

    let mut running = 0.0;
    for function in functions.iter_mut() {
        running += function.flat_pct;
        function.sum_pct = running;
    }
}
