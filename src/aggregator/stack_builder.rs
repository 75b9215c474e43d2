//! Resolve sample stacks into named frames and collapse call paths.
//!
//! Two shapes come out of here:
//! - `Frame` lists, leaf first, used by the aggregator to credit flat/cum
//! - Collapsed stack lines, root first, the input format for flamegraphs
//!
//! Example collapsed line: "main;handler;compress 1200"
//! (main called handler which called compress, weight 1200).

use crate::parser::capture::{CaptureIndex, Sample};
use crate::parser::schema::{CallPath, Profile};
use log::debug;
use std::collections::HashMap;

/// One resolved (possibly inlined) frame of a sample's stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<'a> {
    pub name: &'a str,
    pub file: &'a str,
    pub line: i64,

    /// Innermost frame of the leaf location
    pub is_leaf: bool,
}

/// Resolve a sample's location ids into frames, innermost first
///
/// `location_ids[0]` is the leaf location; within a location `lines[0]` is
/// the innermost inlined frame. Unknown locations, unknown function ids and
/// nameless functions are dropped. Only the first frame resolved from the
/// leaf location is marked `is_leaf`, so a sample whose leaf does not
/// resolve credits no flat at all.
///
/// This departs on purpose from crediting flat to every inlined line of the
/// leaf location: the functions it inlines into only gain cum, so flat
/// percentages still add up to 100.
pub fn resolve_frames<'a>(sample: &Sample, index: &CaptureIndex<'a>) -> Vec<Frame<'a>> {
    let mut frames = Vec::new();

    for (depth, location_id) in sample.location_ids.iter().enumerate() {
        let Some(location) = index.location(*location_id) else {
            continue;
        };

        let mut leaf_pending = depth == 0;
        for line in &location.lines {
            let Some(function) = index.function(line.function_id) else {
                continue;
            };
            let name = function.display_name();
            if name.is_empty() {
                continue;
            }

            frames.push(Frame {
                name,
                file: &function.filename,
                line: line.line,
                is_leaf: leaf_pending,
            });
            leaf_pending = false;
        }
    }

    frames
}

/// Merge call paths with identical stacks by summing weights
///
/// Output is sorted by weight descending, then stack ascending. Running it
/// on its own output returns the same sequence.
pub fn merge_call_paths(paths: Vec<CallPath>) -> Vec<CallPath> {
    let mut weights: HashMap<Vec<String>, i64> = HashMap::with_capacity(paths.len());
    for path in paths {
        let weight = weights.entry(path.stack).or_insert(0);
        *weight = weight.saturating_add(path.weight);
    }

    let mut merged: Vec<CallPath> = weights
        .into_iter()
        .map(|(stack, weight)| CallPath::new(stack, weight))
        .collect();

    merged.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.stack.cmp(&b.stack)));
    merged
}

/// A single collapsed stack entry
///
/// **Public** - used by flamegraph generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsedStack {
    /// Frames root first, semicolon separated
    pub stack: String,

    pub weight: i64,
}

impl CollapsedStack {
    pub fn new(stack: String, weight: i64) -> Self {
        Self { stack, weight }
    }

    /// "root;...;leaf weight"
    pub fn to_line(&self) -> String {
        format!("{} {}", self.stack, self.weight)
    }
}

/// Collapse every function's call paths into flamegraph stacks
///
/// Call paths are stored leaf first, so each is reversed. Identical stacks
/// are summed and non-positive weights dropped. Output is sorted by weight
/// descending, then stack ascending.
pub fn build_collapsed_stacks(profile: &Profile) -> Vec<CollapsedStack> {
    let mut stack_map: HashMap<String, i64> = HashMap::new();

    for function in &profile.functions {
        for path in &function.call_paths {
            if path.stack.is_empty() {
                continue;
            }
            let frames: Vec<&str> = path.stack.iter().rev().map(String::as_str).collect();
            let weight = stack_map.entry(frames.join(";")).or_insert(0);
            *weight = weight.saturating_add(path.weight);
        }
    }

    let mut stacks: Vec<CollapsedStack> = stack_map
        .into_iter()
        .filter(|(_, weight)| *weight > 0)
        .map(|(stack, weight)| CollapsedStack::new(stack, weight))
        .collect();

    stacks.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.stack.cmp(&b.stack)));

    debug!("Built {} unique collapsed stacks", stacks.len());

    stacks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::capture::{Capture, FunctionDef, Line, Location};

    fn path(stack: &[&str], weight: i64) -> CallPath {
        CallPath::new(stack.iter().map(|s| s.to_string()).collect(), weight)
    }

    fn capture() -> Capture {
        let func = |id: u64, name: &str| FunctionDef {
            id,
            name: name.to_string(),
            filename: format!("{}.go", name),
            ..Default::default()
        };
        Capture {
            functions: vec![func(1, "inner"), func(2, "outer"), func(3, "main"), func(4, "")],
            locations: vec![
                Location {
                    id: 10,
                    // inner inlined into outer
                    lines: vec![
                        Line { function_id: 1, line: 5 },
                        Line { function_id: 2, line: 12 },
                    ],
                    ..Default::default()
                },
                Location {
                    id: 11,
                    lines: vec![Line { function_id: 3, line: 40 }],
                    ..Default::default()
                },
                Location {
                    id: 12,
                    lines: vec![Line { function_id: 4, line: 1 }],
                    ..Default::default()
                },
                Location {
                    id: 13,
                    // function 42 is never declared
                    lines: vec![
                        Line { function_id: 42, line: 7 },
                        Line { function_id: 2, line: 12 },
                    ],
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_frames_inlined_leaf() {
        let capture = capture();
        let index = capture.index();
        let sample = Sample {
            location_ids: vec![10, 99, 11],
            values: vec![1],
            ..Default::default()
        };

        let frames = resolve_frames(&sample, &index);
        let names: Vec<_> = frames.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["inner", "outer", "main"]);
        assert!(frames[0].is_leaf);
        assert!(!frames[1].is_leaf);
        assert_eq!(frames[0].file, "inner.go");
        assert_eq!(frames[1].line, 12);
    }

    #[test]
    fn test_unresolved_leaf_gets_no_flat() {
        let capture = capture();
        let index = capture.index();
        let sample = Sample {
            location_ids: vec![12, 11],
            values: vec![1],
            ..Default::default()
        };

        let frames = resolve_frames(&sample, &index);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].name, "main");
        assert!(!frames[0].is_leaf);
    }

    #[test]
    fn test_unknown_function_id_is_skipped() {
        let capture = capture();
        let index = capture.index();
        let sample = Sample {
            location_ids: vec![13, 11],
            values: vec![1],
            ..Default::default()
        };

        let frames = resolve_frames(&sample, &index);
        let names: Vec<_> = frames.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["outer", "main"]);
        // The next line of the leaf location takes the leaf credit
        assert!(frames[0].is_leaf);
        assert_eq!(frames[0].line, 12);
        assert!(!frames[1].is_leaf);
    }

    #[test]
    fn test_merge_call_paths_sums_and_sorts() {
        let merged = merge_call_paths(vec![
            path(&["a", "main"], 10),
            path(&["a", "b", "main"], 30),
            path(&["a", "main"], 25),
        ]);
        assert_eq!(
            merged,
            vec![path(&["a", "main"], 35), path(&["a", "b", "main"], 30)]
        );
        assert_eq!(merge_call_paths(merged.clone()), merged);
    }

    #[test]
    fn test_collapsed_stack_to_line() {
        let stack = CollapsedStack::new("main;handler;compress".to_string(), 1200);
        assert_eq!(stack.to_line(), "main;handler;compress 1200");
    }
}
