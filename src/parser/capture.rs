//! Generic capture record produced by the binary decoder.
//!
//! A flat description of one profiling snapshot with every string index
//! already resolved. It carries no profiling semantics; the classifier and
//! aggregator decide what the values mean.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A (type, unit) pair naming one metric of every sample
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueType {
    pub type_name: String,
    pub unit: String,
}

impl ValueType {
    pub fn new(type_name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            unit: unit.into(),
        }
    }

    /// `type/unit`, as shown in diagnostics
    pub fn describe(&self) -> String {
        format!("{}/{}", self.type_name, self.unit)
    }
}

/// One weighted call stack
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Location ids, leaf (innermost frame) first
    pub location_ids: Vec<u64>,

    /// One value per declared sample type, in declaration order
    pub values: Vec<i64>,

    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub key: String,
    pub str_value: Option<String>,
    pub num: i64,
    pub num_unit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub id: u64,
    pub memory_start: u64,
    pub memory_limit: u64,
    pub file_offset: u64,
    pub filename: String,
    pub build_id: String,
    pub has_functions: bool,
    pub has_filenames: bool,
    pub has_line_numbers: bool,
    pub has_inline_frames: bool,
}

/// A program location; several lines means inlined frames
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: u64,
    pub mapping_id: u64,
    pub address: u64,

    /// Innermost inlined frame first
    pub lines: Vec<Line>,

    pub is_folded: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub function_id: u64,
    pub line: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub id: u64,
    pub name: String,
    pub system_name: String,
    pub filename: String,
    pub start_line: i64,
}

impl FunctionDef {
    /// Human-readable name, falling back to the linker name
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.system_name
        } else {
            &self.name
        }
    }
}

/// Decoded capture
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    pub sample_types: Vec<ValueType>,
    pub samples: Vec<Sample>,
    pub mappings: Vec<Mapping>,
    pub locations: Vec<Location>,
    pub functions: Vec<FunctionDef>,

    /// Index 0 is always the empty string
    pub string_table: Vec<String>,

    pub drop_frames: String,
    pub keep_frames: String,
    pub time_nanos: i64,
    pub duration_nanos: i64,
    pub period_type: Option<ValueType>,
    pub period: i64,
    pub comments: Vec<String>,
    pub default_sample_type: String,
}

impl Capture {
    /// True when the decoder found nothing worth aggregating
    pub fn is_empty(&self) -> bool {
        self.sample_types.is_empty() && self.samples.is_empty()
    }

    /// Declared sample types as `type/unit` strings
    pub fn describe_sample_types(&self) -> Vec<String> {
        self.sample_types.iter().map(ValueType::describe).collect()
    }

    pub fn location(&self, id: u64) -> Option<&Location> {
        self.locations.iter().find(|loc| loc.id == id)
    }

    /// Function with the given id; id 0 never resolves
    pub fn function(&self, id: u64) -> Option<&FunctionDef> {
        if id == 0 {
            return None;
        }
        self.functions.iter().find(|f| f.id == id)
    }

    /// Id-indexed views for repeated lookups during aggregation
    pub fn index(&self) -> CaptureIndex<'_> {
        CaptureIndex {
            locations: self.locations.iter().map(|l| (l.id, l)).collect(),
            functions: self
                .functions
                .iter()
                .filter(|f| f.id != 0)
                .map(|f| (f.id, f))
                .collect(),
        }
    }
}

/// Borrowed lookup tables over a `Capture`
pub struct CaptureIndex<'a> {
    locations: HashMap<u64, &'a Location>,
    functions: HashMap<u64, &'a FunctionDef>,
}

impl<'a> CaptureIndex<'a> {
    pub fn location(&self, id: u64) -> Option<&'a Location> {
        self.locations.get(&id).copied()
    }

    pub fn function(&self, id: u64) -> Option<&'a FunctionDef> {
        self.functions.get(&id).copied()
    }
}
