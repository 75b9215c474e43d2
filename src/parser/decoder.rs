//! Binary capture decoder.
//!
//! Turns the bytes of a pprof capture (gzip-wrapped or raw) into a
//! [`Capture`]. Decoding is best effort: unknown fields are skipped and a
//! truncated message simply ends early, so a damaged capture still yields
//! whatever could be read. The only fatal condition is a gzip envelope whose
//! body cannot be inflated.

use super::capture::{Capture, FunctionDef, Label, Line, Location, Mapping, Sample, ValueType};
use super::wire::{FieldValue, WireReader};
use crate::utils::config::GZIP_MAGIC;
use crate::utils::error::DecodeError;
use flate2::read::MultiGzDecoder;
use log::debug;
use std::io::Read;

// Field numbers of the top-level Profile message
const PROFILE_SAMPLE_TYPE: u64 = 1;
const PROFILE_SAMPLE: u64 = 2;
const PROFILE_MAPPING: u64 = 3;
const PROFILE_LOCATION: u64 = 4;
const PROFILE_FUNCTION: u64 = 5;
const PROFILE_STRING_TABLE: u64 = 6;
const PROFILE_DROP_FRAMES: u64 = 7;
const PROFILE_KEEP_FRAMES: u64 = 8;
const PROFILE_TIME_NANOS: u64 = 9;
const PROFILE_DURATION_NANOS: u64 = 10;
const PROFILE_PERIOD_TYPE: u64 = 11;
const PROFILE_PERIOD: u64 = 12;
const PROFILE_COMMENT: u64 = 13;
const PROFILE_DEFAULT_SAMPLE_TYPE: u64 = 14;

/// Decode a capture, inflating it first when it carries a gzip header
///
/// **Public** - main entry point for decoding
///
/// # Errors
/// * `DecodeError::Gzip` - the gzip header is present but the body is corrupt
pub fn decode(bytes: &[u8]) -> Result<Capture, DecodeError> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut inflated = Vec::with_capacity(bytes.len() * 4);
        MultiGzDecoder::new(bytes)
            .read_to_end(&mut inflated)
            .map_err(DecodeError::Gzip)?;
        debug!(
            "Inflated gzip capture: {} -> {} bytes",
            bytes.len(),
            inflated.len()
        );
        Ok(decode_raw(&inflated))
    } else {
        debug!("No gzip header, decoding {} bytes as raw wire format", bytes.len());
        Ok(decode_raw(bytes))
    }
}

/// Decode an uncompressed capture
///
/// Never fails; an unreadable buffer produces an empty capture.
pub fn decode_raw(bytes: &[u8]) -> Capture {
    let raw = RawProfile::parse(bytes);
    let capture = raw.resolve();

    debug!(
        "Decoded capture: {} sample types, {} samples, {} locations, {} functions, {} strings",
        capture.sample_types.len(),
        capture.samples.len(),
        capture.locations.len(),
        capture.functions.len(),
        capture.string_table.len()
    );

    capture
}

/// Top-level message with string fields still as table indices
#[derive(Debug, Default)]
struct RawProfile {
    sample_types: Vec<RawValueType>,
    samples: Vec<RawSample>,
    mappings: Vec<RawMapping>,
    locations: Vec<Location>,
    functions: Vec<RawFunction>,
    strings: Vec<String>,
    drop_frames: i64,
    keep_frames: i64,
    time_nanos: i64,
    duration_nanos: i64,
    period_type: Option<RawValueType>,
    period: i64,
    comments: Vec<u64>,
    default_sample_type: i64,
}

#[derive(Debug, Default, Clone, Copy)]
struct RawValueType {
    type_idx: i64,
    unit_idx: i64,
}

#[derive(Debug, Default)]
struct RawSample {
    location_ids: Vec<u64>,
    values: Vec<u64>,
    labels: Vec<RawLabel>,
}

#[derive(Debug, Default)]
struct RawLabel {
    key: i64,
    str_idx: i64,
    num: i64,
    num_unit: i64,
}

#[derive(Debug, Default)]
struct RawMapping {
    id: u64,
    memory_start: u64,
    memory_limit: u64,
    file_offset: u64,
    filename: i64,
    build_id: i64,
    has_functions: bool,
    has_filenames: bool,
    has_line_numbers: bool,
    has_inline_frames: bool,
}

#[derive(Debug, Default)]
struct RawFunction {
    id: u64,
    name: i64,
    system_name: i64,
    filename: i64,
    start_line: i64,
}

/// Overwrite `slot` when the field carried a usable value
fn assign<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

impl RawProfile {
    fn parse(bytes: &[u8]) -> Self {
        let mut prof = RawProfile::default();

        for field in WireReader::new(bytes) {
            let value = field.value;
            match field.number {
                PROFILE_SAMPLE_TYPE => {
                    if let Some(b) = value.as_bytes() {
                        prof.sample_types.push(RawValueType::parse(b));
                    }
                }
                PROFILE_SAMPLE => {
                    if let Some(b) = value.as_bytes() {
                        prof.samples.push(RawSample::parse(b));
                    }
                }
                PROFILE_MAPPING => {
                    if let Some(b) = value.as_bytes() {
                        prof.mappings.push(RawMapping::parse(b));
                    }
                }
                PROFILE_LOCATION => {
                    if let Some(b) = value.as_bytes() {
                        prof.locations.push(parse_location(b));
                    }
                }
                PROFILE_FUNCTION => {
                    if let Some(b) = value.as_bytes() {
                        prof.functions.push(RawFunction::parse(b));
                    }
                }
                PROFILE_STRING_TABLE => {
                    if let Some(b) = value.as_bytes() {
                        prof.strings.push(String::from_utf8_lossy(b).into_owned());
                    }
                }
                PROFILE_DROP_FRAMES => assign(&mut prof.drop_frames, value.as_i64()),
                PROFILE_KEEP_FRAMES => assign(&mut prof.keep_frames, value.as_i64()),
                PROFILE_TIME_NANOS => assign(&mut prof.time_nanos, value.as_i64()),
                PROFILE_DURATION_NANOS => assign(&mut prof.duration_nanos, value.as_i64()),
                PROFILE_PERIOD_TYPE => {
                    if let Some(b) = value.as_bytes() {
                        prof.period_type = Some(RawValueType::parse(b));
                    }
                }
                PROFILE_PERIOD => assign(&mut prof.period, value.as_i64()),
                PROFILE_COMMENT => value.extend_repeated(&mut prof.comments),
                PROFILE_DEFAULT_SAMPLE_TYPE => {
                    assign(&mut prof.default_sample_type, value.as_i64())
                }
                _ => {} // unknown field, already consumed
            }
        }

        prof
    }

    /// Replace string indices with the strings themselves
    fn resolve(mut self) -> Capture {
        if self.strings.is_empty() {
            self.strings.push(String::new());
        } else if !self.strings[0].is_empty() {
            debug!("String table entry 0 is not empty, clearing it");
            self.strings[0].clear();
        }

        let strings = &self.strings;
        let value_type = |vt: &RawValueType| ValueType {
            type_name: lookup(strings, vt.type_idx),
            unit: lookup(strings, vt.unit_idx),
        };

        Capture {
            sample_types: self.sample_types.iter().map(value_type).collect(),
            samples: self
                .samples
                .into_iter()
                .map(|s| Sample {
                    location_ids: s.location_ids,
                    values: s.values.into_iter().map(|v| v as i64).collect(),
                    labels: s
                        .labels
                        .iter()
                        .map(|l| Label {
                            key: lookup(strings, l.key),
                            str_value: optional_lookup(strings, l.str_idx),
                            num: l.num,
                            num_unit: optional_lookup(strings, l.num_unit),
                        })
                        .collect(),
                })
                .collect(),
            mappings: self
                .mappings
                .iter()
                .map(|m| Mapping {
                    id: m.id,
                    memory_start: m.memory_start,
                    memory_limit: m.memory_limit,
                    file_offset: m.file_offset,
                    filename: lookup(strings, m.filename),
                    build_id: lookup(strings, m.build_id),
                    has_functions: m.has_functions,
                    has_filenames: m.has_filenames,
                    has_line_numbers: m.has_line_numbers,
                    has_inline_frames: m.has_inline_frames,
                })
                .collect(),
            locations: self.locations,
            functions: self
                .functions
                .iter()
                .map(|f| FunctionDef {
                    id: f.id,
                    name: lookup(strings, f.name),
                    system_name: lookup(strings, f.system_name),
                    filename: lookup(strings, f.filename),
                    start_line: f.start_line,
                })
                .collect(),
            drop_frames: lookup(strings, self.drop_frames),
            keep_frames: lookup(strings, self.keep_frames),
            time_nanos: self.time_nanos,
            duration_nanos: self.duration_nanos,
            period_type: self.period_type.as_ref().map(value_type),
            period: self.period,
            comments: self
                .comments
                .iter()
                .map(|&idx| lookup(strings, idx as i64))
                .collect(),
            default_sample_type: lookup(strings, self.default_sample_type),
            string_table: self.strings,
        }
    }
}

impl RawValueType {
    fn parse(bytes: &[u8]) -> Self {
        let mut vt = RawValueType::default();
        for field in WireReader::new(bytes) {
            match field.number {
                1 => assign(&mut vt.type_idx, field.value.as_i64()),
                2 => assign(&mut vt.unit_idx, field.value.as_i64()),
                _ => {}
            }
        }
        vt
    }
}

impl RawSample {
    fn parse(bytes: &[u8]) -> Self {
        let mut sample = RawSample::default();
        for field in WireReader::new(bytes) {
            match field.number {
                1 => field.value.extend_repeated(&mut sample.location_ids),
                2 => field.value.extend_repeated(&mut sample.values),
                3 => {
                    if let FieldValue::Bytes(b) = field.value {
                        sample.labels.push(RawLabel::parse(b));
                    }
                }
                _ => {}
            }
        }
        sample
    }
}

impl RawLabel {
    fn parse(bytes: &[u8]) -> Self {
        let mut label = RawLabel::default();
        for field in WireReader::new(bytes) {
            match field.number {
                1 => assign(&mut label.key, field.value.as_i64()),
                2 => assign(&mut label.str_idx, field.value.as_i64()),
                3 => assign(&mut label.num, field.value.as_i64()),
                4 => assign(&mut label.num_unit, field.value.as_i64()),
                _ => {}
            }
        }
        label
    }
}

impl RawMapping {
    fn parse(bytes: &[u8]) -> Self {
        let mut m = RawMapping::default();
        for field in WireReader::new(bytes) {
            let v = field.value;
            match field.number {
                1 => assign(&mut m.id, v.as_u64()),
                2 => assign(&mut m.memory_start, v.as_u64()),
                3 => assign(&mut m.memory_limit, v.as_u64()),
                4 => assign(&mut m.file_offset, v.as_u64()),
                5 => assign(&mut m.filename, v.as_i64()),
                6 => assign(&mut m.build_id, v.as_i64()),
                7 => assign(&mut m.has_functions, v.as_bool()),
                8 => assign(&mut m.has_filenames, v.as_bool()),
                9 => assign(&mut m.has_line_numbers, v.as_bool()),
                10 => assign(&mut m.has_inline_frames, v.as_bool()),
                _ => {}
            }
        }
        m
    }
}

impl RawFunction {
    fn parse(bytes: &[u8]) -> Self {
        let mut f = RawFunction::default();
        for field in WireReader::new(bytes) {
            let v = field.value;
            match field.number {
                1 => assign(&mut f.id, v.as_u64()),
                2 => assign(&mut f.name, v.as_i64()),
                3 => assign(&mut f.system_name, v.as_i64()),
                4 => assign(&mut f.filename, v.as_i64()),
                5 => assign(&mut f.start_line, v.as_i64()),
                _ => {}
            }
        }
        f
    }
}

fn parse_location(bytes: &[u8]) -> Location {
    let mut loc = Location::default();
    for field in WireReader::new(bytes) {
        let v = field.value;
        match field.number {
            1 => assign(&mut loc.id, v.as_u64()),
            2 => assign(&mut loc.mapping_id, v.as_u64()),
            3 => assign(&mut loc.address, v.as_u64()),
            4 => {
                if let Some(b) = v.as_bytes() {
                    loc.lines.push(parse_line(b));
                }
            }
            5 => assign(&mut loc.is_folded, v.as_bool()),
            _ => {}
        }
    }
    loc
}

fn parse_line(bytes: &[u8]) -> Line {
    let mut line = Line::default();
    for field in WireReader::new(bytes) {
        match field.number {
            1 => assign(&mut line.function_id, field.value.as_u64()),
            2 => assign(&mut line.line, field.value.as_i64()),
            _ => {}
        }
    }
    line
}

/// String at `idx`, or empty when the index is out of range
fn lookup(strings: &[String], idx: i64) -> String {
    usize::try_from(idx)
        .ok()
        .and_then(|i| strings.get(i))
        .cloned()
        .unwrap_or_default()
}

fn optional_lookup(strings: &[String], idx: i64) -> Option<String> {
    if idx == 0 {
        None
    } else {
        Some(lookup(strings, idx))
    }
}
