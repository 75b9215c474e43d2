//! Test-only builder that encodes pprof captures in the binary wire format.

#![allow(dead_code)]

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

fn put_varint(buf: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buf.push((value as u8) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

fn put_tag(buf: &mut Vec<u8>, field: u64, wire_type: u64) {
    put_varint(buf, (field << 3) | wire_type);
}

fn put_uint(buf: &mut Vec<u8>, field: u64, value: u64) {
    put_tag(buf, field, 0);
    put_varint(buf, value);
}

fn put_bytes(buf: &mut Vec<u8>, field: u64, bytes: &[u8]) {
    put_tag(buf, field, 2);
    put_varint(buf, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

fn put_repeated(buf: &mut Vec<u8>, field: u64, values: &[u64], packed: bool) {
    if packed {
        let mut body = Vec::new();
        for v in values {
            put_varint(&mut body, *v);
        }
        put_bytes(buf, field, &body);
    } else {
        for v in values {
            put_uint(buf, field, *v);
        }
    }
}

struct PendingSample {
    locations: Vec<u64>,
    values: Vec<i64>,
}

/// Builds a capture message, interning strings as it goes
pub struct CaptureBuilder {
    strings: Vec<String>,
    sample_types: Vec<(u64, u64)>,
    period_type: Option<(u64, u64)>,
    period: i64,
    duration_nanos: i64,
    functions: Vec<(u64, u64, u64)>,
    locations: Vec<(u64, Vec<(u64, i64)>)>,
    samples: Vec<PendingSample>,
    packed: bool,
}

impl Default for CaptureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureBuilder {
    pub fn new() -> Self {
        Self {
            strings: vec![String::new()],
            sample_types: Vec::new(),
            period_type: None,
            period: 0,
            duration_nanos: 0,
            functions: Vec::new(),
            locations: Vec::new(),
            samples: Vec::new(),
            packed: true,
        }
    }

    fn intern(&mut self, s: &str) -> u64 {
        if let Some(pos) = self.strings.iter().position(|existing| existing == s) {
            return pos as u64;
        }
        self.strings.push(s.to_string());
        (self.strings.len() - 1) as u64
    }

    pub fn sample_type(mut self, type_name: &str, unit: &str) -> Self {
        let pair = (self.intern(type_name), self.intern(unit));
        self.sample_types.push(pair);
        self
    }

    pub fn period(mut self, type_name: &str, unit: &str, period: i64) -> Self {
        self.period_type = Some((self.intern(type_name), self.intern(unit)));
        self.period = period;
        self
    }

    pub fn duration_nanos(mut self, nanos: i64) -> Self {
        self.duration_nanos = nanos;
        self
    }

    /// Declare function `id` and a location of the same id holding only it
    pub fn function(mut self, id: u64, name: &str, file: &str) -> Self {
        let entry = (id, self.intern(name), self.intern(file));
        self.functions.push(entry);
        self.locations.push((id, vec![(id, id as i64 * 10)]));
        self
    }

    /// Declare a location whose lines are the given (function id, line) pairs
    pub fn inlined_location(mut self, id: u64, lines: &[(u64, i64)]) -> Self {
        self.locations.push((id, lines.to_vec()));
        self
    }

    /// Add a sample; `locations` is leaf first
    pub fn sample(mut self, locations: &[u64], values: &[i64]) -> Self {
        self.samples.push(PendingSample {
            locations: locations.to_vec(),
            values: values.to_vec(),
        });
        self
    }

    pub fn unpacked(mut self) -> Self {
        self.packed = false;
        self
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();

        for (ty, unit) in &self.sample_types {
            let mut vt = Vec::new();
            put_uint(&mut vt, 1, *ty);
            put_uint(&mut vt, 2, *unit);
            put_bytes(&mut out, 1, &vt);
        }

        for sample in &self.samples {
            let mut s = Vec::new();
            put_repeated(&mut s, 1, &sample.locations, self.packed);
            let values: Vec<u64> = sample.values.iter().map(|v| *v as u64).collect();
            put_repeated(&mut s, 2, &values, self.packed);
            put_bytes(&mut out, 2, &s);
        }

        for (id, lines) in &self.locations {
            let mut loc = Vec::new();
            put_uint(&mut loc, 1, *id);
            for (function_id, line) in lines {
                let mut l = Vec::new();
                put_uint(&mut l, 1, *function_id);
                put_uint(&mut l, 2, *line as u64);
                put_bytes(&mut loc, 4, &l);
            }
            put_bytes(&mut out, 4, &loc);
        }

        for (id, name, file) in &self.functions {
            let mut f = Vec::new();
            put_uint(&mut f, 1, *id);
            put_uint(&mut f, 2, *name);
            put_uint(&mut f, 4, *file);
            put_bytes(&mut out, 5, &f);
        }

        for s in &self.strings {
            put_bytes(&mut out, 6, s.as_bytes());
        }

        if self.duration_nanos != 0 {
            put_uint(&mut out, 10, self.duration_nanos as u64);
        }
        if let Some((ty, unit)) = self.period_type {
            let mut vt = Vec::new();
            put_uint(&mut vt, 1, ty);
            put_uint(&mut vt, 2, unit);
            put_bytes(&mut out, 11, &vt);
        }
        if self.period != 0 {
            put_uint(&mut out, 12, self.period as u64);
        }

        out
    }

    pub fn encode_gzip(&self) -> Vec<u8> {
        gzip(&self.encode())
    }
}

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

/// A Go-style CPU capture: main -> handler -> {compress, hash}
pub fn cpu_capture() -> CaptureBuilder {
    CaptureBuilder::new()
        .sample_type("samples", "count")
        .sample_type("cpu", "nanoseconds")
        .period("cpu", "nanoseconds", 10_000_000)
        .duration_nanos(30_000_000_000)
        .function(1, "main.compress", "compress.go")
        .function(2, "main.handler", "server.go")
        .function(3, "main.main", "main.go")
        .function(4, "main.hash", "hash.go")
        .sample(&[1, 2, 3], &[6, 60_000_000])
        .sample(&[4, 2, 3], &[3, 30_000_000])
        .sample(&[2, 3], &[1, 10_000_000])
}

/// A Go-style heap capture with a single allocation site
pub fn heap_capture() -> CaptureBuilder {
    CaptureBuilder::new()
        .sample_type("alloc_objects", "count")
        .sample_type("alloc_space", "bytes")
        .sample_type("inuse_objects", "count")
        .sample_type("inuse_space", "bytes")
        .function(1, "bytes.growSlice", "buffer.go")
        .function(2, "main.main", "main.go")
        .sample(&[1, 2], &[1000, 80_000, 10, 800])
}
