//! Capture decoding, classification and schema definitions.
//!
//! This module handles:
//! - Reading the binary wire format (optionally gzip-wrapped)
//! - Resolving it into a generic `Capture`
//! - Deciding which category of profile the capture holds
//! - Defining the aggregated `Profile` schema

pub mod capture;
pub mod classify;
pub mod decoder;
pub mod schema;
pub mod wire;

// Re-export main types
pub use capture::{Capture, FunctionDef, Label, Line, Location, Mapping, Sample, ValueType};
pub use classify::{classify, classify_with_rule, ClassificationRule};
pub use decoder::{decode, decode_raw};
pub use schema::{CallPath, Category, Function, Profile, Stats};
