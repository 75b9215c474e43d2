//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use crate::parser::schema::Category;
use thiserror::Error;

/// Errors that can occur while decoding a binary capture
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Capture has a gzip header but could not be decompressed: {0}")]
    Gzip(#[source] std::io::Error),
}

/// Errors that can occur while classifying a capture
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("Unknown profile category (declared sample types: [{}])", .0.join(", "))]
    UnknownCategory(Vec<String>),
}

/// Errors that can occur while aggregating samples
///
/// These are recovered per sample: the aggregator logs and skips the sample.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AggregateError {
    #[error("Sample {index} has {actual} values, {category} profiles need at least {required}")]
    MalformedSample {
        index: usize,
        category: Category,
        required: usize,
        actual: usize,
    },
}

/// Errors that can occur while comparing two profiles
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DiffError {
    #[error("Profile categories do not match: base is {base}, new is {new}")]
    CategoryMismatch { base: Category, new: Category },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur during flamegraph generation
///
/// Rendering happens in memory; writing the SVG is reported as `OutputError`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FlamegraphError {
    #[error("Empty stack data")]
    EmptyStacks,

    #[error("Failed to render flamegraph: {0}")]
    RenderFailed(String),
}

/// Errors surfaced by the decode → classify → aggregate pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to read capture: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error(transparent)]
    Output(#[from] OutputError),
}
