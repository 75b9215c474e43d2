//! Flamegraph generation using the inferno library.
//!
//! This module converts a profile's call paths into collapsed stacks and
//! renders them as an interactive SVG, plus a compact terminal summary of
//! the hottest stacks.

pub mod generator;

// Re-export main types
pub use generator::{generate_flamegraph, generate_text_summary, FlamegraphConfig};
