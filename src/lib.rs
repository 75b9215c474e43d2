//! pprof-digest
//!
//! Decoding, aggregation and comparison of pprof captures.
//!
//! The library turns the binary capture format (optionally gzip-wrapped)
//! into a ranked per-function [`parser::Profile`] and compares two such
//! profiles. The `pprof-digest` binary wraps it in a small CLI.
//!
//! ## Getting Started
//!
//! ```ignore
//! use pprof_digest::pipeline::load_profile;
//! use pprof_digest::output::render_profile_markdown;
//!
//! let profile = load_profile("cpu.pprof", None)?;
//! print!("{}", render_profile_markdown(&profile, 20, false));
//! ```

pub mod aggregator;
pub mod commands;
pub mod diff;
pub mod flamegraph;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod utils;
