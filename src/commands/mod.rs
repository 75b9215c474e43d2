//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod analyze;
pub mod diff;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use analyze::{execute_analyze, validate_analyze_args};
pub use diff::execute_diff;
pub use models::{AnalyzeArgs, DiffArgs, OutputFormat};
pub use utils::{display_version, load_input};
