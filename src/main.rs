//! pprof-digest CLI
//!
//! Turns pprof captures (CPU, heap, goroutine, mutex) into ranked markdown
//! or JSON reports, and compares two captures function by function.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use pprof_digest::commands::{
    display_version, execute_analyze, execute_diff, validate_analyze_args, AnalyzeArgs, DiffArgs,
    OutputFormat,
};
use pprof_digest::parser::schema::Category;

/// pprof-digest - readable reports from pprof captures
#[derive(Parser, Debug)]
#[command(name = "pprof-digest")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a capture and write a ranked report
    #[command(visible_alias = "show")]
    Analyze {
        /// Capture file (raw or gzip-wrapped), or a saved JSON report
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of top functions to display
        #[arg(short = 'n', long = "top", default_value_t = 20)]
        top: usize,

        /// Profile type (cpu, heap, goroutine, mutex); auto-detected if omitted
        #[arg(short = 't', long = "type")]
        profile_type: Option<Category>,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,

        /// Leave out the analysis guidance section
        #[arg(long)]
        no_guidance: bool,

        /// Output path for SVG flamegraph (optional)
        #[arg(long)]
        flamegraph: Option<PathBuf>,

        /// Flamegraph title
        #[arg(long, requires = "flamegraph")]
        title: Option<String>,

        /// Flamegraph width in pixels
        #[arg(long, default_value_t = 1200)]
        width: usize,

        /// Print the hottest stacks to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Compare two captures
    Diff {
        /// Base capture or JSON report
        base: PathBuf,

        /// New capture or JSON report
        new: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of top changed functions to display
        #[arg(short = 'n', long = "top", default_value_t = 20)]
        top: usize,

        /// Base profile type (auto-detected if omitted)
        #[arg(short = 'b', long)]
        base_type: Option<Category>,

        /// New profile type (auto-detected if omitted)
        #[arg(short = 't', long)]
        new_type: Option<Category>,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,

        /// Leave out the analysis guidance section
        #[arg(long)]
        no_guidance: bool,

        /// Print a coloured summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging; stdout carries reports, so logs go to stderr
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Analyze {
            input,
            output,
            top,
            profile_type,
            format,
            no_guidance,
            flamegraph,
            title,
            width,
            summary,
        } => {
            let args = AnalyzeArgs {
                input,
                output,
                format,
                top_n: top,
                include_guidance: !no_guidance,
                category_override: profile_type,
                flamegraph,
                flamegraph_title: title,
                flamegraph_width: width,
                print_summary: summary,
            };

            // Validate args first
            validate_analyze_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Diff {
            base,
            new,
            output,
            top,
            base_type,
            new_type,
            format,
            no_guidance,
            summary,
        } => {
            execute_diff(DiffArgs {
                base,
                new,
                base_type,
                new_type,
                output,
                format,
                top_n: top,
                include_guidance: !no_guidance,
                summary,
            })?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
