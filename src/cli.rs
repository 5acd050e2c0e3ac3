//! CLI argument parsing for etna-speedups

use crate::layout::{BenchSystem, DataLayout, DataSource};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for speedup summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "etna-speedups")]
#[command(version)]
#[command(about = "Clean ETNA benchmark timings and compute staged-generator speedups", long_about = None)]
pub struct Cli {
    /// Pipeline configuration file (TOML); flags override its values
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable trace-level debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Remove sub-threshold and all-timeout measurements from raw results
    Clean(CleanArgs),
    /// Compute per-seed speedups of one workload family from cleaned results
    Speedup(SpeedupArgs),
    /// Print geometric-mean speedups from speedup files
    Summary(SummaryArgs),
    /// Clean a system's results and compute every family's speedups
    Run(RunArgs),
}

/// Data-layout selection shared by the subcommands
#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    /// Evaluation data root directory
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Data source: precomputed or fresh
    #[arg(long, value_enum)]
    pub source: Option<DataSource>,

    /// Benchmark system
    #[arg(long, value_enum)]
    pub system: Option<BenchSystem>,
}

impl LayoutArgs {
    /// Layout when both source and system were given
    pub fn layout(&self) -> Option<DataLayout> {
        match (self.source, self.system) {
            (Some(source), Some(system)) => Some(DataLayout::new(&self.root, source, system)),
            _ => None,
        }
    }
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Raw result set (overrides the layout path)
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Cleaned output file (overrides the layout path)
    #[arg(long, value_name = "FILE")]
    pub cleaned: Option<PathBuf>,

    /// Removed-entries output file (overrides the layout path)
    #[arg(long, value_name = "FILE")]
    pub removed: Option<PathBuf>,

    /// Minimum baseline duration in seconds (default: 0.0005)
    #[arg(long, value_name = "SECONDS")]
    pub threshold_seconds: Option<f64>,

    /// Duration that marks a timed-out trial (default: 60.0)
    #[arg(long, value_name = "SECONDS")]
    pub timeout_sentinel: Option<f64>,
}

#[derive(Args, Debug)]
pub struct SpeedupArgs {
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Workload family: type, bespoke or bespokesingle (default: from config)
    #[arg(short, long)]
    pub workload: Option<String>,

    /// Cleaned result set (overrides the layout path)
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Speedup output file (overrides the layout path)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Evaluation data root directory
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Data source whose speedup directory is summarized
    #[arg(long, value_enum)]
    pub source: Option<DataSource>,

    /// Speedup files to pool into one summary (instead of the benchmark catalog)
    #[arg(long = "input", value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Workload family of the --input files (default: from config)
    #[arg(short, long)]
    pub workload: Option<String>,

    /// Title for the pooled --input summary
    #[arg(long)]
    pub title: Option<String>,

    /// Include box-plot distribution statistics
    #[arg(long)]
    pub distribution: bool,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Evaluation data root directory
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Data source: precomputed or fresh
    #[arg(long, value_enum)]
    pub source: DataSource,

    /// Benchmark system
    #[arg(long, value_enum)]
    pub system: BenchSystem,

    /// Minimum baseline duration in seconds (default: 0.0005)
    #[arg(long, value_name = "SECONDS")]
    pub threshold_seconds: Option<f64>,

    /// Duration that marks a timed-out trial (default: 60.0)
    #[arg(long, value_name = "SECONDS")]
    pub timeout_sentinel: Option<f64>,
}
