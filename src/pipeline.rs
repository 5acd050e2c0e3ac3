//! File-level pipeline steps
//!
//! Each step loads one JSON document, runs a pure transform over it and
//! writes the results. These are the only places the pipeline touches disk.

use crate::clean::{clean_results, CleanReport};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::family::StrategyFamily;
use crate::layout::DataLayout;
use crate::results::{load_result_set, store_json};
use crate::speedup::{compute_speedups, SpeedupSet};
use std::path::{Path, PathBuf};

/// Input and output files of a cleaning run
#[derive(Debug, Clone)]
pub struct CleanPaths {
    pub input: PathBuf,
    pub cleaned: PathBuf,
    pub removed: PathBuf,
}

impl CleanPaths {
    pub fn from_layout(layout: &DataLayout) -> Self {
        Self {
            input: layout.parsed_results(),
            cleaned: layout.cleaned_results(),
            removed: layout.removed_results(),
        }
    }
}

/// Clean a raw result file, writing the cleaned set and the removed-entries audit
pub fn clean_file(paths: &CleanPaths, config: &PipelineConfig) -> Result<CleanReport> {
    tracing::info!("Cleaning results from {}", paths.input.display());
    let raw = load_result_set(&paths.input)?;

    let outcome = clean_results(&raw, config);

    store_json(&paths.cleaned, &outcome.cleaned)?;
    store_json(&paths.removed, &outcome.removed)?;
    tracing::info!(
        "Wrote {} and {}",
        paths.cleaned.display(),
        paths.removed.display()
    );

    Ok(outcome.report)
}

/// Compute one family's speedups from a cleaned result file
pub fn speedup_file(input: &Path, output: &Path, family: &StrategyFamily) -> Result<SpeedupSet> {
    tracing::info!(
        "Computing {} speedups from {}",
        family.workload(),
        input.display()
    );
    let cleaned = load_result_set(input)?;

    let speedups = compute_speedups(&cleaned, family)?;

    store_json(output, &speedups)?;
    tracing::info!("Speedup results saved to {}", output.display());
    Ok(speedups)
}

/// Outcome of a full run over one benchmark system
#[derive(Debug, Clone)]
pub struct RunReport {
    pub clean: CleanReport,
    pub speedup_files: Vec<PathBuf>,
}

/// Clean a system's raw results, then compute every configured family's speedups
pub fn run_layout(layout: &DataLayout, config: &PipelineConfig) -> Result<RunReport> {
    let paths = CleanPaths::from_layout(layout);
    let clean = clean_file(&paths, config)?;

    let mut speedup_files = Vec::new();
    for family in &config.family_definitions {
        let output = layout.speedups(&family.workload());
        speedup_file(&paths.cleaned, &output, family)?;
        speedup_files.push(output);
    }

    Ok(RunReport {
        clean,
        speedup_files,
    })
}
