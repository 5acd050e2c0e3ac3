//! On-disk layout of ETNA evaluation data
//!
//! ```text
//! {root}/parsed_4.2_data/{source}/parsed/{system}_results.json
//! {root}/parsed_4.2_data/{source}/cleaned/{system}_results_cleaned.json
//! {root}/parsed_4.2_data/{source}/cleaned/{system}_results_removed.json
//! {root}/parsed_4.2_data/{source}/speedups/{system}_{workload}.json
//! ```

use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};

const DATA_DIR: &str = "parsed_4.2_data";

/// Which copy of the evaluation data to process
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DataSource {
    /// Results shipped with the artifact
    Precomputed,
    /// Results from a local re-run of the benchmarks
    Fresh,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Precomputed => write!(f, "precomputed"),
            DataSource::Fresh => write!(f, "fresh"),
        }
    }
}

/// Benchmark system under mutation testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BenchSystem {
    /// Binary search trees
    Bst,
    /// Simply-typed lambda calculus
    Stlc,
}

impl BenchSystem {
    /// Lowercase file-name prefix
    pub fn file_prefix(&self) -> &'static str {
        match self {
            BenchSystem::Bst => "bst",
            BenchSystem::Stlc => "stlc",
        }
    }
}

impl fmt::Display for BenchSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchSystem::Bst => write!(f, "BST"),
            BenchSystem::Stlc => write!(f, "STLC"),
        }
    }
}

/// Path conventions for one (source, system) pair
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
    source: DataSource,
    system: BenchSystem,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>, source: DataSource, system: BenchSystem) -> Self {
        Self {
            root: root.into(),
            source,
            system,
        }
    }

    pub fn system(&self) -> BenchSystem {
        self.system
    }

    fn stage_dir(&self, stage: &str) -> PathBuf {
        source_dir(&self.root, self.source).join(stage)
    }

    pub fn parsed_results(&self) -> PathBuf {
        self.stage_dir("parsed")
            .join(format!("{}_results.json", self.system.file_prefix()))
    }

    pub fn cleaned_results(&self) -> PathBuf {
        self.stage_dir("cleaned")
            .join(format!("{}_results_cleaned.json", self.system.file_prefix()))
    }

    pub fn removed_results(&self) -> PathBuf {
        self.stage_dir("cleaned")
            .join(format!("{}_results_removed.json", self.system.file_prefix()))
    }

    pub fn speedups(&self, workload: &str) -> PathBuf {
        speedup_file(&self.root, self.source, &format!("{}_{}", self.system.file_prefix(), workload))
    }
}

/// `{root}/parsed_4.2_data/{source}`
pub fn source_dir(root: &Path, source: DataSource) -> PathBuf {
    root.join(DATA_DIR).join(source.to_string())
}

/// Speedup file for a `{system}_{workload}` stem
pub fn speedup_file(root: &Path, source: DataSource, stem: &str) -> PathBuf {
    source_dir(root, source)
        .join("speedups")
        .join(format!("{}.json", stem))
}
