//! Error taxonomy for the cleaning and speedup pipeline
//!
//! Malformed keys are recoverable (callers log and skip them). Integrity
//! violations and missing inputs abort the run.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading, cleaning or normalizing result sets
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Malformed measurement key '{key}': {reason}")]
    MalformedKey { key: String, reason: &'static str },

    #[error(
        "Incorrect base speedup {ratio} for {baseline} seed {seed} in {mutant} -> {property}"
    )]
    IntegrityViolation {
        baseline: String,
        seed: String,
        mutant: String,
        property: String,
        ratio: f64,
    },

    #[error("Input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Unknown workload '{0}'")]
    UnknownWorkload(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Recoverable errors are logged and skipped; everything else aborts the run
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PipelineError::MalformedKey { .. })
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
