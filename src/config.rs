//! Pipeline configuration
//!
//! Loaded from an optional TOML file; every field has a default so a
//! partial file (or none at all) reproduces the standard ETNA cleaning run.

use crate::error::{PipelineError, Result};
use crate::family::{default_families, StrategyFamily};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Base measurements at or below this many seconds (half a millisecond) are noise
pub const DEFAULT_THRESHOLD_SECONDS: f64 = 0.0005;

/// Duration the benchmark harness records for a trial that timed out
pub const DEFAULT_TIMEOUT_SENTINEL: f64 = 60.0;

/// Configuration for cleaning and speedup normalization
///
/// # Example
/// ```
/// use etna_speedups::config::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// assert_eq!(config.threshold_seconds, 0.0005);
/// assert_eq!(config.timeout_sentinel, 60.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Base durations `<=` this value are removed along with their staged descendants
    pub threshold_seconds: f64,

    /// Exact duration value meaning "did not finish"
    pub timeout_sentinel: f64,

    /// Strategy families, each a baseline plus four ordered variant suffixes
    pub family_definitions: Vec<StrategyFamily>,

    /// Family whose baseline drives speedup normalization
    pub workload_selection: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threshold_seconds: DEFAULT_THRESHOLD_SECONDS,
            timeout_sentinel: DEFAULT_TIMEOUT_SENTINEL,
            family_definitions: default_families(),
            workload_selection: "type".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file, falling back to defaults for absent fields
    ///
    /// # Example TOML
    /// ```toml
    /// threshold_seconds = 0.001
    /// workload_selection = "bespoke"
    ///
    /// [[family_definitions]]
    /// name = "Bespoke"
    /// baseline = "baseBespoke"
    /// variants = ["", "staged", "stagedc", "stagedcsr"]
    /// ```
    pub fn from_toml<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;

        let config: Self = toml::from_str(&content).with_context(|| {
            format!("Failed to parse TOML config: {}", path.as_ref().display())
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Same configuration with a different workload selection
    pub fn with_workload(mut self, workload: impl Into<String>) -> Self {
        self.workload_selection = workload.into();
        self
    }

    /// Look up the family a workload selector names
    pub fn family(&self, workload: &str) -> Result<&StrategyFamily> {
        self.family_definitions
            .iter()
            .find(|f| f.matches_workload(workload))
            .ok_or_else(|| PipelineError::UnknownWorkload(workload.to_string()))
    }

    /// Family selected by `workload_selection`
    pub fn selected_family(&self) -> Result<&StrategyFamily> {
        self.family(&self.workload_selection)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(PipelineError::InvalidConfig(msg));

        if !self.threshold_seconds.is_finite() || self.threshold_seconds < 0.0 {
            return invalid(format!(
                "threshold_seconds must be a non-negative number, got {}",
                self.threshold_seconds
            ));
        }

        if !self.timeout_sentinel.is_finite() || self.timeout_sentinel <= 0.0 {
            return invalid(format!(
                "timeout_sentinel must be positive, got {}",
                self.timeout_sentinel
            ));
        }

        if self.family_definitions.is_empty() {
            return invalid("at least one family definition is required".to_string());
        }

        let mut baselines = HashSet::new();
        for family in &self.family_definitions {
            if family.baseline.is_empty() || family.baseline.contains('_') {
                return invalid(format!(
                    "family '{}' baseline must be non-empty and contain no '_', got '{}'",
                    family.name, family.baseline
                ));
            }

            if family.variants.len() != 4 {
                return invalid(format!(
                    "family '{}' must define exactly 4 variants, got {}",
                    family.name,
                    family.variants.len()
                ));
            }

            if !family.variants[0].is_empty() {
                return invalid(format!(
                    "family '{}' first variant must be the empty baseline suffix, got '{}'",
                    family.name, family.variants[0]
                ));
            }

            if family.variants.iter().any(|v| v.contains('_')) {
                return invalid(format!(
                    "family '{}' variant suffixes must not contain '_'",
                    family.name
                ));
            }

            if !baselines.insert(family.baseline.as_str()) {
                return invalid(format!("duplicate family baseline '{}'", family.baseline));
            }
        }

        self.selected_family()?;
        Ok(())
    }
}
