//! Strategy families and their variant ladders
//!
//! Every family has a baseline strategy (e.g. `baseType`) and an ordered
//! list of variant suffixes. The first suffix is always empty, so the first
//! strategy of a family is its baseline.

use serde::{Deserialize, Serialize};

/// Variant suffixes in escalating-optimization order
pub const DEFAULT_VARIANTS: [&str; 4] = ["", "staged", "stagedc", "stagedcsr"];

/// Ladder position of the staged variant
pub const STAGED_POSITION: usize = 1;

/// Ladder position of the staged variant with CSR, the last rung
pub const STAGED_CSR_POSITION: usize = 3;

/// One benchmark strategy family (Type-derived, Bespoke, Bespoke single-pass)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyFamily {
    /// Family name, also used as the workload selector (case-insensitive)
    pub name: String,

    /// Baseline strategy name; every other strategy is `baseline + suffix`
    pub baseline: String,

    /// Ordered variant suffixes, the empty suffix first
    #[serde(default = "default_variants")]
    pub variants: Vec<String>,
}

fn default_variants() -> Vec<String> {
    DEFAULT_VARIANTS.iter().map(|s| s.to_string()).collect()
}

impl StrategyFamily {
    /// Family with the standard `base/staged/stagedc/stagedcsr` ladder
    pub fn new(name: impl Into<String>, baseline: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            baseline: baseline.into(),
            variants: default_variants(),
        }
    }

    /// Strategy name for one variant suffix
    pub fn strategy(&self, suffix: &str) -> String {
        format!("{}{}", self.baseline, suffix)
    }

    /// All strategy names of the family, baseline first
    pub fn strategies(&self) -> impl Iterator<Item = String> + '_ {
        self.variants.iter().map(|suffix| self.strategy(suffix))
    }

    /// Strategy names of every non-baseline variant
    pub fn descendants(&self) -> impl Iterator<Item = String> + '_ {
        self.variants
            .iter()
            .filter(|suffix| !suffix.is_empty())
            .map(|suffix| self.strategy(suffix))
    }

    /// Strategy name at a ladder position, `None` past the configured variants
    pub fn strategy_at(&self, position: usize) -> Option<String> {
        self.variants.get(position).map(|suffix| self.strategy(suffix))
    }

    pub fn is_baseline(&self, strategy: &str) -> bool {
        strategy == self.baseline
    }

    /// Whether a workload selector (e.g. `bespokesingle`) names this family
    pub fn matches_workload(&self, workload: &str) -> bool {
        self.name.eq_ignore_ascii_case(workload)
    }

    /// Lowercase workload selector for this family
    pub fn workload(&self) -> String {
        self.name.to_ascii_lowercase()
    }
}

/// The three families benchmarked by the ETNA suite
pub fn default_families() -> Vec<StrategyFamily> {
    vec![
        StrategyFamily::new("Type", "baseType"),
        StrategyFamily::new("Bespoke", "baseBespoke"),
        StrategyFamily::new("BespokeSingle", "baseBespokesingle"),
    ]
}
