//! Aggregate speedup summaries
//!
//! Flattens every (mutant, property, seed) ratio of one strategy into a
//! single sequence and reduces it to a geometric mean, the number reported
//! per benchmark in the speedup bar chart.

use crate::family::{StrategyFamily, STAGED_CSR_POSITION, STAGED_POSITION};
use crate::speedup::SpeedupSet;
use serde::Serialize;

/// Reported when there is nothing to average; check for emptiness first
pub const EMPTY_GEOMEAN: f64 = 0.0;

/// Display label of the `staged` variant
pub const STAGED_LABEL: &str = "AllegrOCaml";

/// Display label of the `stagedcsr` variant
pub const STAGED_CSR_LABEL: &str = "AllegrOCaml + CSM";

/// A speedup file the report knows how to title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkEntry {
    /// Speedup file stem, `{system}_{workload}`
    pub stem: &'static str,
    pub title: &'static str,
    pub workload: &'static str,
}

/// Benchmarks shown in the speedup report, in display order
pub const BENCHMARK_CATALOG: [BenchmarkEntry; 5] = [
    BenchmarkEntry {
        stem: "bst_bespoke",
        title: "BST (Repeated Insert)",
        workload: "bespoke",
    },
    BenchmarkEntry {
        stem: "bst_bespokesingle",
        title: "BST (Single-Pass)",
        workload: "bespokesingle",
    },
    BenchmarkEntry {
        stem: "bst_type",
        title: "BST (Type-Derived)",
        workload: "type",
    },
    BenchmarkEntry {
        stem: "stlc_bespoke",
        title: "STLC",
        workload: "bespoke",
    },
    BenchmarkEntry {
        stem: "stlc_type",
        title: "STLC (Type-Derived)",
        workload: "type",
    },
];

/// Geometric mean, `(Π x)^(1/n)`, computed in the log domain
///
/// Returns [`EMPTY_GEOMEAN`] for an empty slice.
///
/// # Example
/// ```
/// use etna_speedups::summary::geometric_mean;
///
/// assert!((geometric_mean(&[2.0, 8.0]) - 4.0).abs() < 1e-12);
/// assert_eq!(geometric_mean(&[]), 0.0);
/// ```
pub fn geometric_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return EMPTY_GEOMEAN;
    }

    let log_sum: f64 = values.iter().map(|v| v.ln()).sum();
    (log_sum / values.len() as f64).exp()
}

/// Every ratio recorded for `strategy` across the given speedup sets
pub fn collect_ratios<'a, I>(sets: I, strategy: &str) -> Vec<f64>
where
    I: IntoIterator<Item = &'a SpeedupSet>,
{
    sets.into_iter()
        .flat_map(|set| set.values())
        .flat_map(|properties| properties.values())
        .flat_map(|seeds| seeds.values())
        .filter_map(|speedups| speedups.get(strategy).copied())
        .collect()
}

/// Geometric-mean speedup of one strategy across one or more speedup sets
pub fn aggregate_speedup<'a, I>(sets: I, strategy: &str) -> f64
where
    I: IntoIterator<Item = &'a SpeedupSet>,
{
    geometric_mean(&collect_ratios(sets, strategy))
}

/// Geometric-mean speedup of one strategy plus how many ratios fed it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategySpeedup {
    pub strategy: String,
    pub label: String,
    pub samples: usize,
    pub geomean: f64,
}

impl StrategySpeedup {
    pub fn from_sets<'a, I>(sets: I, strategy: &str, label: &str) -> Self
    where
        I: IntoIterator<Item = &'a SpeedupSet>,
    {
        let ratios = collect_ratios(sets, strategy);
        Self {
            strategy: strategy.to_string(),
            label: label.to_string(),
            samples: ratios.len(),
            geomean: geometric_mean(&ratios),
        }
    }

    /// False when the geomean is the empty sentinel rather than a measurement
    pub fn is_meaningful(&self) -> bool {
        self.samples > 0
    }
}

/// Staged and staged+CSR geomeans of one benchmark
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkSummary {
    pub title: String,
    pub staged: StrategySpeedup,
    pub staged_csr: StrategySpeedup,
}

/// Summarize the staged and staged+CSR rungs of a family's variant ladder
///
/// Strategy names come from the family's configured suffixes. A family
/// without those rungs summarizes to empty, zero-sample results.
pub fn summarize_benchmark<'a, I>(title: &str, sets: I, family: &StrategyFamily) -> BenchmarkSummary
where
    I: IntoIterator<Item = &'a SpeedupSet> + Clone,
{
    let staged = family.strategy_at(STAGED_POSITION).unwrap_or_default();
    let staged_csr = family.strategy_at(STAGED_CSR_POSITION).unwrap_or_default();

    BenchmarkSummary {
        title: title.to_string(),
        staged: StrategySpeedup::from_sets(sets.clone(), &staged, STAGED_LABEL),
        staged_csr: StrategySpeedup::from_sets(sets, &staged_csr, STAGED_CSR_LABEL),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speedup::SeedSpeedups;

    fn speedup_set(ratios: &[(&str, &str, f64)]) -> SpeedupSet {
        let mut set = SpeedupSet::new();
        for (i, (seed, strategy, ratio)) in ratios.iter().enumerate() {
            set.entry(format!("mutant_{}", i % 2))
                .or_default()
                .entry("prop_Valid".to_string())
                .or_default()
                .entry(seed.to_string())
                .or_insert_with(SeedSpeedups::new)
                .insert(strategy.to_string(), *ratio);
        }
        set
    }

    #[test]
    fn test_geometric_mean_single_element() {
        for x in [0.25, 1.0, 3.7, 1234.5] {
            let gm = geometric_mean(&[x]);
            assert!((gm - x).abs() <= x * 1e-12, "geomean([{}]) = {}", x, gm);
        }
    }

    #[test]
    fn test_geometric_mean_empty_sentinel() {
        assert_eq!(geometric_mean(&[]), EMPTY_GEOMEAN);
    }

    #[test]
    fn test_geometric_mean_reciprocal_pair() {
        assert!((geometric_mean(&[4.0, 0.25]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_geometric_mean_large_sequence_does_not_overflow() {
        let values = vec![1e300; 50];
        let gm = geometric_mean(&values);
        assert!(gm.is_finite());
        assert!((gm / 1e300 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_collect_ratios_filters_strategy() {
        let set = speedup_set(&[
            ("1", "baseTypestaged", 2.0),
            ("1", "baseTypestagedcsr", 4.0),
            ("2", "baseTypestaged", 8.0),
        ]);

        let mut ratios = collect_ratios([&set], "baseTypestaged");
        ratios.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(ratios, vec![2.0, 8.0]);
    }

    #[test]
    fn test_aggregate_across_sets() {
        let a = speedup_set(&[("1", "baseBespokestaged", 2.0)]);
        let b = speedup_set(&[("1", "baseBespokestaged", 8.0)]);
        let gm = aggregate_speedup([&a, &b], "baseBespokestaged");
        assert!((gm - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_missing_strategy_is_sentinel() {
        let set = speedup_set(&[("1", "baseType", 1.0)]);
        assert_eq!(aggregate_speedup([&set], "baseTypestagedcsr"), EMPTY_GEOMEAN);
    }

    #[test]
    fn test_summarize_benchmark() {
        let family = StrategyFamily::new("Type", "baseType");
        let set = speedup_set(&[
            ("1", "baseTypestaged", 3.0),
            ("2", "baseTypestaged", 3.0),
            ("1", "baseTypestagedcsr", 5.0),
        ]);

        let summary = summarize_benchmark("BST (Type-Derived)", [&set], &family);
        assert_eq!(summary.staged.samples, 2);
        assert!((summary.staged.geomean - 3.0).abs() < 1e-12);
        assert_eq!(summary.staged_csr.label, STAGED_CSR_LABEL);
        assert!(summary.staged_csr.is_meaningful());
    }

    #[test]
    fn test_summarize_benchmark_custom_suffixes() {
        let mut family = StrategyFamily::new("Quick", "baseQuick");
        family.variants = vec!["".into(), "s1".into(), "s2".into(), "s3".into()];
        let set = speedup_set(&[
            ("1", "baseQuick", 1.0),
            ("1", "baseQuicks1", 2.0),
            ("1", "baseQuicks3", 4.0),
        ]);

        let summary = summarize_benchmark("Quick", [&set], &family);
        assert_eq!(summary.staged.strategy, "baseQuicks1");
        assert_eq!(summary.staged.samples, 1);
        assert!((summary.staged.geomean - 2.0).abs() < 1e-12);
        assert_eq!(summary.staged_csr.strategy, "baseQuicks3");
        assert!((summary.staged_csr.geomean - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_catalog_workloads_are_known() {
        let families = crate::family::default_families();
        for entry in BENCHMARK_CATALOG {
            assert!(families.iter().any(|f| f.matches_workload(entry.workload)));
            assert!(entry.stem.ends_with(entry.workload));
        }
    }
}
