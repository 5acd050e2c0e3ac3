// Speedup distribution summaries
//
// Five-number summaries of per-seed ratios, the data behind the speedup box
// plots. Uses trueno::Vector for min/max/mean and aprender's DescriptiveStats
// for quantiles (R-7 method). Both operate on f32; the geometric means in
// `summary` stay in f64.

use anyhow::Result;
use aprender::stats::DescriptiveStats;
use serde::Serialize;
use trueno::Vector;

use crate::family::{StrategyFamily, STAGED_CSR_POSITION, STAGED_POSITION};
use crate::speedup::SpeedupSet;
use crate::summary::collect_ratios;

/// Box-plot summary of a speedup sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedupDistribution {
    pub count: usize,
    pub min: f32,
    pub lower_quartile: f32,
    pub median: f32,
    pub upper_quartile: f32,
    pub max: f32,
    pub mean: f32,
}

impl SpeedupDistribution {
    /// Interquartile range
    pub fn iqr(&self) -> f32 {
        self.upper_quartile - self.lower_quartile
    }

    /// Whether the median ratio shows the variant beating its baseline
    pub fn median_is_speedup(&self) -> bool {
        self.median > 1.0
    }
}

/// Summarize a ratio sequence; `None` when it is empty
pub fn describe(ratios: &[f64]) -> Result<Option<SpeedupDistribution>> {
    if ratios.is_empty() {
        return Ok(None);
    }

    let samples: Vec<f32> = ratios.iter().map(|&r| r as f32).collect();
    let vector = Vector::from_slice(&samples);

    let min = vector
        .min()
        .map_err(|e| anyhow::anyhow!("Failed to compute minimum: {}", e))?;
    let max = vector
        .max()
        .map_err(|e| anyhow::anyhow!("Failed to compute maximum: {}", e))?;
    let mean = vector
        .mean()
        .map_err(|e| anyhow::anyhow!("Failed to compute mean: {}", e))?;

    let stats = DescriptiveStats::new(&vector);
    let quantile = |q| {
        stats
            .quantile(q)
            .map_err(|e| anyhow::anyhow!("Failed to compute quantile {}: {}", q, e))
    };

    Ok(Some(SpeedupDistribution {
        count: samples.len(),
        min,
        lower_quartile: quantile(0.25)?,
        median: quantile(0.5)?,
        upper_quartile: quantile(0.75)?,
        max,
        mean,
    }))
}

/// Distribution of one strategy's ratios across speedup sets
pub fn strategy_distribution<'a, I>(sets: I, strategy: &str) -> Result<Option<SpeedupDistribution>>
where
    I: IntoIterator<Item = &'a SpeedupSet>,
{
    describe(&collect_ratios(sets, strategy))
}

/// Staged and staged+CSR distributions of one benchmark
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkDistribution {
    pub title: String,
    pub staged: Option<SpeedupDistribution>,
    pub staged_csr: Option<SpeedupDistribution>,
}

pub fn benchmark_distribution<'a, I>(
    title: &str,
    sets: I,
    family: &StrategyFamily,
) -> Result<BenchmarkDistribution>
where
    I: IntoIterator<Item = &'a SpeedupSet> + Clone,
{
    let staged = family.strategy_at(STAGED_POSITION).unwrap_or_default();
    let staged_csr = family.strategy_at(STAGED_CSR_POSITION).unwrap_or_default();

    Ok(BenchmarkDistribution {
        title: title.to_string(),
        staged: strategy_distribution(sets.clone(), &staged)?,
        staged_csr: strategy_distribution(sets, &staged_csr)?,
    })
}
