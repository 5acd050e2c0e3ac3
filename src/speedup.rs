//! Per-seed speedup normalization
//!
//! For one workload family, every seed's variant durations are divided into
//! the baseline duration: `ratio = baseline / variant`, so `> 1` means the
//! variant ran faster. The baseline's own ratio must come out as exactly
//! `1.0`; anything else means duplicated or corrupted keys upstream and
//! aborts the run.

use crate::error::{PipelineError, Result};
use crate::family::StrategyFamily;
use crate::results::{Bucket, MeasurementKey, ResultSet};
use std::collections::BTreeMap;

/// `strategy -> ratio` for one seed
pub type SeedSpeedups = BTreeMap<String, f64>;

/// `mutant -> property -> seed -> strategy -> ratio`
pub type SpeedupSet = BTreeMap<String, BTreeMap<String, BTreeMap<String, SeedSpeedups>>>;

/// `seed -> strategy -> duration`, regrouped from a flat bucket
pub type SeedTimings = BTreeMap<String, BTreeMap<String, Option<f64>>>;

/// Regroup `{strategy}_{seed} -> duration` entries by seed
///
/// Malformed keys are logged and skipped.
pub fn group_by_seed(bucket: &Bucket) -> SeedTimings {
    let mut timings = SeedTimings::new();

    for (raw, duration) in bucket {
        match MeasurementKey::parse(raw) {
            Ok(MeasurementKey { strategy, seed }) => {
                timings.entry(seed).or_default().insert(strategy, *duration);
            }
            Err(e) => tracing::warn!("Skipping key during speedup grouping: {}", e),
        }
    }

    timings
}

/// Ratios for one seed, or `None` when the baseline is missing or unusable
///
/// Strategies outside `family` are ignored. Null or non-positive variant
/// durations produce no entry.
pub fn seed_speedups(
    timings: &BTreeMap<String, Option<f64>>,
    family: &StrategyFamily,
) -> Option<SeedSpeedups> {
    let base_time = timings.get(&family.baseline).copied().flatten()?;
    if !(base_time > 0.0 && base_time.is_finite()) {
        tracing::warn!(
            "Skipping seed with unusable {} duration {}",
            family.baseline,
            base_time
        );
        return None;
    }

    let mut speedups = SeedSpeedups::new();
    for strategy in family.strategies() {
        let Some(duration) = timings.get(&strategy).copied().flatten() else {
            continue;
        };
        if duration <= 0.0 {
            tracing::warn!("Skipping {} with non-positive duration {}", strategy, duration);
            continue;
        }
        speedups.insert(strategy, base_time / duration);
    }

    Some(speedups)
}

/// Compute the speedup set of one workload family over a cleaned result set
///
/// Seeds without a baseline are skipped; mutants and properties left with
/// no seeds are omitted.
///
/// # Errors
/// [`PipelineError::IntegrityViolation`] if any baseline ratio is not exactly `1.0`.
///
/// # Example
/// ```
/// use etna_speedups::family::StrategyFamily;
/// use etna_speedups::results::{insert_measurement, ResultSet};
/// use etna_speedups::speedup::compute_speedups;
///
/// let mut cleaned = ResultSet::new();
/// insert_measurement(&mut cleaned, "m", "p", "baseType_3".into(), Some(2.0));
/// insert_measurement(&mut cleaned, "m", "p", "baseTypestaged_3".into(), Some(1.0));
///
/// let family = StrategyFamily::new("Type", "baseType");
/// let speedups = compute_speedups(&cleaned, &family).unwrap();
/// assert_eq!(speedups["m"]["p"]["3"]["baseType"], 1.0);
/// assert_eq!(speedups["m"]["p"]["3"]["baseTypestaged"], 2.0);
/// ```
pub fn compute_speedups(cleaned: &ResultSet, family: &StrategyFamily) -> Result<SpeedupSet> {
    let mut speedup_set = SpeedupSet::new();
    let mut seeds_emitted = 0usize;

    for (mutant, properties) in cleaned {
        for (property, bucket) in properties {
            for (seed, timings) in group_by_seed(bucket) {
                let Some(speedups) = seed_speedups(&timings, family) else {
                    continue;
                };

                check_baseline(&speedups, family, &seed, mutant, property)?;

                speedup_set
                    .entry(mutant.clone())
                    .or_default()
                    .entry(property.clone())
                    .or_default()
                    .insert(seed, speedups);
                seeds_emitted += 1;
            }
        }
    }

    tracing::info!(
        "Computed {} speedups for {} seeds across {} mutants",
        family.workload(),
        seeds_emitted,
        speedup_set.len()
    );

    Ok(speedup_set)
}

/// The baseline's ratio against itself must be exactly one
fn check_baseline(
    speedups: &SeedSpeedups,
    family: &StrategyFamily,
    seed: &str,
    mutant: &str,
    property: &str,
) -> Result<()> {
    match speedups.get(&family.baseline) {
        Some(&ratio) if ratio != 1.0 => Err(PipelineError::IntegrityViolation {
            baseline: family.baseline.clone(),
            seed: seed.to_string(),
            mutant: mutant.to_string(),
            property: property.to_string(),
            ratio,
        }),
        _ => Ok(()),
    }
}
