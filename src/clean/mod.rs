// Result-set cleaning
//
// Two rules decide which measurements are noise:
// - Threshold: a baseline at or below 0.0005 s, cascading to its staged
//   descendants for the same family and seed.
// - Timeout family: all four variants of a family hit the timeout sentinel.
//
// Each bucket is cleaned in two passes. The rules compute a set of keys to
// remove from the bucket's current contents, then `cleaned` and `removed` are
// materialized as new maps. The raw input is never mutated, so
// `cleaned ∪ removed == raw` and `cleaned ∩ removed == ∅` per bucket.

mod threshold;
mod timeout;

pub use threshold::{threshold_removals, ThresholdRemovals};
pub use timeout::timeout_family_removals;

use crate::config::PipelineConfig;
use crate::results::{parse_bucket, Bucket, BucketView, ResultSet};
use serde::Serialize;
use std::collections::BTreeSet;

/// A cleaning rule, applied in the order given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleaningStage {
    Threshold,
    TimeoutFamily,
}

/// The standard order: threshold first, then timeout families on what survived
pub const ALL_STAGES: [CleaningStage; 2] = [CleaningStage::Threshold, CleaningStage::TimeoutFamily];

/// Per-rule removal counts for one cleaning run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub buckets: usize,
    pub measurements: usize,
    pub threshold_removed: usize,
    pub cascade_removed: usize,
    pub timeout_removed: usize,
    pub malformed_keys: usize,
}

impl CleanReport {
    pub fn total_removed(&self) -> usize {
        self.threshold_removed + self.cascade_removed + self.timeout_removed
    }
}

/// Cleaned result set plus the audit trail of everything removed
#[derive(Debug, Clone, Default)]
pub struct CleanOutcome {
    pub cleaned: ResultSet,
    pub removed: ResultSet,
    pub report: CleanReport,
}

/// Apply both cleaning rules to a raw result set
///
/// # Example
/// ```
/// use etna_speedups::clean::clean_results;
/// use etna_speedups::config::PipelineConfig;
/// use etna_speedups::results::{insert_measurement, ResultSet};
///
/// let mut raw = ResultSet::new();
/// insert_measurement(&mut raw, "m", "p", "baseType_1".into(), Some(0.0003));
/// insert_measurement(&mut raw, "m", "p", "baseTypestaged_1".into(), Some(0.2));
///
/// let outcome = clean_results(&raw, &PipelineConfig::default());
/// assert!(outcome.cleaned["m"]["p"].is_empty());
/// assert_eq!(outcome.removed["m"]["p"].len(), 2);
/// ```
pub fn clean_results(raw: &ResultSet, config: &PipelineConfig) -> CleanOutcome {
    clean_results_with(raw, config, &ALL_STAGES)
}

/// Apply a chosen sequence of cleaning rules
///
/// Every (mutant, property) path of `raw` is kept in `cleaned`, even when its
/// bucket ends up empty. `removed` only holds paths that lost a measurement.
pub fn clean_results_with(
    raw: &ResultSet,
    config: &PipelineConfig,
    stages: &[CleaningStage],
) -> CleanOutcome {
    let mut outcome = CleanOutcome::default();

    for (mutant, properties) in raw {
        let cleaned_properties = outcome.cleaned.entry(mutant.clone()).or_default();

        for (property, bucket) in properties {
            outcome.report.buckets += 1;
            outcome.report.measurements += bucket.len();

            let (view, malformed) = parse_bucket(bucket);
            for err in &malformed {
                tracing::warn!("Skipping key in {} -> {}: {}", mutant, property, err);
            }
            outcome.report.malformed_keys += malformed.len();

            let doomed = bucket_removals(&view, config, stages, &mut outcome.report);
            let (kept, dropped) = partition_bucket(bucket, &doomed);

            cleaned_properties.insert(property.clone(), kept);
            if !dropped.is_empty() {
                tracing::debug!(
                    "Removed {} measurements from {} -> {}",
                    dropped.len(),
                    mutant,
                    property
                );
                outcome
                    .removed
                    .entry(mutant.clone())
                    .or_default()
                    .insert(property.clone(), dropped);
            }
        }
    }

    tracing::info!(
        "Cleaned {} buckets: {} threshold, {} cascaded, {} timeout-family removals",
        outcome.report.buckets,
        outcome.report.threshold_removed,
        outcome.report.cascade_removed,
        outcome.report.timeout_removed
    );

    outcome
}

/// Raw keys the given stages remove from one bucket
fn bucket_removals(
    view: &BucketView,
    config: &PipelineConfig,
    stages: &[CleaningStage],
    report: &mut CleanReport,
) -> BTreeSet<String> {
    let mut surviving = view.clone();
    let mut doomed = BTreeSet::new();

    for stage in stages {
        match stage {
            CleaningStage::Threshold => {
                let removals = threshold_removals(
                    &surviving,
                    &config.family_definitions,
                    config.threshold_seconds,
                );
                report.threshold_removed += removals.base.len();
                report.cascade_removed += removals.cascaded.len();

                surviving.retain(|key, _| !removals.contains(key));
                doomed.extend(removals.iter().map(ToString::to_string));
            }
            CleaningStage::TimeoutFamily => {
                let removals = timeout_family_removals(
                    &surviving,
                    &config.family_definitions,
                    config.timeout_sentinel,
                );
                report.timeout_removed += removals.len();

                surviving.retain(|key, _| !removals.contains(key));
                doomed.extend(removals.iter().map(ToString::to_string));
            }
        }
    }

    doomed
}

/// Split a bucket into (kept, removed) copies by raw key
fn partition_bucket(bucket: &Bucket, doomed: &BTreeSet<String>) -> (Bucket, Bucket) {
    bucket
        .iter()
        .map(|(key, duration)| (key.clone(), *duration))
        .partition(|(key, _)| !doomed.contains(key))
}
