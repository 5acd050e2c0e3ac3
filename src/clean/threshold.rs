// Minimum-duration filter
//
// A baseline that finished in half a millisecond or less measured harness overhead, not the
// generator. The seed is contaminated for that family only, so the family's
// staged variants for the same seed go with it.

use crate::family::StrategyFamily;
use crate::results::{BucketView, MeasurementKey};
use std::collections::BTreeSet;

/// Keys the threshold rule removes from one bucket
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThresholdRemovals {
    /// Baseline measurements at or below the threshold
    pub base: BTreeSet<MeasurementKey>,

    /// Staged descendants of a removed baseline (same family, same seed)
    pub cascaded: BTreeSet<MeasurementKey>,
}

impl ThresholdRemovals {
    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.cascaded.is_empty()
    }

    pub fn len(&self) -> usize {
        self.base.len() + self.cascaded.len()
    }

    pub fn contains(&self, key: &MeasurementKey) -> bool {
        self.base.contains(key) || self.cascaded.contains(key)
    }

    /// All removed keys, baselines and descendants together
    pub fn iter(&self) -> impl Iterator<Item = &MeasurementKey> {
        self.base.iter().chain(self.cascaded.iter())
    }
}

/// Find baselines at or below `threshold` and cascade to their descendants
///
/// Null baselines never trigger removal. Only keys present in `view` are
/// reported, so running this on already-cleaned data finds nothing.
///
/// # Example
/// ```
/// use etna_speedups::clean::threshold_removals;
/// use etna_speedups::family::default_families;
/// use etna_speedups::results::{BucketView, MeasurementKey};
///
/// let mut view = BucketView::new();
/// view.insert(MeasurementKey::new("baseType", "1"), Some(0.0003));
/// view.insert(MeasurementKey::new("baseTypestaged", "1"), Some(0.0002));
/// view.insert(MeasurementKey::new("baseBespoke", "1"), Some(0.2));
///
/// let removals = threshold_removals(&view, &default_families(), 0.0005);
/// assert_eq!(removals.base.len(), 1);
/// assert_eq!(removals.cascaded.len(), 1);
/// ```
pub fn threshold_removals(
    view: &BucketView,
    families: &[StrategyFamily],
    threshold: f64,
) -> ThresholdRemovals {
    let mut removals = ThresholdRemovals::default();

    for (key, duration) in view {
        let Some(family) = families.iter().find(|f| f.is_baseline(&key.strategy)) else {
            continue;
        };
        let Some(duration) = duration else {
            continue;
        };

        if *duration <= threshold {
            removals.base.insert(key.clone());

            for strategy in family.descendants() {
                let descendant = MeasurementKey::new(strategy, key.seed.as_str());
                if view.contains_key(&descendant) {
                    removals.cascaded.insert(descendant);
                }
            }
        }
    }

    // A key counts once, as the rule that removed it first
    let ThresholdRemovals { base, cascaded } = &mut removals;
    cascaded.retain(|key| !base.contains(key));

    removals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::default_families;

    fn view(entries: &[(&str, &str, Option<f64>)]) -> BucketView {
        entries
            .iter()
            .map(|(strategy, seed, d)| (MeasurementKey::new(*strategy, *seed), *d))
            .collect()
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let v = view(&[("baseType", "1", Some(0.0005)), ("baseType", "2", Some(0.00051))]);
        let removals = threshold_removals(&v, &default_families(), 0.0005);
        assert!(removals.base.contains(&MeasurementKey::new("baseType", "1")));
        assert!(!removals.base.contains(&MeasurementKey::new("baseType", "2")));
    }

    #[test]
    fn test_null_baseline_never_triggers() {
        let v = view(&[("baseType", "1", None), ("baseTypestaged", "1", Some(0.0001))]);
        let removals = threshold_removals(&v, &default_families(), 0.0005);
        assert!(removals.is_empty());
    }

    #[test]
    fn test_fast_staged_variant_alone_is_kept() {
        // Only baselines are screened against the threshold
        let v = view(&[("baseType", "1", Some(0.4)), ("baseTypestaged", "1", Some(0.0001))]);
        let removals = threshold_removals(&v, &default_families(), 0.0005);
        assert!(removals.is_empty());
    }

    #[test]
    fn test_cascade_stays_within_family_and_seed() {
        let v = view(&[
            ("baseBespoke", "4", Some(0.0001)),
            ("baseBespokestaged", "4", Some(0.3)),
            ("baseBespokestagedcsr", "4", Some(0.2)),
            ("baseBespokestaged", "5", Some(0.3)),
            ("baseBespokesinglestaged", "4", Some(0.3)),
            ("baseTypestaged", "4", Some(0.3)),
        ]);
        let removals = threshold_removals(&v, &default_families(), 0.0005);

        assert_eq!(removals.base.len(), 1);
        assert_eq!(
            removals.cascaded,
            [
                MeasurementKey::new("baseBespokestaged", "4"),
                MeasurementKey::new("baseBespokestagedcsr", "4"),
            ]
            .into_iter()
            .collect::<BTreeSet<_>>()
        );
        assert_eq!(removals.len(), 3);
    }

    #[test]
    fn test_missing_descendants_are_not_invented() {
        let v = view(&[("baseType", "9", Some(0.0002))]);
        let removals = threshold_removals(&v, &default_families(), 0.0005);
        assert_eq!(removals.len(), 1);
        assert!(removals.cascaded.is_empty());
    }
}
