// Timeout-family filter
//
// A family whose four variants all hit the timeout sentinel for a seed
// carries no comparative signal. Only complete 4-tuples are removed; three
// timeouts plus a missing or real value stay in the data.

use crate::family::StrategyFamily;
use crate::results::{BucketView, MeasurementKey};
use std::collections::BTreeSet;

/// Keys of every (family, seed) whose variants all equal `sentinel`
///
/// Seeds are collected from every well-formed key in `view`; families are
/// evaluated independently of each other.
pub fn timeout_family_removals(
    view: &BucketView,
    families: &[StrategyFamily],
    sentinel: f64,
) -> BTreeSet<MeasurementKey> {
    let seeds: BTreeSet<&str> = view.keys().map(|key| key.seed.as_str()).collect();
    let mut removals = BTreeSet::new();

    for seed in seeds {
        for family in families {
            let keys: Vec<MeasurementKey> = family
                .strategies()
                .map(|strategy| MeasurementKey::new(strategy, seed))
                .collect();

            let all_timed_out = keys
                .iter()
                .all(|key| view.get(key).copied().flatten() == Some(sentinel));

            if all_timed_out {
                removals.extend(keys);
            }
        }
    }

    removals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::default_families;

    fn family_view(baseline: &str, seed: &str, durations: [Option<f64>; 4]) -> BucketView {
        ["", "staged", "stagedc", "stagedcsr"]
            .iter()
            .zip(durations)
            .map(|(suffix, d)| (MeasurementKey::new(format!("{}{}", baseline, suffix), seed), d))
            .collect()
    }

    #[test]
    fn test_all_four_timeouts_removed() {
        let view = family_view("baseBespoke", "2", [Some(60.0); 4]);
        let removals = timeout_family_removals(&view, &default_families(), 60.0);
        assert_eq!(removals.len(), 4);
    }

    #[test]
    fn test_three_timeouts_and_missing_kept() {
        let mut view = family_view("baseType", "1", [Some(60.0); 4]);
        view.remove(&MeasurementKey::new("baseTypestagedcsr", "1"));
        assert!(timeout_family_removals(&view, &default_families(), 60.0).is_empty());
    }

    #[test]
    fn test_three_timeouts_and_null_kept() {
        let view = family_view("baseType", "1", [Some(60.0), Some(60.0), None, Some(60.0)]);
        assert!(timeout_family_removals(&view, &default_families(), 60.0).is_empty());
    }

    #[test]
    fn test_three_timeouts_and_real_value_kept() {
        let view = family_view("baseType", "1", [Some(60.0), Some(60.0), Some(60.0), Some(12.5)]);
        assert!(timeout_family_removals(&view, &default_families(), 60.0).is_empty());
    }

    #[test]
    fn test_families_evaluated_independently() {
        let mut view = family_view("baseType", "7", [Some(60.0); 4]);
        view.extend(family_view("baseBespoke", "7", [Some(60.0), Some(1.0), Some(1.0), Some(1.0)]));

        let removals = timeout_family_removals(&view, &default_families(), 60.0);
        assert_eq!(removals.len(), 4);
        assert!(removals.iter().all(|key| key.strategy.starts_with("baseType")));
    }

    #[test]
    fn test_seeds_evaluated_independently() {
        let mut view = family_view("baseBespokesingle", "1", [Some(60.0); 4]);
        view.extend(family_view("baseBespokesingle", "2", [Some(60.0), Some(60.0), Some(60.0), Some(59.9)]));

        let removals = timeout_family_removals(&view, &default_families(), 60.0);
        assert_eq!(removals.len(), 4);
        assert!(removals.iter().all(|key| key.seed == "1"));
    }

    #[test]
    fn test_custom_sentinel() {
        let view = family_view("baseType", "3", [Some(30.0); 4]);
        assert!(timeout_family_removals(&view, &default_families(), 60.0).is_empty());
        assert_eq!(timeout_family_removals(&view, &default_families(), 30.0).len(), 4);
    }
}
