//! Cleaning and speedup throughput over synthetic result sets
//!
//! Run with: cargo bench --bench pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use etna_speedups::clean::clean_results;
use etna_speedups::config::PipelineConfig;
use etna_speedups::family::default_families;
use etna_speedups::results::{insert_measurement, ResultSet};
use etna_speedups::speedup::compute_speedups;
use etna_speedups::summary::aggregate_speedup;

/// Every family and variant for `seeds` seeds in each of `mutants` buckets
///
/// Every seventh baseline is sub-threshold and every eleventh seed times out.
fn synthetic_results(mutants: usize, seeds: usize) -> ResultSet {
    let mut set = ResultSet::new();
    for mutant in 0..mutants {
        let name = format!("mutant_{}", mutant);
        for family in default_families() {
            for seed in 0..seeds {
                for (i, strategy) in family.strategies().enumerate() {
                    let duration = if seed % 11 == 0 {
                        60.0
                    } else if i == 0 && seed % 7 == 0 {
                        0.0001
                    } else {
                        0.01 * (seed + i + 1) as f64
                    };
                    insert_measurement(
                        &mut set,
                        &name,
                        "prop_Valid",
                        format!("{}_{}", strategy, seed),
                        Some(duration),
                    );
                }
            }
        }
    }
    set
}

fn bench_clean(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean_results");
    let config = PipelineConfig::default();

    for seeds in [10, 100, 1000] {
        let raw = synthetic_results(8, seeds);
        group.bench_with_input(BenchmarkId::from_parameter(seeds), &raw, |b, raw| {
            b.iter(|| clean_results(black_box(raw), &config));
        });
    }

    group.finish();
}

fn bench_speedups(c: &mut Criterion) {
    let config = PipelineConfig::default();
    let cleaned = clean_results(&synthetic_results(8, 1000), &config).cleaned;
    let families = default_families();

    c.bench_function("compute_speedups_type", |b| {
        b.iter(|| compute_speedups(black_box(&cleaned), &families[0]));
    });

    let speedups = compute_speedups(&cleaned, &families[0]).unwrap_or_default();
    c.bench_function("aggregate_speedup_staged", |b| {
        b.iter(|| aggregate_speedup([black_box(&speedups)], "baseTypestaged"));
    });
}

criterion_group!(benches, bench_clean, bench_speedups);
criterion_main!(benches);
