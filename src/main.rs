use anyhow::{Context, Result};
use clap::Parser;
use etna_speedups::cli::{
    CleanArgs, Cli, Command, OutputFormat, RunArgs, SpeedupArgs, SummaryArgs,
};
use etna_speedups::config::PipelineConfig;
use etna_speedups::distribution::{benchmark_distribution, BenchmarkDistribution};
use etna_speedups::layout::{speedup_file, DataLayout};
use etna_speedups::pipeline::{self, CleanPaths};
use etna_speedups::results::load_json;
use etna_speedups::speedup::SpeedupSet;
use etna_speedups::summary::{summarize_benchmark, BenchmarkSummary, BENCHMARK_CATALOG};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; `--debug` raises everything to TRACE
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config file if given, otherwise defaults
fn load_config(path: Option<&PathBuf>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_toml(path),
        None => Ok(PipelineConfig::default()),
    }
}

/// Pick an explicit path flag, falling back to the layout convention
fn resolve_path(explicit: Option<PathBuf>, from_layout: Option<PathBuf>, flag: &str) -> Result<PathBuf> {
    explicit.or(from_layout).with_context(|| {
        format!("{} is required unless both --source and --system are given", flag)
    })
}

fn run_clean(args: CleanArgs, mut config: PipelineConfig) -> Result<()> {
    if let Some(threshold) = args.threshold_seconds {
        config.threshold_seconds = threshold;
    }
    if let Some(sentinel) = args.timeout_sentinel {
        config.timeout_sentinel = sentinel;
    }
    config.validate()?;

    let layout = args.layout.layout();
    let paths = CleanPaths {
        input: resolve_path(args.input, layout.as_ref().map(DataLayout::parsed_results), "--input")?,
        cleaned: resolve_path(
            args.cleaned,
            layout.as_ref().map(DataLayout::cleaned_results),
            "--cleaned",
        )?,
        removed: resolve_path(
            args.removed,
            layout.as_ref().map(DataLayout::removed_results),
            "--removed",
        )?,
    };

    let report = pipeline::clean_file(&paths, &config)?;

    println!(
        "Removed {} of {} measurements ({} below threshold, {} cascaded, {} timeout families)",
        report.total_removed(),
        report.measurements,
        report.threshold_removed,
        report.cascade_removed,
        report.timeout_removed
    );
    if report.malformed_keys > 0 {
        println!("Skipped {} malformed keys", report.malformed_keys);
    }
    println!("Cleaned results saved to {}", paths.cleaned.display());
    println!("Removed entries saved to {}", paths.removed.display());
    Ok(())
}

fn run_speedup(args: SpeedupArgs, config: PipelineConfig) -> Result<()> {
    let workload = args
        .workload
        .unwrap_or_else(|| config.workload_selection.clone());
    let family = config.family(&workload)?;

    let layout = args.layout.layout();
    let input = resolve_path(args.input, layout.as_ref().map(DataLayout::cleaned_results), "--input")?;
    let output = resolve_path(
        args.output,
        layout.as_ref().map(|l| l.speedups(&family.workload())),
        "--output",
    )?;

    let speedups = pipeline::speedup_file(&input, &output, family)?;

    let seeds: usize = speedups
        .values()
        .flat_map(|properties| properties.values())
        .map(|seeds| seeds.len())
        .sum();
    println!("Computed {} speedups for {} seeds", family.workload(), seeds);
    println!("Speedup results saved to {}", output.display());
    Ok(())
}

#[derive(Serialize)]
struct SummaryReport {
    benchmarks: Vec<BenchmarkSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    distributions: Vec<BenchmarkDistribution>,
}

/// Print geomean speedups per benchmark
fn print_summary_text(report: &SummaryReport) {
    for summary in &report.benchmarks {
        println!(
            "{}: {}={:.4}X, {}={:.4}X",
            summary.title,
            summary.staged.label,
            summary.staged.geomean,
            summary.staged_csr.label,
            summary.staged_csr.geomean
        );
    }

    for dist in &report.distributions {
        for (label, stats) in [("staged", &dist.staged), ("stagedcsr", &dist.staged_csr)] {
            match stats {
                Some(s) => println!(
                    "  {} {}: n={} min={:.3} q1={:.3} median={:.3} q3={:.3} max={:.3}",
                    dist.title, label, s.count, s.min, s.lower_quartile, s.median, s.upper_quartile, s.max
                ),
                None => println!("  {} {}: no samples", dist.title, label),
            }
        }
    }
}

fn run_summary(args: SummaryArgs, config: PipelineConfig) -> Result<()> {
    let mut report = SummaryReport {
        benchmarks: Vec::new(),
        distributions: Vec::new(),
    };

    if !args.inputs.is_empty() {
        let workload = args
            .workload
            .unwrap_or_else(|| config.workload_selection.clone());
        let family = config.family(&workload)?;

        let sets = args
            .inputs
            .iter()
            .map(|path| load_json::<SpeedupSet>(path))
            .collect::<Result<Vec<_>, _>>()?;
        let title = args.title.unwrap_or_else(|| family.name.clone());

        report.benchmarks.push(summarize_benchmark(&title, &sets, family));
        if args.distribution {
            report
                .distributions
                .push(benchmark_distribution(&title, &sets, family)?);
        }
    } else {
        let source = args
            .source
            .context("--source is required unless --input files are given")?;

        for entry in BENCHMARK_CATALOG {
            let path = speedup_file(&args.root, source, entry.stem);
            if !path.exists() {
                tracing::warn!("{} not found, skipping {}", path.display(), entry.title);
                continue;
            }

            let family = config.family(entry.workload)?;
            let set: SpeedupSet = load_json(&path)?;
            report
                .benchmarks
                .push(summarize_benchmark(entry.title, [&set], family));
            if args.distribution {
                report
                    .distributions
                    .push(benchmark_distribution(entry.title, [&set], family)?);
            }
        }

        if report.benchmarks.is_empty() {
            anyhow::bail!(
                "No speedup files found under {}",
                etna_speedups::layout::source_dir(&args.root, source).display()
            );
        }
    }

    match args.format {
        OutputFormat::Text => print_summary_text(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn run_all(args: RunArgs, mut config: PipelineConfig) -> Result<()> {
    if let Some(threshold) = args.threshold_seconds {
        config.threshold_seconds = threshold;
    }
    if let Some(sentinel) = args.timeout_sentinel {
        config.timeout_sentinel = sentinel;
    }
    config.validate()?;

    let layout = DataLayout::new(&args.root, args.source, args.system);
    println!("Processing {} ({}) data", args.system, args.source);

    let report = pipeline::run_layout(&layout, &config)?;

    println!(
        "Removed {} of {} measurements",
        report.clean.total_removed(),
        report.clean.measurements
    );
    for path in &report.speedup_files {
        println!("Speedup results saved to {}", path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = load_config(args.config.as_ref())?;

    match args.command {
        Command::Clean(clean) => run_clean(clean, config),
        Command::Speedup(speedup) => run_speedup(speedup, config),
        Command::Summary(summary) => run_summary(summary, config),
        Command::Run(run) => run_all(run, config),
    }
}
