//! etna-speedups - Timing pipeline for ETNA property-based testing benchmarks
//!
//! This library cleans raw benchmark timings (sub-threshold baselines and
//! all-timeout strategy families), normalizes them into per-seed speedups
//! against each family's baseline, and aggregates them into geometric-mean
//! and distribution summaries.

pub mod clean;
pub mod cli;
pub mod config;
pub mod distribution;
pub mod error;
pub mod family;
pub mod layout;
pub mod pipeline;
pub mod results;
pub mod speedup;
pub mod summary;
