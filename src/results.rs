//! Canonical result-set data model
//!
//! A result set maps `mutant -> property -> {measurement_key -> duration}`.
//! Raw input, cleaned output and the removed-entries audit all share this
//! shape. Durations are seconds; `null` means the trial was never recorded.

use crate::error::{PipelineError, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Flat `{strategy}_{seed} -> duration` entries of one (mutant, property) pair
pub type Bucket = BTreeMap<String, Option<f64>>;

/// `property -> bucket`
pub type PropertyResults = BTreeMap<String, Bucket>;

/// `mutant -> property -> bucket`
pub type ResultSet = BTreeMap<String, PropertyResults>;

/// Well-formed entries of a bucket, keyed by parsed measurement key
pub type BucketView = BTreeMap<MeasurementKey, Option<f64>>;

/// A parsed `{strategy}_{seed}` measurement key
///
/// The seed is the text after the last underscore, so strategy names may
/// themselves contain underscores.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeasurementKey {
    pub strategy: String,
    pub seed: String,
}

impl MeasurementKey {
    pub fn new(strategy: impl Into<String>, seed: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            seed: seed.into(),
        }
    }

    /// Parse a raw key such as `baseTypestaged_17`
    pub fn parse(raw: &str) -> Result<Self> {
        let malformed = |reason| PipelineError::MalformedKey {
            key: raw.to_string(),
            reason,
        };

        let (strategy, seed) = raw
            .rsplit_once('_')
            .ok_or_else(|| malformed("missing '_' seed separator"))?;

        if strategy.is_empty() {
            return Err(malformed("empty strategy name"));
        }
        if seed.is_empty() {
            return Err(malformed("empty seed"));
        }
        if !seed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed("seed is not numeric"));
        }

        Ok(Self::new(strategy, seed))
    }
}

impl fmt::Display for MeasurementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.strategy, self.seed)
    }
}

/// Split a bucket into its well-formed view and the keys that failed to parse
pub fn parse_bucket(bucket: &Bucket) -> (BucketView, Vec<PipelineError>) {
    let mut view = BucketView::new();
    let mut malformed = Vec::new();

    for (raw, duration) in bucket {
        match MeasurementKey::parse(raw) {
            Ok(key) => {
                view.insert(key, *duration);
            }
            Err(e) => malformed.push(e),
        }
    }

    (view, malformed)
}

/// Insert one measurement under `mutant -> property`, creating the path on demand
pub fn insert_measurement(
    set: &mut ResultSet,
    mutant: &str,
    property: &str,
    key: String,
    duration: Option<f64>,
) {
    set.entry(mutant.to_string())
        .or_default()
        .entry(property.to_string())
        .or_default()
        .insert(key, duration);
}

/// Total number of measurement keys across all buckets
pub fn measurement_count(set: &ResultSet) -> usize {
    set.values()
        .flat_map(|properties| properties.values())
        .map(|bucket| bucket.len())
        .sum()
}

/// Load any JSON document from disk
///
/// A missing file is reported as [`PipelineError::MissingInput`] with the
/// path resolved against the current directory.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        let resolved = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        return Err(PipelineError::MissingInput(resolved));
    }

    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader).map_err(|source| PipelineError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a JSON document with 2-space indentation, creating parent directories
pub fn store_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| PipelineError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Load a result set (raw or cleaned) from disk
pub fn load_result_set(path: &Path) -> Result<ResultSet> {
    load_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_simple_key() {
        let key = MeasurementKey::parse("baseTypestagedcsr_12").unwrap();
        assert_eq!(key.strategy, "baseTypestagedcsr");
        assert_eq!(key.seed, "12");
        assert_eq!(key.to_string(), "baseTypestagedcsr_12");
    }

    #[test]
    fn test_parse_uses_last_underscore() {
        let key = MeasurementKey::parse("base_Staged_CSR_4").unwrap();
        assert_eq!(key.strategy, "base_Staged_CSR");
        assert_eq!(key.seed, "4");
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        for raw in ["baseType", "_3", "baseType_", "baseType_x1", ""] {
            let err = MeasurementKey::parse(raw).unwrap_err();
            assert!(err.is_recoverable(), "{} should be recoverable", raw);
        }
    }

    #[test]
    fn test_parse_bucket_separates_malformed() {
        let mut bucket = Bucket::new();
        bucket.insert("baseType_1".to_string(), Some(1.0));
        bucket.insert("garbage".to_string(), Some(2.0));
        bucket.insert("baseTypestaged_1".to_string(), None);

        let (view, malformed) = parse_bucket(&bucket);
        assert_eq!(view.len(), 2);
        assert_eq!(malformed.len(), 1);
        assert_eq!(view[&MeasurementKey::new("baseTypestaged", "1")], None);
    }

    #[test]
    fn test_load_missing_relative_path_is_resolved() {
        let relative = Path::new("./no_such_data_dir/bst_results.json");
        match load_result_set(relative) {
            Err(PipelineError::MissingInput(p)) => {
                assert!(p.is_absolute());
                assert!(p.ends_with("no_such_data_dir/bst_results.json"));
                assert!(!p.to_string_lossy().contains("/./"));
            }
            other => panic!("expected MissingInput, got {:?}", other),
        }
    }

    #[test]
    fn test_measurement_count() {
        let mut set = ResultSet::new();
        insert_measurement(&mut set, "m1", "p1", "baseType_1".into(), Some(1.0));
        insert_measurement(&mut set, "m1", "p2", "baseType_1".into(), None);
        insert_measurement(&mut set, "m2", "p1", "baseType_2".into(), Some(3.0));
        assert_eq!(measurement_count(&set), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        match load_result_set(&path) {
            Err(PipelineError::MissingInput(p)) => assert_eq!(p, path),
            other => panic!("expected MissingInput, got {:?}", other),
        }
    }

    #[test]
    fn test_store_and_load_preserves_nulls() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("results.json");

        let mut set = ResultSet::new();
        insert_measurement(&mut set, "insert_1", "prop_Valid", "baseType_1".into(), None);
        insert_measurement(&mut set, "insert_1", "prop_Valid", "baseType_2".into(), Some(0.25));

        store_json(&path, &set).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"baseType_1\": null"));

        let loaded = load_result_set(&path).unwrap();
        assert_eq!(loaded, set);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"m\": {\"p\": {\"baseType_1\": \"fast\"}}}").unwrap();
        assert!(matches!(
            load_result_set(&path),
            Err(PipelineError::Json { .. })
        ));
    }
}
