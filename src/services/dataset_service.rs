use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use crate::data_loader;
use crate::errors::DatasetError;
use crate::services::death_statistics_service::{DeathCounter, DeathStatistics};
use crate::table::{Row, Table};
use crate::transformations::{self, GenderCounts};

/// The normalized table and its gender counts, published once and only read
/// afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    table: Table,
    gender_counts: GenderCounts,
    source: String,
}

impl Dataset {
    /// Normalize a loaded table into a dataset
    pub fn from_table(raw: &Table, source: impl Into<String>) -> Self {
        let (table, gender_counts) = transformations::normalize(raw);
        Self {
            table,
            gender_counts,
            source: source.into(),
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn gender_counts(&self) -> &GenderCounts {
        &self.gender_counts
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn death_counter(&self) -> DeathCounter<'_> {
        DeathCounter::new(&self.table)
    }

    pub fn count_deaths(&self) -> i64 {
        self.death_counter().count_deaths()
    }

    pub fn statistics(&self) -> DeathStatistics {
        self.death_counter().death_statistics()
    }

    pub fn record(&self, id: i64) -> Result<Option<Row>, DatasetError> {
        self.table.find_by_id(id)
    }
}

/// Load and normalize a delimited file
pub fn load_dataset(path: &Path, delimiter: u8) -> Result<Dataset, DatasetError> {
    let raw = data_loader::load_delimited(path, delimiter)?;
    Ok(Dataset::from_table(&raw, path.display().to_string()))
}

/// Per-path memo of processed datasets.
///
/// The same path returns the same `Arc<Dataset>` without reloading. Failed
/// loads are not remembered.
#[derive(Debug)]
pub struct DatasetCache {
    delimiter: u8,
    entries: Mutex<HashMap<PathBuf, Arc<Dataset>>>,
}

impl DatasetCache {
    pub fn new(delimiter: u8) -> Self {
        Self {
            delimiter,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get_or_load(&self, path: &Path) -> Result<Arc<Dataset>, DatasetError> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(dataset) = entries.get(path) {
            debug!("Dataset cache hit for {}", path.display());
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(load_dataset(path, self.delimiter)?);
        info!(
            "Processed {} rows from {} ({} deaths)",
            dataset.len(),
            path.display(),
            dataset.count_deaths()
        );
        entries.insert(path.to_path_buf(), Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "{}", content).unwrap();
        tmp
    }

    #[test]
    fn cache_returns_same_dataset_for_same_path() {
        let tmp = write_csv("Name;Gender;Death_Year;Allegiances\nJon Snow;1;0;Night's Watch\n");
        let cache = DatasetCache::new(b';');

        let first = cache.get_or_load(tmp.path()).unwrap();
        let second = cache.get_or_load(tmp.path()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn separate_caches_load_separately() {
        let tmp = write_csv("Name;Gender;Death_Year;Allegiances\nJon Snow;1;0;Night's Watch\n");

        let first = DatasetCache::new(b';').get_or_load(tmp.path()).unwrap();
        let second = DatasetCache::new(b';').get_or_load(tmp.path()).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.table(), second.table());
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let cache = DatasetCache::new(b';');
        assert!(cache.get_or_load(Path::new("/nonexistent/deaths.csv")).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn dataset_exposes_pipeline_results() {
        let tmp = write_csv("Name;Gender;Death_Year;Allegiances\nRobb Stark;1;299;Stark\n");
        let dataset = load_dataset(tmp.path(), b';').unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.source(), tmp.path().display().to_string());
        assert_eq!(dataset.count_deaths(), 1);
        assert_eq!(dataset.gender_counts().get("Male"), Some(&1));
        assert!(dataset.record(0).unwrap().is_some());
        assert!(dataset.record(1).unwrap().is_none());
    }
}
