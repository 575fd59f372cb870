use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::error::DataError;
use super::loader::load_dataset;
use super::model::Dataset;

struct CachedDataset {
    modified: Option<SystemTime>,
    dataset: Arc<Dataset>,
}

/// Load-once cache of cleaned datasets.
///
/// An entry is reused while the file's modification time is unchanged.
/// Files whose mtime cannot be read are cached until invalidated.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, CachedDataset>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `path`, loading it on a miss.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Dataset>, DataError> {
        let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok();

        if let Some(entry) = self.entries.get(path) {
            if entry.modified == modified {
                log::debug!("Dataset cache hit for {}", path.display());
                return Ok(Arc::clone(&entry.dataset));
            }
            log::info!("{} changed on disk, reloading", path.display());
        }

        let dataset = Arc::new(load_dataset(path)?);
        self.entries.insert(
            path.to_path_buf(),
            CachedDataset {
                modified,
                dataset: Arc::clone(&dataset),
            },
        );
        Ok(dataset)
    }

    /// Forget the entry for `path`. Returns whether one existed.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;
    use std::time::Duration;

    use tempfile::TempDir;

    fn temp_csv(body: &str) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("surgeries.csv");
        std::fs::write(&path, body).unwrap();
        (dir, path)
    }

    #[test]
    fn second_load_is_served_from_cache() {
        let (_dir, path) = temp_csv("year,surgery,hospital,cases\n2020,Breast,A,3\n");
        let mut cache = DatasetCache::new();

        let first = cache.get_or_load(&path).unwrap();
        let second = cache.get_or_load(&path).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_forces_reload() {
        let (_dir, path) = temp_csv("year,surgery,hospital,cases\n2020,Breast,A,3\n");
        let mut cache = DatasetCache::new();

        let first = cache.get_or_load(&path).unwrap();
        assert!(cache.invalidate(&path));
        let second = cache.get_or_load(&path).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.records, second.records);
    }

    #[test]
    fn changed_file_is_reloaded() {
        let (_dir, path) = temp_csv("year,surgery,hospital,cases\n2020,Breast,A,3\n");
        let mut cache = DatasetCache::new();
        let first = cache.get_or_load(&path).unwrap();

        std::fs::write(
            &path,
            "year,surgery,hospital,cases\n2020,Breast,A,3\n2021,Colon,B,4\n",
        )
        .unwrap();
        // A rewrite within the filesystem's timestamp granularity keeps the old mtime.
        let file = OpenOptions::new().write(true).open(&path).unwrap();
        let later = modified_at(&path) + Duration::from_secs(10);
        file.set_modified(later).unwrap();

        let second = cache.get_or_load(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
        assert_eq!(cache.len(), 1);
    }

    fn modified_at(path: &Path) -> SystemTime {
        std::fs::metadata(path).unwrap().modified().unwrap()
    }

    #[test]
    fn failed_load_is_not_cached() {
        let mut cache = DatasetCache::new();
        assert!(cache.get_or_load(Path::new("/no/such/surgeries.csv")).is_err());
        assert!(cache.is_empty());
    }
}
