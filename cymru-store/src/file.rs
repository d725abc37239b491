//! File-based snapshot store.
//!
//! The whole cache is one JSON object: each field is an organisation name and
//! each value is either `{"lat": .., "lng": ..}` or `null`.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

use cymru_core::error::Result;
use cymru_core::traits::SnapshotStore;
use cymru_core::types::{CacheEntry, CacheMap};

/// Snapshot stored as pretty-printed JSON on the local filesystem.
///
/// Saves go through a sibling `.tmp` file followed by a rename, so a reader
/// never sees a half-written snapshot.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store for the given path. Nothing is touched until load/save.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    #[instrument(skip(self), fields(path = ?self.path))]
    async fn load(&self) -> Result<Option<CacheMap>> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Snapshot file does not exist");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let entries: CacheMap = serde_json::from_str(&raw)?;
        debug!(count = entries.len(), "Snapshot parsed");
        Ok(Some(entries))
    }

    #[instrument(skip(self, entries), fields(path = ?self.path, count = entries.len()))]
    async fn save(&self, entries: &CacheMap) -> Result<()> {
        // Sorted keys keep successive snapshots diffable
        let sorted: BTreeMap<&String, &CacheEntry> = entries.iter().collect();
        let serialized = serde_json::to_vec_pretty(&sorted)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.temp_path();
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(&serialized).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &self.path).await?;

        debug!("Snapshot written");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cymru_core::types::Coordinate;
    use cymru_core::GeocodeError;
    use tempfile::tempdir;

    fn sample_entries() -> CacheMap {
        let mut entries = CacheMap::new();
        entries.insert("Swansea RFC".into(), Some(Coordinate::new(51.6123, -3.9655)));
        entries.insert("Unknown FC".into(), None);
        entries
    }

    #[tokio::test]
    async fn test_missing_file_loads_none() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("cache.json"));

        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("cache.json"));

        store.save(&sample_entries()).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();

        assert_eq!(loaded, sample_entries());
    }

    #[tokio::test]
    async fn test_file_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let store = JsonFileStore::new(&path);

        store.save(&sample_entries()).await.unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();

        // Pretty-printed, keys sorted, negative entries as null
        let expected = "{\n  \"Swansea RFC\": {\n    \"lat\": 51.6123,\n    \"lng\": -3.9655\n  },\n  \"Unknown FC\": null\n}";
        assert_eq!(raw, expected);
    }

    #[tokio::test]
    async fn test_reads_long_field_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(
            &path,
            r#"{"Bridgend Ravens": {"latitude": 51.5072, "longitude": -3.5784}}"#,
        )
        .unwrap();

        let loaded = JsonFileStore::new(&path).load().await.unwrap().unwrap();
        assert_eq!(
            loaded.get("Bridgend Ravens"),
            Some(&Some(Coordinate::new(51.5072, -3.5784)))
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, b"not json at all").unwrap();

        let result = JsonFileStore::new(&path).load().await;
        assert!(matches!(result, Err(GeocodeError::JsonError(_))));
    }

    #[tokio::test]
    async fn test_atomic_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let store = JsonFileStore::new(&path);

        store.save(&sample_entries()).await.unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("cache.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("cache.json");
        let store = JsonFileStore::new(&path);

        store.save(&sample_entries()).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_save_overwrites_whole_snapshot() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("cache.json"));

        store.save(&sample_entries()).await.unwrap();

        let mut smaller = CacheMap::new();
        smaller.insert("Newport RFC".into(), None);
        store.save(&smaller).await.unwrap();

        assert_eq!(store.load().await.unwrap().unwrap(), smaller);
    }
}
