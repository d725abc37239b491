//! In-memory snapshot store.
//!
//! Holds the "durable" snapshot in process memory. Useful for tests and for
//! running the service without touching the filesystem.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use cymru_core::error::Result;
use cymru_core::traits::SnapshotStore;
use cymru_core::types::CacheMap;

/// Snapshot store backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<CacheMap>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    /// Creates an empty store (loads as "nothing stored yet").
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds a snapshot.
    pub fn with_entries(entries: CacheMap) -> Self {
        Self {
            snapshot: Mutex::new(Some(entries)),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Returns a copy of the last saved snapshot.
    pub fn snapshot(&self) -> Option<CacheMap> {
        self.snapshot.lock().clone()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self) -> Result<Option<CacheMap>> {
        Ok(self.snapshot.lock().clone())
    }

    async fn save(&self, entries: &CacheMap) -> Result<()> {
        *self.snapshot.lock() = Some(entries.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cymru_core::types::Coordinate;

    #[test]
    fn test_empty_store_loads_none() {
        let store = MemoryStore::new();
        assert!(tokio_test::block_on(store.load()).unwrap().is_none());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_with_entries_is_loadable() {
        let mut entries = CacheMap::new();
        entries.insert("Pontypridd RFC".into(), Some(Coordinate::new(51.60, -3.34)));
        let store = MemoryStore::with_entries(entries.clone());

        assert_eq!(tokio_test::block_on(store.load()).unwrap(), Some(entries));
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_save_replaces_snapshot() {
        let store = MemoryStore::new();

        let mut entries = CacheMap::new();
        entries.insert("Aberavon RFC".into(), Some(Coordinate::new(51.59, -3.79)));
        store.save(&entries).await.unwrap();

        entries.clear();
        entries.insert("Ebbw Vale RFC".into(), None);
        store.save(&entries).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(entries));
        assert_eq!(store.save_count(), 2);
    }
}
