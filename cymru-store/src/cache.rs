//! The in-memory geocode cache and its load/flush lifecycle.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, instrument, warn};

use cymru_core::error::Result;
use cymru_core::traits::SnapshotStore;
use cymru_core::types::{CacheEntry, CacheMap, CacheStats};

use crate::{JsonFileStore, MemoryStore};

/// Permanent memo of organisation name → coordinate (or negative marker).
///
/// Entries are write-once: the first answer stored under a name wins and is
/// never replaced, expired, or evicted while the process runs.
///
/// # Lifecycle
///
/// - [`ensure_loaded`](Self::ensure_loaded) reads the snapshot the first time it
///   is awaited and is a no-op afterwards. A missing or corrupt snapshot leaves
///   the cache empty.
/// - [`flush`](Self::flush) writes the whole mirror back when it has changed.
///   A failed write keeps the cache dirty so the next flush tries again.
pub struct GeocodeCache {
    store: Arc<dyn SnapshotStore>,
    entries: RwLock<CacheMap>,
    loaded: OnceCell<()>,
    dirty: AtomicBool,
    /// Serializes flushes so an older snapshot never overwrites a newer one
    flush_lock: Mutex<()>,
}

impl GeocodeCache {
    /// Creates a cache over the given snapshot store.
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            store,
            entries: RwLock::new(HashMap::new()),
            loaded: OnceCell::new(),
            dirty: AtomicBool::new(false),
            flush_lock: Mutex::new(()),
        }
    }

    /// Creates a cache persisted to a JSON file.
    pub fn json_file(path: impl AsRef<Path>) -> Self {
        Self::new(Arc::new(JsonFileStore::new(path)))
    }

    /// Creates a cache whose snapshot lives only in memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Loads the snapshot on first call; later calls return immediately.
    ///
    /// Load failures are logged and the cache starts empty.
    pub async fn ensure_loaded(&self) {
        self.loaded
            .get_or_init(|| async {
                let loaded = match self.store.load().await {
                    Ok(Some(entries)) => entries,
                    Ok(None) => {
                        info!(location = %self.store.describe(), "No geocode snapshot found, starting empty");
                        CacheMap::new()
                    }
                    Err(e) => {
                        warn!(location = %self.store.describe(), error = %e, "Could not read geocode snapshot, starting empty");
                        CacheMap::new()
                    }
                };

                let count = loaded.len();
                let mut entries = self.entries.write();
                for (name, entry) in loaded {
                    entries.entry(name).or_insert(entry);
                }
                info!(count, location = %self.store.describe(), "Loaded geocode cache");
            })
            .await;
    }

    /// Returns true once the snapshot has been read (or found missing).
    pub fn is_loaded(&self) -> bool {
        self.loaded.initialized()
    }

    /// Looks up a name.
    ///
    /// The outer `Option` is "seen?"; the inner one is the cached answer.
    pub fn get(&self, name: &str) -> Option<CacheEntry> {
        self.entries.read().get(name).copied()
    }

    /// Returns true if the name already has an entry.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// Stores an entry unless the name already has one.
    ///
    /// Returns the entry now held for the name, which is the existing one if
    /// another lookup got there first.
    pub fn insert(&self, name: &str, entry: CacheEntry) -> CacheEntry {
        let mut entries = self.entries.write();
        if let Some(existing) = entries.get(name) {
            debug!(name, "Entry already present, keeping first answer");
            return *existing;
        }
        entries.insert(name.to_string(), entry);
        self.dirty.store(true, Ordering::SeqCst);
        entry
    }

    /// Splits names into cached answers and names still needing a lookup.
    ///
    /// Uncached names keep their input order.
    pub fn partition<'a, I>(&self, names: I) -> (HashMap<String, CacheEntry>, Vec<String>)
    where
        I: IntoIterator<Item = &'a String>,
    {
        let entries = self.entries.read();
        let mut cached = HashMap::new();
        let mut uncached = Vec::new();

        for name in names {
            match entries.get(name) {
                Some(entry) => {
                    cached.insert(name.clone(), *entry);
                }
                None => uncached.push(name.clone()),
            }
        }

        (cached, uncached)
    }

    /// Returns true if there are entries not yet written to the snapshot.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Writes the whole mirror to the snapshot store if it has changed.
    ///
    /// Returns whether a write happened.
    #[instrument(skip(self), fields(location = %self.store.describe()))]
    pub async fn flush(&self) -> Result<bool> {
        let _guard = self.flush_lock.lock().await;

        if !self.dirty.swap(false, Ordering::SeqCst) {
            return Ok(false);
        }

        let snapshot = self.snapshot();
        if let Err(e) = self.store.save(&snapshot).await {
            self.dirty.store(true, Ordering::SeqCst);
            return Err(e);
        }

        info!(count = snapshot.len(), "Geocode cache saved");
        Ok(true)
    }

    /// Like [`flush`](Self::flush) but logs failures instead of returning them.
    pub async fn flush_or_warn(&self) -> bool {
        match self.flush().await {
            Ok(written) => written,
            Err(e) => {
                warn!(error = %e, location = %self.store.describe(), "Could not write geocode snapshot, continuing in memory");
                false
            }
        }
    }

    /// Returns a copy of every entry.
    pub fn snapshot(&self) -> CacheMap {
        self.entries.read().clone()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::from_entries(&self.entries.read());
        stats.dirty = self.is_dirty();
        stats.location = Some(self.store.describe());
        stats
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Drop for GeocodeCache {
    fn drop(&mut self) {
        if self.is_dirty() {
            warn!(location = %self.store.describe(), "GeocodeCache dropped with unsaved entries");
        }
    }
}
