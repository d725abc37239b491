//! Cache entries and statistics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::Coordinate;

/// The memoized answer for one organisation name.
///
/// `None` is a negative entry: the provider found nothing, or the lookup
/// failed. Either way the name is not queried again.
pub type CacheEntry = Option<Coordinate>;

/// Name → entry mapping, the shape of both the in-memory mirror and the snapshot.
pub type CacheMap = HashMap<String, CacheEntry>;

/// Counts describing the cache contents.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Total number of names with an entry
    pub total_entries: usize,
    /// Entries holding a coordinate
    pub positive_entries: usize,
    /// Negative entries
    pub negative_entries: usize,
    /// True when the mirror has entries not yet written to disk
    pub dirty: bool,
    /// Snapshot location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl CacheStats {
    /// Computes counts for a mapping.
    pub fn from_entries(entries: &CacheMap) -> Self {
        let positive_entries = entries.values().filter(|e| e.is_some()).count();
        Self {
            total_entries: entries.len(),
            positive_entries,
            negative_entries: entries.len() - positive_entries,
            dirty: false,
            location: None,
        }
    }
}
