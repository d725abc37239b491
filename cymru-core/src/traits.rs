//! Common traits for Cymru.
//!
//! These are the seams between the geocoding service and the outside world,
//! so that tests can substitute the provider and the durable store.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CacheMap, Coordinate};

// ═══════════════════════════════════════════════════════════════════════════════
// PROVIDER TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// An external service that turns free-text location queries into coordinates.
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Geocodes a full query string (name plus regional qualifier).
    ///
    /// Returns `Ok(None)` when the provider answered but found nothing.
    /// Any `Err` is treated by the service as a failed lookup.
    async fn geocode(&self, query: &str) -> Result<Option<Coordinate>>;

    /// Checks that the provider has what it needs to make calls.
    ///
    /// Called once per service request, before any cache mutation.
    fn check_config(&self) -> Result<()> {
        Ok(())
    }

    /// Short provider name for logs.
    fn name(&self) -> &'static str;
}

// ═══════════════════════════════════════════════════════════════════════════════
// SNAPSHOT STORE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Durable storage holding one serialized snapshot of the whole cache.
///
/// Implementations overwrite the full snapshot on every save; there is no
/// append log.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Reads the snapshot. `Ok(None)` means nothing has been stored yet.
    async fn load(&self) -> Result<Option<CacheMap>>;

    /// Replaces the snapshot with `entries`.
    async fn save(&self, entries: &CacheMap) -> Result<()>;

    /// Human-readable location for logs and stats.
    fn describe(&self) -> String;
}
