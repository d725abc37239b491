//! Defaults shared across the workspace.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// PROVIDER
// ═══════════════════════════════════════════════════════════════════════════════

/// Google Geocoding JSON endpoint.
pub const DEFAULT_GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Appended to every organisation name before it is sent to the provider.
pub const DEFAULT_REGION_SUFFIX: &str = ", Wales, UK";

/// Upper bound on a single provider call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// [`DEFAULT_TIMEOUT_SECS`] as a `Duration`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

// ═══════════════════════════════════════════════════════════════════════════════
// BATCHING
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum number of provider calls in flight within one batch group.
pub const DEFAULT_CONCURRENCY: usize = 10;

// ═══════════════════════════════════════════════════════════════════════════════
// DURABLE SNAPSHOT
// ═══════════════════════════════════════════════════════════════════════════════

/// Snapshot file name, resolved against the process working directory.
pub const DEFAULT_CACHE_FILE: &str = ".geocode-cache.json";

// ═══════════════════════════════════════════════════════════════════════════════
// ENVIRONMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// API key for the Google Geocoding service.
pub const ENV_API_KEY: &str = "GOOGLE_MAPS_API_KEY";

/// Fallback name for the API key, shared with the web front end's build.
pub const ENV_API_KEY_FALLBACK: &str = "NEXT_PUBLIC_GOOGLE_MAPS_API_KEY";

/// Snapshot path override.
pub const ENV_CACHE_FILE: &str = "GEOCODE_CACHE_FILE";

/// Batch concurrency override.
pub const ENV_CONCURRENCY: &str = "GEOCODE_CONCURRENCY";

/// Per-call timeout override, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "GEOCODE_TIMEOUT_SECS";

/// Region suffix override.
pub const ENV_REGION_SUFFIX: &str = "GEOCODE_REGION_SUFFIX";

/// Provider endpoint override.
pub const ENV_API_URL: &str = "GEOCODE_API_URL";
