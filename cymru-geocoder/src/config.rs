//! Geocoder configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use cymru_core::constants::{
    DEFAULT_CACHE_FILE, DEFAULT_CONCURRENCY, DEFAULT_GOOGLE_GEOCODE_URL, DEFAULT_REGION_SUFFIX,
    DEFAULT_TIMEOUT,
};

/// Geocoder configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Snapshot file path
    pub cache_file: PathBuf,
    /// Maximum provider calls in flight per batch group (0 is treated as 1)
    pub concurrency: usize,
    /// Per-call time budget
    pub timeout: Duration,
    /// Appended to each name to form the provider query
    pub region_suffix: String,
    /// Provider endpoint
    pub api_url: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            cache_file: PathBuf::from(DEFAULT_CACHE_FILE),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            region_suffix: DEFAULT_REGION_SUFFIX.into(),
            api_url: DEFAULT_GOOGLE_GEOCODE_URL.into(),
        }
    }
}

impl GeocoderConfig {
    /// Creates a config with the given snapshot path.
    pub fn with_cache_file(cache_file: impl Into<PathBuf>) -> Self {
        Self {
            cache_file: cache_file.into(),
            ..Default::default()
        }
    }

    /// Sets the batch concurrency limit.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the per-call timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the region suffix.
    pub fn region_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.region_suffix = suffix.into();
        self
    }

    /// Sets the provider endpoint.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Concurrency limit actually used for batches.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeocoderConfig::default();
        assert_eq!(config.cache_file, PathBuf::from(".geocode-cache.json"));
        assert_eq!(config.concurrency, 10);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.region_suffix, ", Wales, UK");
    }

    #[test]
    fn test_builder() {
        let config = GeocoderConfig::with_cache_file("/tmp/geo.json")
            .concurrency(3)
            .timeout(Duration::from_millis(250))
            .region_suffix(", Cymru");

        assert_eq!(config.cache_file, PathBuf::from("/tmp/geo.json"));
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.region_suffix, ", Cymru");
    }

    #[test]
    fn test_zero_concurrency_clamped() {
        assert_eq!(GeocoderConfig::default().concurrency(0).effective_concurrency(), 1);
    }
}
