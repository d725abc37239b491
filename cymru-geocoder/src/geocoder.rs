//! The geocode cache service.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use dashmap::DashMap;
use futures::future::join_all;
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use cymru_core::error::{GeocodeError, Result};
use cymru_core::traits::GeocodingProvider;
use cymru_core::types::{CacheEntry, CacheStats};
use cymru_google::{GoogleConfig, GoogleGeocoder};
use cymru_store::GeocodeCache;

use crate::config::GeocoderConfig;
use crate::plan::group_ranges;

/// What happened during one batch.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BatchReport {
    /// Unique names requested
    pub requested: usize,
    /// Names answered from the cache
    pub cached: usize,
    /// Names sent to the provider (or joined an in-flight lookup)
    pub fetched: usize,
    /// Fetched names that came back with a coordinate
    pub found: usize,
    /// Size of each sequential group, in order
    pub groups: Vec<usize>,
    /// Whether the snapshot was written
    pub flushed: bool,
}

/// Results of a batch, keyed by input name.
#[derive(Clone, Debug, Default)]
pub struct BatchOutcome {
    /// Name → coordinate or `None`
    pub results: BTreeMap<String, CacheEntry>,
    /// Batch statistics
    pub report: BatchReport,
}

/// Resolves organisation names to coordinates through a permanent cache.
///
/// # Guarantees
///
/// - A cached name (positive or negative) never reaches the provider again.
/// - Provider failures of every kind become negative entries; they are not
///   returned as errors.
/// - Concurrent lookups of the same uncached name share a single provider call.
///
/// The cache is loaded lazily on first use and flushed at the end of each
/// batch that added entries.
pub struct Geocoder {
    provider: Arc<dyn GeocodingProvider>,
    cache: Arc<GeocodeCache>,
    config: GeocoderConfig,
    /// Lookups currently running, by name
    in_flight: DashMap<String, Arc<OnceCell<CacheEntry>>>,
}

impl Geocoder {
    /// Creates a geocoder from its parts.
    pub fn new(
        provider: Arc<dyn GeocodingProvider>,
        cache: Arc<GeocodeCache>,
        config: GeocoderConfig,
    ) -> Self {
        Self {
            provider,
            cache,
            config,
            in_flight: DashMap::new(),
        }
    }

    /// Creates a geocoder backed by Google and a JSON snapshot at `config.cache_file`.
    ///
    /// A missing API key is not an error here; requests will fail with
    /// [`GeocodeError::MissingApiKey`] until one is configured.
    pub fn google(config: GeocoderConfig, api_key: Option<String>) -> Result<Self> {
        let provider = GoogleGeocoder::new(GoogleConfig {
            api_key,
            base_url: config.api_url.clone(),
            timeout: config.timeout,
        })?;
        let cache = GeocodeCache::json_file(&config.cache_file);

        Ok(Self::new(Arc::new(provider), Arc::new(cache), config))
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GeocoderConfig {
        &self.config
    }

    /// Returns the underlying cache.
    pub fn cache(&self) -> &Arc<GeocodeCache> {
        &self.cache
    }

    /// Builds the provider query for a name.
    pub fn query_for(&self, name: &str) -> String {
        format!("{}{}", name, self.config.region_suffix)
    }

    /// Resolves a single name.
    ///
    /// Returns the cached answer if there is one; otherwise asks the provider
    /// and caches whatever comes back. Does not flush the snapshot; use
    /// [`resolve_batch`](Self::resolve_batch) or [`flush`](Self::flush) for that.
    ///
    /// # Errors
    ///
    /// Only for a blank name or missing provider configuration. Provider
    /// failures yield `Ok(None)`.
    #[instrument(skip(self))]
    pub async fn resolve(&self, name: &str) -> Result<CacheEntry> {
        validate_name(name)?;
        self.provider.check_config()?;
        self.cache.ensure_loaded().await;

        if let Some(entry) = self.cache.get(name) {
            debug!(name, "Cache hit");
            return Ok(entry);
        }

        Ok(self.resolve_uncached(name).await)
    }

    /// Resolves a batch of names using the configured concurrency limit.
    pub async fn resolve_batch(&self, names: &[String]) -> Result<BatchOutcome> {
        self.resolve_batch_with_limit(names, self.config.effective_concurrency())
            .await
    }

    /// Resolves a batch of names with an explicit concurrency limit.
    ///
    /// Duplicate names are collapsed. Uncached names are fetched in groups of
    /// at most `limit`; each group completes before the next starts. The
    /// snapshot is written once at the end if anything changed.
    #[instrument(skip(self, names), fields(count = names.len()))]
    pub async fn resolve_batch_with_limit(
        &self,
        names: &[String],
        limit: usize,
    ) -> Result<BatchOutcome> {
        for name in names {
            validate_name(name)?;
        }
        self.provider.check_config()?;
        self.cache.ensure_loaded().await;

        let unique = dedupe(names);
        let (cached, uncached) = self.cache.partition(&unique);

        let mut report = BatchReport {
            requested: unique.len(),
            cached: cached.len(),
            fetched: uncached.len(),
            ..Default::default()
        };
        let mut results: BTreeMap<String, CacheEntry> = cached.into_iter().collect();

        info!(
            requested = report.requested,
            cached = report.cached,
            to_fetch = report.fetched,
            "Geocoding batch"
        );

        for range in group_ranges(uncached.len(), limit) {
            let group = &uncached[range];
            report.groups.push(group.len());

            let answers = join_all(group.iter().map(|name| self.resolve_uncached(name))).await;

            for (name, entry) in group.iter().zip(answers) {
                if entry.is_some() {
                    report.found += 1;
                }
                results.insert(name.clone(), entry);
            }
        }

        if !uncached.is_empty() {
            report.flushed = self.cache.flush_or_warn().await;
        }

        debug!(?report, "Batch complete");
        Ok(BatchOutcome { results, report })
    }

    /// Writes the snapshot if there are unsaved entries.
    pub async fn flush(&self) -> Result<bool> {
        self.cache.flush().await
    }

    /// Returns cache statistics, loading the cache first if needed.
    pub async fn stats(&self) -> CacheStats {
        self.cache.ensure_loaded().await;
        self.cache.stats()
    }

    /// Resolves a name known to be missing from the cache, sharing any
    /// lookup for the same name that is already running.
    async fn resolve_uncached(&self, name: &str) -> CacheEntry {
        let cell = self
            .in_flight
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        let entry = *cell
            .get_or_init(|| async {
                // A lookup that finished between our cache check and now
                if let Some(entry) = self.cache.get(name) {
                    return entry;
                }
                let fetched = self.lookup(name).await;
                self.cache.insert(name, fetched)
            })
            .await;

        self.in_flight.remove_if(name, |_, current| Arc::ptr_eq(current, &cell));
        entry
    }

    /// Calls the provider once, folding every failure into `None`.
    async fn lookup(&self, name: &str) -> CacheEntry {
        let query = self.query_for(name);

        let outcome = tokio::time::timeout(self.config.timeout, self.provider.geocode(&query))
            .await
            .unwrap_or_else(|_| {
                Err(GeocodeError::Timeout {
                    query: query.clone(),
                    millis: self.config.timeout.as_millis() as u64,
                })
            });

        match outcome {
            Ok(Some(coord)) => {
                info!(name, lat = coord.lat, lng = coord.lng, "Found");
                Some(coord)
            }
            Ok(None) => {
                info!(name, "No results");
                None
            }
            Err(e) => {
                warn!(
                    name,
                    provider = self.provider.name(),
                    recoverable = e.is_recoverable(),
                    error = %e,
                    "Geocoding failed, caching negative entry"
                );
                None
            }
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(GeocodeError::ValidationError(
            "organisation name must not be empty".into(),
        ));
    }
    Ok(())
}

/// Drops repeated names, keeping first occurrences in order.
fn dedupe(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(names.len());
    names
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}
