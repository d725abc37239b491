//! App state: geocoder and config.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use cymru_core::constants::{
    ENV_API_KEY, ENV_API_KEY_FALLBACK, ENV_API_URL, ENV_CACHE_FILE, ENV_CONCURRENCY,
    ENV_REGION_SUFFIX, ENV_TIMEOUT_SECS,
};
use cymru_core::error::Result;
use cymru_geocoder::{Geocoder, GeocoderConfig};

/// Server configuration.
#[derive(Clone, Debug, Default)]
pub struct ApiConfig {
    /// Google Maps API key; requests fail with `CONFIG_ERROR` while unset
    pub api_key: Option<String>,
    /// Cache and provider settings
    pub geocoder: GeocoderConfig,
}

impl ApiConfig {
    /// Reads configuration from the environment (and `.env`, if present).
    ///
    /// Unparseable numbers fall back to their defaults with a warning.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let defaults = GeocoderConfig::default();
        let geocoder = GeocoderConfig {
            cache_file: env::var(ENV_CACHE_FILE)
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_file),
            concurrency: parse_env(ENV_CONCURRENCY, defaults.concurrency),
            timeout: Duration::from_secs(parse_env(ENV_TIMEOUT_SECS, defaults.timeout.as_secs())),
            region_suffix: env::var(ENV_REGION_SUFFIX).unwrap_or(defaults.region_suffix),
            api_url: env::var(ENV_API_URL).unwrap_or(defaults.api_url),
        };

        Self {
            api_key: api_key_from_env(),
            geocoder,
        }
    }
}

/// Reads the API key, preferring the server-side variable.
fn api_key_from_env() -> Option<String> {
    [ENV_API_KEY, ENV_API_KEY_FALLBACK]
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|key| !key.trim().is_empty())
}

fn parse_env<T: FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, default = %default, "Invalid value, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Shared application state.
pub struct AppState {
    /// Configuration the state was built from
    pub config: ApiConfig,
    /// Geocode cache service
    pub geocoder: Geocoder,
}

impl AppState {
    /// Builds the Google-backed geocoder for `config`.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let geocoder = Geocoder::google(config.geocoder.clone(), config.api_key.clone())?;
        Ok(Self { config, geocoder })
    }

    /// Wraps an already-built geocoder.
    pub fn with_geocoder(config: ApiConfig, geocoder: Geocoder) -> Self {
        Self { config, geocoder }
    }
}
