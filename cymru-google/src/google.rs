//! Google Geocoding API client.
//!
//! Issues `GET {base_url}?address=<query>&key=<key>` and takes the first
//! result's `geometry.location`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use cymru_core::constants::{DEFAULT_GOOGLE_GEOCODE_URL, DEFAULT_TIMEOUT};
use cymru_core::error::{GeocodeError, Result};
use cymru_core::traits::GeocodingProvider;
use cymru_core::types::Coordinate;

/// Google client configuration.
#[derive(Clone, Debug)]
pub struct GoogleConfig {
    /// API key. Absence is reported per request, not at construction.
    pub api_key: Option<String>,
    /// Geocoding endpoint
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_GOOGLE_GEOCODE_URL.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GoogleConfig {
    /// Creates a config with the given API key and default endpoint.
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Overrides the endpoint (used by tests and proxies).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the Google Geocoding JSON API.
pub struct GoogleGeocoder {
    config: GoogleConfig,
    endpoint: Url,
    http_client: reqwest::Client,
}

impl GoogleGeocoder {
    /// Creates a client, validating the endpoint URL.
    pub fn new(config: GoogleConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.base_url).map_err(|e| {
            GeocodeError::ConfigError(format!("invalid geocoding URL '{}': {}", config.base_url, e))
        })?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GeocodeError::ConfigError(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            endpoint,
            http_client,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GoogleConfig {
        &self.config
    }

    fn map_send_error(&self, query: &str, e: reqwest::Error) -> GeocodeError {
        if e.is_timeout() {
            GeocodeError::Timeout {
                query: query.to_string(),
                millis: self.config.timeout.as_millis() as u64,
            }
        } else {
            GeocodeError::HttpError(e.to_string())
        }
    }
}

#[async_trait]
impl GeocodingProvider for GoogleGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, query: &str) -> Result<Option<Coordinate>> {
        let api_key = self.config.api_key.as_deref().ok_or(GeocodeError::MissingApiKey)?;

        let response = self
            .http_client
            .get(self.endpoint.clone())
            .query(&[("address", query), ("key", api_key)])
            .send()
            .await
            .map_err(|e| self.map_send_error(query, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(query, status = status.as_u16(), "Geocoding API returned error status");
            return Err(GeocodeError::ProviderStatus {
                query: query.to_string(),
                status: status.as_u16(),
            });
        }

        let body: GeocodeResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.map_send_error(query, e)
            } else {
                GeocodeError::InvalidResponse(e.to_string())
            }
        })?;

        let Some(first) = body.results.into_iter().next() else {
            debug!(query, status = %body.status, "No geocoding results");
            return Ok(None);
        };

        let location = first.geometry.location;
        match Coordinate::try_new(location.lat, location.lng) {
            Ok(coord) => {
                debug!(query, lat = coord.lat, lng = coord.lng, "Geocoded");
                Ok(Some(coord))
            }
            Err(e) => {
                warn!(query, error = %e, "Provider returned unusable coordinate");
                Ok(None)
            }
        }
    }

    fn check_config(&self) -> Result<()> {
        match self.config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(()),
            _ => Err(GeocodeError::MissingApiKey),
        }
    }

    fn name(&self) -> &'static str {
        "google"
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESPONSE TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}
