//! Error types for Cymru.
//!
//! Provider failures never reach callers of the geocoding service; they are
//! folded into negative cache entries. The variants below exist so that the
//! provider and the snapshot layer can say *what* went wrong before that
//! happens, and so that configuration problems can be surfaced.

use thiserror::Error;

/// Result type alias using `GeocodeError`.
pub type Result<T> = std::result::Result<T, GeocodeError>;

/// Main error type for all Cymru operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    // ═══════════════════════════════════════════════════════════════════════════
    // PROVIDER ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// HTTP request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Provider answered with a non-success status.
    #[error("Provider returned HTTP {status} for '{query}'")]
    ProviderStatus {
        /// Query that was sent
        query: String,
        /// HTTP status code
        status: u16,
    },

    /// Provider answered with a body we could not understand.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// Provider call exceeded its time budget.
    #[error("Provider timeout after {millis}ms for '{query}'")]
    Timeout {
        /// Query that was sent
        query: String,
        /// Budget that elapsed
        millis: u64,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // SNAPSHOT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // INPUT / CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Input validation failed.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The provider API key is absent.
    #[error("Google Maps API key not configured")]
    MissingApiKey,
}

impl GeocodeError {
    /// Returns true if a later attempt could plausibly succeed.
    ///
    /// The service itself never retries; this is informational for logs.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GeocodeError::HttpError(_)
                | GeocodeError::Timeout { .. }
                | GeocodeError::ProviderStatus { status: 500..=599, .. }
        )
    }

    /// Returns true if this error comes from missing or bad configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(self, GeocodeError::ConfigError(_) | GeocodeError::MissingApiKey)
    }

    /// Returns true if this error describes a failed provider call.
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            GeocodeError::HttpError(_)
                | GeocodeError::ProviderStatus { .. }
                | GeocodeError::InvalidResponse(_)
                | GeocodeError::Timeout { .. }
        )
    }
}
