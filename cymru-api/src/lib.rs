//! # Cymru API Server
//!
//! HTTP API consumed by the map view of the rugby club directory.
//!
//! ## Endpoints
//!
//! - `GET /health` - Liveness check
//! - `POST /api/geocode` - Resolve one organisation name or a list of names
//! - `GET /api/geocode/stats` - Cache statistics
//!
//! ## Example
//!
//! ```rust,ignore
//! use cymru_api::{ApiServer, ApiConfig};
//!
//! let config = ApiConfig::from_env();
//! let server = ApiServer::new(config)?;
//! server.run(([0, 0, 0, 0], 3000)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod dto;
mod error;
mod handlers;
mod routes;
mod state;

pub use dto::{BatchGeocodeResponse, GeocodeRequest, HealthResponse};
pub use error::ApiError;
pub use routes::create_router;
pub use state::{ApiConfig, AppState};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use cymru_core::error::Result;

/// Maximum accepted request body, in bytes.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// API server for the geocoding cache.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a new API server with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self> {
        Ok(Self::with_state(AppState::new(config)?))
    }

    /// Creates a server around prepared state.
    pub fn with_state(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Creates the router with all routes and layers configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server until Ctrl+C, then flushes the cache.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("Cymru geocode API listening on {}", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        if let Err(e) = self.state.geocoder.flush().await {
            warn!(error = %e, "Final cache flush failed");
        }
        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
