//! API route handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, info};

use cymru_core::types::CacheStats;

use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// POST /api/geocode
///
/// Single: `{ "organizationName": "…" }` → `{ "lat", "lng" }` or `null`.
/// Batch: `{ "organizationNames": [...] }` → `{ "results": { … } }`.
pub async fn geocode(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<GeocodeRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(req) = body?;

    let names = req.names();
    if names.is_empty() {
        return Err(ApiError::bad_request("Organization name(s) required"));
    }
    if names.iter().any(|name| name.trim().is_empty()) {
        return Err(ApiError::bad_request("Organization names must not be blank"));
    }

    let outcome = state.geocoder.resolve_batch(&names).await?;

    info!(
        requested = outcome.report.requested,
        cached = outcome.report.cached,
        fetched = outcome.report.fetched,
        found = outcome.report.found,
        "Geocode request served"
    );

    if !req.is_batch() {
        let coord = outcome.results.get(&names[0]).copied().flatten();
        debug!(name = %names[0], ?coord, "Single geocode");
        return Ok(Json(coord).into_response());
    }

    Ok(Json(BatchGeocodeResponse {
        results: outcome.results,
    })
    .into_response())
}

/// GET /api/geocode/stats
pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStats> {
    Json(state.geocoder.stats().await)
}
