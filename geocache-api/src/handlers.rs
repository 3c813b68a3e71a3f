//! API route handlers.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use tracing::debug;

use geocache_service::LookupStats;

use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Marks server start for uptime reporting.
pub(crate) fn mark_started() {
    START_TIME.get_or_init(Instant::now);
}

/// GET /geocoding
pub async fn geocode(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<GeocodeParams>, QueryRejection>,
) -> Result<Json<CoordinatesResponse>> {
    let Query(params) = params?;

    let coordinates = state.service.lookup_forward(&params.address).await?;

    debug!(
        address = %params.address,
        latitude = coordinates.latitude,
        longitude = coordinates.longitude,
        "Geocoded address"
    );

    Ok(Json(coordinates.into()))
}

/// GET /reverse-geocoding
///
/// Answers with the label as plain text.
pub async fn reverse_geocode(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<ReverseGeocodeParams>, QueryRejection>,
) -> Result<String> {
    let Query(params) = params?;

    let label = state
        .service
        .lookup_reverse(params.latitude, params.longitude)
        .await?;

    debug!(
        latitude = params.latitude,
        longitude = params.longitude,
        label = %label,
        "Reverse geocoded coordinates"
    );

    Ok(label.into_inner())
}

/// GET /cache/stats
pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<LookupStats> {
    Json(state.service.stats())
}

/// GET /health
pub async fn health_check(State(_state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let start = START_TIME.get_or_init(Instant::now);

    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: start.elapsed().as_secs(),
    })
}
