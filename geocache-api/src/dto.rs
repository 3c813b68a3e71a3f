//! DTOs for API requests and responses.

use serde::{Deserialize, Serialize};

use geocache_core::types::Coordinates;

/// Query string of `GET /geocoding`.
#[derive(Debug, Deserialize)]
pub struct GeocodeParams {
    /// Free-text address
    pub address: String,
}

/// Query string of `GET /reverse-geocoding`.
#[derive(Debug, Deserialize)]
pub struct ReverseGeocodeParams {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

/// Response for forward geocoding.
#[derive(Debug, Serialize)]
pub struct CoordinatesResponse {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl From<Coordinates> for CoordinatesResponse {
    fn from(c: Coordinates) -> Self {
        Self {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status
    pub status: String,
    /// Version
    pub version: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
}
