//! Lookup requests.

use serde::{Deserialize, Serialize};

use super::{CacheKey, ForwardKey, ReverseKey};

/// A single geocoding request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeoQuery {
    /// Address → coordinates.
    Forward {
        /// Free-text address as supplied by the caller
        address: String,
    },
    /// Coordinates → address.
    Reverse {
        /// Latitude in degrees
        latitude: f64,
        /// Longitude in degrees
        longitude: f64,
    },
}

impl GeoQuery {
    /// Creates a forward query.
    pub fn forward(address: impl Into<String>) -> Self {
        GeoQuery::Forward {
            address: address.into(),
        }
    }

    /// Creates a reverse query.
    pub fn reverse(latitude: f64, longitude: f64) -> Self {
        GeoQuery::Reverse { latitude, longitude }
    }

    /// Derives the cache key for this query.
    pub fn cache_key(&self) -> CacheKey {
        match self {
            GeoQuery::Forward { address } => CacheKey::Forward(ForwardKey::from_address(address)),
            GeoQuery::Reverse { latitude, longitude } => {
                CacheKey::Reverse(ReverseKey::new(*latitude, *longitude))
            }
        }
    }
}
